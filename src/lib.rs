//! # stimwave — stim-event validation and slow-wave epoch classification
//!
//! `stimwave` turns a recording's raw `stim start` / `stim end` annotation
//! stream into validated stimulation protocols with pre-stim / stim /
//! post-stim analysis windows, and classifies externally detected slow waves
//! against those windows.  Detection itself (e.g. YASA's `sw_detect`) and
//! everything downstream of the classified table (statistics, plotting,
//! per-wave extraction) live outside this crate.
//!
//! ## Pipeline overview
//!
//! ```text
//! annotations.csv                 waves.csv (detector summary)
//!   │                               │
//!   ├─ annot::extract_stim_events   typed, onset-ordered stim markers
//!   ├─ pairing::pair_events         alternation + duration validation
//!   │                               → cleaned pairs + omission log
//!   ├─ epochs::build_protocols      pre/stim/post windows, overlap
//!   │                               resolution, boundary truncation
//!   └─ classify::classify_waves ◄───┘
//!        │                          protocol number, label, stable name
//!        └─→ canonical classified table (+ windowed selections, summary)
//! ```
//!
//! ## Quick start
//!
//! ```
//! use stimwave::{run_session, Annotation, PipelineConfig};
//!
//! let annotations = vec![
//!     Annotation { onset: 30.0, duration: 0.0, description: "stim start".into() },
//!     Annotation { onset: 215.0, duration: 0.0, description: "stim end".into() },
//! ];
//!
//! let cfg = PipelineConfig::default();
//! let out = run_session(&annotations, &[], None, &cfg).unwrap();
//! assert_eq!(out.protocols.len(), 1);
//! assert!(out.omitted.is_empty());
//! ```
//!
//! Every stage is also exposed as a standalone function, so callers holding
//! their own annotation or wave tables can run any subset of the pipeline.

pub mod annot;
pub mod classify;
pub mod config;
pub mod epochs;
pub mod io;
pub mod pairing;
pub mod select;
pub mod summary;

use anyhow::Result;
use log::info;

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// Everything a downstream user is likely to need is available directly as
// `stimwave::Foo` without having to know the internal module layout.

// config
pub use config::{OverlapPolicy, PipelineConfig};

// annot
pub use annot::{extract_stim_events, Annotation, StimEvent, StimKind, STIM_END, STIM_START};

// pairing
pub use pairing::{pair_events, CleanedPair, OmittedEvent, Pairing};

// epochs
pub use epochs::{build_protocols, Epoch, OverlapRecord, Protocol};

// classify
pub use classify::{classify_waves, locate, Classification, ClassifiedWave, DetectedWave};

// select
pub use select::{select_waves, standard_selections};

// summary
pub use summary::render_summary;

/// Everything one session run produces.  All tables are immutable once the
/// run returns; rerunning on the same input yields identical output.
#[derive(Debug, Clone)]
pub struct SessionOutput {
    /// Validated stimulation intervals in onset order.
    pub pairs: Vec<CleanedPair>,
    /// Annotations (and invalid pairs) that failed validation, with reasons.
    pub omitted: Vec<OmittedEvent>,
    /// Gaps between consecutive cleanly paired protocols, seconds.
    pub gaps: Vec<f64>,
    /// One protocol per cleaned pair, windows already overlap-resolved.
    pub protocols: Vec<Protocol>,
    /// Audit log of window boundary adjustments.
    pub overlaps: Vec<OverlapRecord>,
    /// The canonical classified wave table.
    pub waves: Vec<ClassifiedWave>,
    /// Detected waves that fell outside every analysis window.
    pub dropped_waves: usize,
}

/// Run the **full validation/classification pipeline** for one session.
///
/// This is the main entry point for the `stimwave` library.  It chains all
/// stages in order on one recording's annotation stream and detected-wave
/// table.
///
/// # Arguments
///
/// * `annotations`   – The recording's full annotation list; non-stim
///   annotations are ignored.  Must be non-empty (an annotation source that
///   loaded nothing is an upstream error).
/// * `waves`         – Externally detected slow waves, any order.
/// * `recording_end` – Recording length in seconds when known; bounds the
///   post-stim windows.
/// * `cfg`           – Pipeline configuration (see [`PipelineConfig`]).
///
/// # Errors
///
/// Only configuration problems fail: an invalid [`PipelineConfig`] or an
/// empty annotation source.  Malformed stim markers and unclassifiable waves
/// are data, not errors — they are reported through
/// [`SessionOutput::omitted`] and [`SessionOutput::dropped_waves`].
pub fn run_session(
    annotations: &[Annotation],
    waves: &[DetectedWave],
    recording_end: Option<f64>,
    cfg: &PipelineConfig,
) -> Result<SessionOutput> {
    cfg.validate()?;

    let events = extract_stim_events(annotations)?;
    let Pairing { pairs, omitted, gaps } = pair_events(&events, cfg);
    let (protocols, overlaps) = build_protocols(&pairs, cfg, recording_end);
    let (classified, dropped_waves) = classify_waves(waves, &protocols);

    info!(
        "session complete: {} protocols, {} omissions, {}/{} waves classified",
        protocols.len(),
        omitted.len(),
        classified.len(),
        waves.len()
    );
    Ok(SessionOutput {
        pairs,
        omitted,
        gaps,
        protocols,
        overlaps,
        waves: classified,
        dropped_waves,
    })
}
