//! Slow-wave classification against protocol epochs.
//!
//! Detection itself is external: the detector (YASA's `sw_detect` summary
//! table) supplies candidate waves with start/peak/end times and amplitude
//! and slope metrics.  This module only decides, per wave, which protocol
//! window the wave's start falls into, names the wave, and produces the
//! canonical sorted table.  Waves outside every window are dropped, never
//! emitted with an empty classification.

use crate::epochs::Protocol;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One candidate slow wave as reported by the external detector.
///
/// Column names follow the detector's summary CSV verbatim; all times are in
/// seconds in the recording's time base, amplitudes in µV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedWave {
    #[serde(rename = "Start")]
    pub start: f64,
    #[serde(rename = "NegPeak")]
    pub neg_peak: f64,
    #[serde(rename = "MidCrossing")]
    pub mid_crossing: f64,
    #[serde(rename = "PosPeak")]
    pub pos_peak: f64,
    #[serde(rename = "End")]
    pub end: f64,
    #[serde(rename = "Duration")]
    pub duration: f64,
    #[serde(rename = "ValNegPeak")]
    pub val_neg_peak: f64,
    #[serde(rename = "ValPosPeak")]
    pub val_pos_peak: f64,
    #[serde(rename = "PTP")]
    pub ptp: f64,
    #[serde(rename = "Slope")]
    pub slope: f64,
    #[serde(rename = "Frequency")]
    pub frequency: f64,
    #[serde(rename = "Channel")]
    pub channel: String,
    #[serde(rename = "IdxChannel")]
    pub idx_channel: u32,
}

/// Temporal classification of a wave relative to its protocol.
///
/// Carries an explicit sort ordinal (`pre-stim < stim < post-stim`) so the
/// canonical table order never depends on an implicit category mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "pre-stim")]
    PreStim,
    #[serde(rename = "stim")]
    Stim,
    #[serde(rename = "post-stim")]
    PostStim,
}

impl Classification {
    /// Lowercase label used in wave names and output tables.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::PreStim => "pre-stim",
            Classification::Stim => "stim",
            Classification::PostStim => "post-stim",
        }
    }

    /// Fixed sort key: pre-stim < stim < post-stim.
    pub fn ordinal(&self) -> u8 {
        match self {
            Classification::PreStim => 0,
            Classification::Stim => 1,
            Classification::PostStim => 2,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A retained wave with its classification, protocol, and stable name.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedWave {
    pub wave: DetectedWave,
    pub classification: Classification,
    pub protocol_number: u32,
    /// `proto{N}_{label}_sw{seq}` — unique and stable across reruns.
    pub name: String,
}

/// Find the epoch containing instant `t`, if any.
///
/// Stim epochs are closed intervals and own their boundary instants, so they
/// are searched first; pre/post windows are then scanned protocol-ascending,
/// which resolves an instant shared by two adjacent windows toward the
/// earlier protocol.
pub fn locate(protocols: &[Protocol], t: f64) -> Option<(Classification, u32)> {
    for p in protocols {
        if p.stim_contains(t) {
            return Some((Classification::Stim, p.number));
        }
    }
    for p in protocols {
        if p.pre_contains(t) {
            return Some((Classification::PreStim, p.number));
        }
        if p.post_contains(t) {
            return Some((Classification::PostStim, p.number));
        }
    }
    None
}

/// Classify `waves` against `protocols`.
///
/// Returns the canonical classified table, sorted by
/// `(protocol, classification, start)`, plus the number of waves dropped for
/// falling outside every analysis window.
pub fn classify_waves(
    waves: &[DetectedWave],
    protocols: &[Protocol],
) -> (Vec<ClassifiedWave>, usize) {
    // Chronological processing keeps the per-group sequence counters in
    // wave-start order regardless of the detector's emission order.
    let mut ordered: Vec<&DetectedWave> = waves.iter().collect();
    ordered.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut seq: HashMap<(u32, Classification), u32> = HashMap::new();
    let mut classified = Vec::with_capacity(waves.len());
    let mut dropped = 0usize;

    for wave in ordered {
        let Some((classification, protocol_number)) = locate(protocols, wave.start) else {
            debug!("wave at {:.2}s outside all analysis windows; dropped", wave.start);
            dropped += 1;
            continue;
        };
        let n = seq.entry((protocol_number, classification)).or_insert(0);
        *n += 1;
        let name = format!("proto{protocol_number}_{}_sw{n}", classification.label());
        classified.push(ClassifiedWave {
            wave: wave.clone(),
            classification,
            protocol_number,
            name,
        });
    }

    classified.sort_by(|a, b| {
        (a.protocol_number, a.classification.ordinal())
            .cmp(&(b.protocol_number, b.classification.ordinal()))
            .then(a.wave.start.total_cmp(&b.wave.start))
    });

    info!(
        "classified {} of {} waves ({dropped} outside all windows)",
        classified.len(),
        waves.len()
    );
    (classified, dropped)
}
