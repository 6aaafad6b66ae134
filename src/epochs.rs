//! Protocol and epoch construction.
//!
//! Each validated stimulation interval becomes one protocol with three
//! analysis windows:
//!
//! ```text
//!   pre-stim          stim              post-stim
//!   [s − pre_w, s)    [s, e]            (e, e + post_w]
//! ```
//!
//! Windows are built tentatively at full size first, then adjacent protocols
//! are walked in order and contested spans between one protocol's post-stim
//! window and the next one's pre-stim window are resolved per the configured
//! [`OverlapPolicy`].  Naive fixed-size windows would double-count the time
//! between closely scheduled protocols as belonging to both.
//!
//! The stim epoch is closed on both ends and owns its boundary instants;
//! pre/post windows are open on their stim side.

use crate::config::{OverlapPolicy, PipelineConfig};
use crate::pairing::CleanedPair;
use log::{debug, info, warn};
use serde::Serialize;

/// A bounded time interval in seconds.  Containment rules depend on which
/// slot of the protocol the epoch occupies (see [`Protocol`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Epoch {
    pub start: f64,
    pub end: f64,
}

impl Epoch {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// One stimulation protocol: a validated stim interval plus its surrounding
/// analysis windows.  Numbers are 1-based in onset order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Protocol {
    pub number: u32,
    /// `[pre_stim.start, stim.start)` — the boundary instant belongs to stim.
    pub pre_stim: Epoch,
    /// `[stim.start, stim.end]` — closed on both ends.
    pub stim: Epoch,
    /// `(stim.end, post_stim.end]`.
    pub post_stim: Epoch,
}

impl Protocol {
    /// True when `t` lies in the stimulation interval itself.
    pub fn stim_contains(&self, t: f64) -> bool {
        self.stim.start <= t && t <= self.stim.end
    }

    /// True when `t` lies in the pre-stim window.
    pub fn pre_contains(&self, t: f64) -> bool {
        self.pre_stim.start <= t && t < self.pre_stim.end
    }

    /// True when `t` lies in the post-stim window.
    pub fn post_contains(&self, t: f64) -> bool {
        self.post_stim.start < t && t <= self.post_stim.end
    }
}

/// Audit record of one boundary adjustment between adjacent protocols.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapRecord {
    /// The earlier protocol of the pair.
    pub earlier_protocol: u32,
    /// The later protocol of the pair.
    pub later_protocol: u32,
    /// Size of the contested span in seconds.
    pub overlap_amount: f64,
    pub original_post_end: f64,
    pub original_pre_start: f64,
    pub adjusted_post_end: f64,
    pub adjusted_pre_start: f64,
}

/// Build one [`Protocol`] per cleaned pair, resolve window overlaps, and
/// truncate windows at the recording boundaries.
///
/// `recording_end` is the recording length in seconds when known; `None`
/// leaves post-stim windows untruncated at the top.
pub fn build_protocols(
    pairs: &[CleanedPair],
    cfg: &PipelineConfig,
    recording_end: Option<f64>,
) -> (Vec<Protocol>, Vec<OverlapRecord>) {
    // Tentative full-size windows.
    let mut protocols: Vec<Protocol> = pairs
        .iter()
        .enumerate()
        .map(|(i, p)| Protocol {
            number: (i + 1) as u32,
            pre_stim: Epoch { start: p.start_onset - cfg.pre_window, end: p.start_onset },
            stim: Epoch { start: p.start_onset, end: p.end_onset },
            post_stim: Epoch { start: p.end_onset, end: p.end_onset + cfg.post_window },
        })
        .collect();

    // Pairwise overlap resolution between adjacent protocols.
    let mut overlaps = Vec::new();
    for k in 1..protocols.len() {
        let post_end = protocols[k - 1].post_stim.end;
        let pre_start = protocols[k].pre_stim.start;
        if post_end <= pre_start {
            continue;
        }

        let overlap_amount = post_end - pre_start;
        // The resolved boundary may never leave the gap between the two stim
        // intervals; the stim epochs themselves are untouchable.
        let gap_lo = protocols[k - 1].stim.end;
        let gap_hi = protocols[k].stim.start;
        let boundary = match cfg.overlap_policy {
            OverlapPolicy::MidpointSplit => 0.5 * (pre_start + post_end),
            OverlapPolicy::EarlierPriority => post_end,
        }
        .clamp(gap_lo, gap_hi);

        debug!(
            "overlap of {overlap_amount:.2}s between protocols {} and {}: \
             post end {post_end:.2} / pre start {pre_start:.2} → boundary {boundary:.2}",
            k,
            k + 1
        );
        overlaps.push(OverlapRecord {
            earlier_protocol: k as u32,
            later_protocol: (k + 1) as u32,
            overlap_amount,
            original_post_end: post_end,
            original_pre_start: pre_start,
            adjusted_post_end: boundary,
            adjusted_pre_start: boundary,
        });

        protocols[k - 1].post_stim.end = boundary;
        protocols[k].pre_stim.start = boundary;
    }

    // Recording-boundary truncation.
    for p in &mut protocols {
        if p.pre_stim.start < 0.0 {
            warn!(
                "protocol {}: pre-stim window truncated at recording start \
                 ({:.2}s → 0.00s)",
                p.number, p.pre_stim.start
            );
            p.pre_stim.start = 0.0;
        }
        if let Some(end) = recording_end {
            if p.post_stim.end > end {
                warn!(
                    "protocol {}: post-stim window truncated at recording end \
                     ({:.2}s → {end:.2}s)",
                    p.number, p.post_stim.end
                );
                p.post_stim.end = end;
            }
        }
    }

    info!(
        "built {} protocols ({} overlap adjustments)",
        protocols.len(),
        overlaps.len()
    );
    (protocols, overlaps)
}
