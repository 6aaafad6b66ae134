//! Stim-event pairing and validation.
//!
//! Walks the stim-marker sequence once, in onset order, through an explicit
//! two-state machine (`AwaitingStart` / `AwaitingEnd`) that reconstructs
//! start→end pairs and bounds their duration.  Alternation enforcement keeps
//! a lost marker from silently pairing non-adjacent starts and ends; the
//! duration bound rejects glitch markers without discarding the session.
//!
//! Nothing here is fatal: every rejected marker lands in the omission log and
//! the worst possible outcome is an empty pair list.

use crate::annot::{StimEvent, StimKind};
use crate::config::PipelineConfig;
use log::{debug, info, warn};
use serde::Serialize;

/// A validated stimulation interval.
///
/// `end_onset > start_onset` always holds, and the duration lies within the
/// configured `[min_duration, max_duration]` bound.  Indices refer back to
/// the source annotation list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CleanedPair {
    pub start_index: usize,
    pub start_onset: f64,
    pub end_index: usize,
    pub end_onset: f64,
}

impl CleanedPair {
    /// Stimulation duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_onset - self.start_onset
    }
}

/// One annotation (or invalid pair) that could not be resolved into a
/// [`CleanedPair`], with the reason it was dropped.
///
/// An invalid-duration rejection covers both members of the pair in a single
/// record: the index/onset are those of the pending start and the
/// description is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OmittedEvent {
    pub event_index: usize,
    pub event_onset: f64,
    pub event_description: Option<String>,
    pub reason: String,
}

/// Output of [`pair_events`].
#[derive(Debug, Clone, Default)]
pub struct Pairing {
    /// Validated stimulation intervals, in onset order.
    pub pairs: Vec<CleanedPair>,
    /// Everything that failed pairing or validation.
    pub omitted: Vec<OmittedEvent>,
    /// Gaps in seconds between consecutive pairs whose pairing was clean
    /// (no omission between them); feeds window-size sanity checks.
    pub gaps: Vec<f64>,
}

/// Pairing state: which marker kind the machine expects next.  A pending
/// start travels inside the state, so the alternation contract is enforced
/// by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    AwaitingStart,
    AwaitingEnd(StimEvent),
}

/// Pair and validate `events` (assumed onset-ordered, as produced by
/// [`crate::annot::extract_stim_events`]).
pub fn pair_events(events: &[StimEvent], cfg: &PipelineConfig) -> Pairing {
    let mut out = Pairing::default();
    let mut state = State::AwaitingStart;
    // Omission count at the time the previous pair was emitted; a gap is only
    // reported when no omission happened in between.
    let mut omitted_at_last_pair: Option<usize> = None;

    for ev in events {
        state = match (state, ev.kind) {
            (State::AwaitingStart, StimKind::Start) => {
                debug!("pending stim start at {:.2}s (annotation {})", ev.onset, ev.source_index);
                State::AwaitingEnd(*ev)
            }
            (State::AwaitingStart, StimKind::End) => {
                warn!("stim end at {:.2}s with no pending start; omitted", ev.onset);
                out.omitted.push(omit_single(ev, "unexpected event 'stim end'"));
                State::AwaitingStart
            }
            (State::AwaitingEnd(start), StimKind::End) => {
                let time_diff = ev.onset - start.onset;
                if cfg.min_duration <= time_diff && time_diff <= cfg.max_duration {
                    debug!(
                        "valid pair: start {:.2}s → end {:.2}s ({time_diff:.2}s)",
                        start.onset, ev.onset
                    );
                    let pair = CleanedPair {
                        start_index: start.source_index,
                        start_onset: start.onset,
                        end_index: ev.source_index,
                        end_onset: ev.onset,
                    };
                    if let Some(prev) = out.pairs.last() {
                        if omitted_at_last_pair == Some(out.omitted.len()) {
                            out.gaps.push(pair.start_onset - prev.end_onset);
                        }
                    }
                    out.pairs.push(pair);
                    omitted_at_last_pair = Some(out.omitted.len());
                } else {
                    warn!(
                        "pair start {:.2}s → end {:.2}s rejected: duration {time_diff:.2}s \
                         outside [{}, {}]",
                        start.onset, ev.onset, cfg.min_duration, cfg.max_duration
                    );
                    out.omitted.push(OmittedEvent {
                        event_index: start.source_index,
                        event_onset: start.onset,
                        event_description: None,
                        reason: format!("invalid duration {time_diff}"),
                    });
                }
                State::AwaitingStart
            }
            (State::AwaitingEnd(prev), StimKind::Start) => {
                // A second start before any end: the earlier start can never
                // be paired, so drop it and pend the new one.
                warn!(
                    "stim start at {:.2}s while start at {:.2}s still pending; \
                     earlier start omitted",
                    ev.onset, prev.onset
                );
                out.omitted.push(omit_single(&prev, "unexpected event 'stim start'"));
                State::AwaitingEnd(*ev)
            }
        };
    }

    // Input exhausted with a start still pending: account for it.
    if let State::AwaitingEnd(start) = state {
        warn!("stim start at {:.2}s never matched by a stim end; omitted", start.onset);
        out.omitted.push(omit_single(&start, "unmatched event 'stim start'"));
    }

    info!(
        "pairing complete: {} cleaned pairs, {} omitted, {} clean gaps",
        out.pairs.len(),
        out.omitted.len(),
        out.gaps.len()
    );
    out
}

fn omit_single(ev: &StimEvent, reason: &str) -> OmittedEvent {
    OmittedEvent {
        event_index: ev.source_index,
        event_onset: ev.onset,
        event_description: Some(ev.kind.description().to_string()),
        reason: reason.to_string(),
    }
}
