//! Stim-annotation extraction.
//!
//! Turns the recording's flat annotation list (MNE convention: onset,
//! duration, description) into a time-ordered view of the `stim start` /
//! `stim end` markers, keeping the original annotation indices so omission
//! records stay traceable to the source.

use anyhow::{bail, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Description text of a stimulation-start marker.
pub const STIM_START: &str = "stim start";
/// Description text of a stimulation-end marker.
pub const STIM_END: &str = "stim end";

/// One annotation of the upstream recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Onset in seconds from recording start.
    pub onset: f64,
    /// Annotation duration in seconds (stim markers are instantaneous).
    pub duration: f64,
    /// Free-text description; only [`STIM_START`] and [`STIM_END`] are
    /// consumed here.
    pub description: String,
}

/// Marker type of a stim annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StimKind {
    Start,
    End,
}

impl StimKind {
    /// The annotation description this kind was parsed from.
    pub fn description(&self) -> &'static str {
        match self {
            StimKind::Start => STIM_START,
            StimKind::End => STIM_END,
        }
    }
}

/// A typed, time-ordered view of one stim annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StimEvent {
    pub kind: StimKind,
    /// Onset in seconds.
    pub onset: f64,
    /// Index of the annotation in the source list.
    pub source_index: usize,
}

/// Extract the stim markers from `annotations`, sorted by onset.
///
/// Non-stim annotations pass through untouched upstream and are simply
/// skipped here.  Zero stim markers is a valid result (a sham session);
/// a recording with no annotations at all is a loading error upstream and
/// is rejected.
pub fn extract_stim_events(annotations: &[Annotation]) -> Result<Vec<StimEvent>> {
    if annotations.is_empty() {
        bail!("annotation source is empty: nothing was loaded from the recording");
    }

    let mut events: Vec<StimEvent> = annotations
        .iter()
        .enumerate()
        .filter_map(|(i, a)| {
            let kind = match a.description.as_str() {
                STIM_START => StimKind::Start,
                STIM_END => StimKind::End,
                _ => return None,
            };
            Some(StimEvent { kind, onset: a.onset, source_index: i })
        })
        .collect();

    // Annotation lists are normally already onset-ordered; a stable sort
    // keeps equal-onset markers in source order.
    events.sort_by(|a, b| a.onset.total_cmp(&b.onset));

    info!(
        "extracted {} stim events from {} annotations",
        events.len(),
        annotations.len()
    );
    debug!("stim events: {events:?}");
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann(onset: f64, description: &str) -> Annotation {
        Annotation { onset, duration: 0.0, description: description.to_string() }
    }

    #[test]
    fn filters_to_stim_markers_only() {
        let annotations = vec![
            ann(1.0, "boundary"),
            ann(10.0, "stim start"),
            ann(15.0, "eyes closed"),
            ann(190.0, "stim end"),
        ];
        let events = extract_stim_events(&annotations).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, StimKind::Start);
        assert_eq!(events[0].source_index, 1);
        assert_eq!(events[1].kind, StimKind::End);
        assert_eq!(events[1].source_index, 3);
    }

    #[test]
    fn unsorted_input_is_ordered_by_onset() {
        let annotations = vec![ann(190.0, "stim end"), ann(10.0, "stim start")];
        let events = extract_stim_events(&annotations).unwrap();
        assert_eq!(events[0].onset, 10.0);
        assert_eq!(events[1].onset, 190.0);
    }

    #[test]
    fn no_stim_markers_is_valid_and_empty() {
        let annotations = vec![ann(0.0, "boundary")];
        assert!(extract_stim_events(&annotations).unwrap().is_empty());
    }

    #[test]
    fn empty_annotation_source_is_an_error() {
        assert!(extract_stim_events(&[]).is_err());
    }
}
