//! Windowed wave selection.
//!
//! A detector often reports the same physiological wave on several channels
//! within a fraction of a second.  Downstream per-wave extraction wants one
//! representative per burst: waves whose starts fall within `window` seconds
//! of the burst's first wave end are grouped, and one wave per group is kept,
//! either the first or the one with the deepest negative peak.

use crate::classify::ClassifiedWave;
use log::info;

/// Reduce `waves` (in canonical table order, which is chronological in wave
/// start) to one representative per `window`-second burst.
pub fn select_waves(
    waves: &[ClassifiedWave],
    window: f64,
    pick_most_negative: bool,
) -> Vec<ClassifiedWave> {
    let mut selected = Vec::new();
    let mut group: Vec<&ClassifiedWave> = Vec::new();
    let mut last_end = f64::NEG_INFINITY;

    for w in waves {
        if w.wave.start > last_end + window {
            if let Some(pick) = pick_from(&group, pick_most_negative) {
                selected.push(pick.clone());
            }
            group.clear();
            last_end = w.wave.end;
        }
        group.push(w);
    }
    if let Some(pick) = pick_from(&group, pick_most_negative) {
        selected.push(pick.clone());
    }

    info!(
        "selected {} of {} waves (window {window}s, {})",
        selected.len(),
        waves.len(),
        if pick_most_negative { "most negative" } else { "first" }
    );
    selected
}

fn pick_from<'a>(group: &[&'a ClassifiedWave], most_negative: bool) -> Option<&'a ClassifiedWave> {
    if most_negative {
        group
            .iter()
            .min_by(|a, b| a.wave.val_neg_peak.total_cmp(&b.wave.val_neg_peak))
            .copied()
    } else {
        group.first().copied()
    }
}

/// The four standard selection exports: 0.5 s / 1.0 s windows, first /
/// most-negative representative.  Returns `(table_name, rows)` pairs.
pub fn standard_selections(waves: &[ClassifiedWave]) -> Vec<(String, Vec<ClassifiedWave>)> {
    let mut out = Vec::with_capacity(4);
    for window in [0.5, 1.0] {
        for most_negative in [false, true] {
            let suffix = if most_negative { "most_negative" } else { "first" };
            let name = format!("selected_waves_{}ms_{suffix}", (window * 1000.0) as u32);
            out.push((name, select_waves(waves, window, most_negative)));
        }
    }
    out
}
