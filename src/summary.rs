//! Human-readable session summary.
//!
//! A fixed-width text report written next to the CSV tables, covering the
//! configuration in effect, protocol timing, the omission log, and wave
//! counts.  Meant for eyeballing data quality, not for machine consumption.

use crate::config::PipelineConfig;
use crate::SessionOutput;
use std::fmt::Write;

/// Render the session report as a string.
pub fn render_summary(out: &SessionOutput, cfg: &PipelineConfig) -> String {
    let mut s = String::new();

    let _ = writeln!(s, "Session Summary");
    let _ = writeln!(s, "===============");
    let _ = writeln!(
        s,
        "Stim pair duration bounds: {}-{} s",
        cfg.min_duration, cfg.max_duration
    );
    let _ = writeln!(
        s,
        "Analysis windows: pre {} s, post {} s ({})",
        cfg.pre_window, cfg.post_window, cfg.overlap_policy
    );
    let _ = writeln!(s);

    let _ = writeln!(s, "Stim Protocols");
    let _ = writeln!(s, "==============");
    if out.protocols.is_empty() {
        let _ = writeln!(s, "No valid stim protocols found.");
    } else {
        let header = format!(
            "{:<10}{:<20}{:<20}{:<15}",
            "Protocol", "Stim Start (s)", "Stim End (s)", "Duration (s)"
        );
        let _ = writeln!(s, "{header}");
        let _ = writeln!(s, "{}", "-".repeat(header.len()));
        for p in &out.protocols {
            let _ = writeln!(
                s,
                "{:<10}{:<20}{:<20}{:<15}",
                p.number,
                format!("{:.2}", p.stim.start),
                format!("{:.2}", p.stim.end),
                format!("{:.2}", p.stim.duration())
            );
        }
        if !out.gaps.is_empty() {
            let gaps: Vec<String> = out.gaps.iter().map(|g| format!("{g:.2}")).collect();
            let _ = writeln!(s, "Inter-protocol gaps (s): {}", gaps.join(", "));
        }
        if !out.overlaps.is_empty() {
            let _ = writeln!(s, "Window overlap adjustments: {}", out.overlaps.len());
        }
    }
    let _ = writeln!(s);

    let _ = writeln!(s, "Omitted or Unexpected Stim Events");
    let _ = writeln!(s, "=================================");
    if out.omitted.is_empty() {
        let _ = writeln!(s, "No omitted or unexpected stim events.");
    } else {
        let header =
            format!("{:<10}{:<15}{:<25}{:<40}", "Index", "Onset (s)", "Description", "Reason");
        let _ = writeln!(s, "{header}");
        let _ = writeln!(s, "{}", "-".repeat(header.len()));
        for o in &out.omitted {
            let _ = writeln!(
                s,
                "{:<10}{:<15}{:<25}{:<40}",
                o.event_index,
                format!("{:.2}", o.event_onset),
                o.event_description.as_deref().unwrap_or("stim start & stim end"),
                o.reason
            );
        }
    }
    let _ = writeln!(s);

    let _ = writeln!(s, "Slow Waves");
    let _ = writeln!(s, "==========");
    let _ = writeln!(s, "Classified: {}", out.waves.len());
    let _ = writeln!(s, "Outside all windows: {}", out.dropped_waves);

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annot::Annotation;
    use crate::run_session;

    fn ann(onset: f64, description: &str) -> Annotation {
        Annotation { onset, duration: 0.0, description: description.to_string() }
    }

    #[test]
    fn summary_lists_protocols_and_omissions() {
        let annotations = vec![
            ann(30.0, "stim start"),
            ann(215.0, "stim end"),
            ann(300.0, "stim end"), // stray
        ];
        let cfg = PipelineConfig::default();
        let out = run_session(&annotations, &[], None, &cfg).unwrap();
        let text = render_summary(&out, &cfg);
        assert!(text.contains("Stim Protocols"));
        assert!(text.contains("30.00"));
        assert!(text.contains("unexpected event 'stim end'"));
        assert!(text.contains("Classified: 0"));
    }

    #[test]
    fn empty_session_summary_is_explicit() {
        let cfg = PipelineConfig::default();
        let out = run_session(&[ann(1.0, "boundary")], &[], None, &cfg).unwrap();
        let text = render_summary(&out, &cfg);
        assert!(text.contains("No valid stim protocols found."));
        assert!(text.contains("No omitted or unexpected stim events."));
    }
}
