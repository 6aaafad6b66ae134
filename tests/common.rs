/// Shared builders for pipeline integration tests.
use stimwave::{Annotation, DetectedWave, PipelineConfig};

#[allow(unused)]
pub fn ann(onset: f64, description: &str) -> Annotation {
    Annotation { onset, duration: 0.0, description: description.to_string() }
}

#[allow(unused)]
pub fn wave(start: f64, channel: &str) -> DetectedWave {
    DetectedWave {
        start,
        neg_peak: start + 0.3,
        mid_crossing: start + 0.6,
        pos_peak: start + 0.9,
        end: start + 1.2,
        duration: 1.2,
        val_neg_peak: -58.0,
        val_pos_peak: 26.0,
        ptp: 84.0,
        slope: 300.0,
        frequency: 0.83,
        channel: channel.to_string(),
        idx_channel: 0,
    }
}

/// Short duration bounds and windows so test sessions stay compact:
/// valid pairs 2-40 s, 10 s pre/post windows.
#[allow(unused)]
pub fn short_cfg() -> PipelineConfig {
    PipelineConfig {
        min_duration: 2.0,
        max_duration: 40.0,
        pre_window: 10.0,
        post_window: 10.0,
        ..PipelineConfig::default()
    }
}
