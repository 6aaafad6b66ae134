//! Pipeline configuration.
//!
//! [`PipelineConfig`] holds every tunable parameter for the stimulation
//! validation and classification pipeline.  All fields have defaults matching
//! the stimulation protocol the pipeline was built around (~3-minute pulses),
//! but none of the processing logic hard-codes them.

use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;

/// Policy for resolving overlap between one protocol's post-stim window and
/// the next protocol's pre-stim window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Clip both windows to the midpoint of the contested span (default).
    MidpointSplit,
    /// The earlier protocol keeps its full post-stim window; only the later
    /// protocol's pre-stim start is pushed forward.
    EarlierPriority,
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::MidpointSplit => write!(f, "midpoint-split"),
            OverlapPolicy::EarlierPriority => write!(f, "earlier-protocol-priority"),
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "midpoint-split" | "midpoint" => Ok(OverlapPolicy::MidpointSplit),
            "earlier-protocol-priority" | "earlier" => Ok(OverlapPolicy::EarlierPriority),
            other => Err(format!(
                "unknown overlap policy '{other}' (expected 'midpoint-split' or 'earlier-protocol-priority')"
            )),
        }
    }
}

/// Configuration for the full validation/classification pipeline.
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use stimwave::PipelineConfig;
///
/// let cfg = PipelineConfig {
///     min_duration: 2.0,    // accept much shorter stim pulses
///     max_duration: 40.0,
///     ..PipelineConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum accepted duration of a stim start→end pair in seconds.
    ///
    /// Pairs shorter than this are rejected as sensor glitches or stray
    /// markers and routed to the omission log.
    ///
    /// Default: `170.0` s.
    pub min_duration: f64,

    /// Maximum accepted duration of a stim start→end pair in seconds.
    ///
    /// Pairs longer than this usually indicate a lost `stim end` marker
    /// whose matching start belongs to a different protocol.
    ///
    /// Default: `220.0` s.
    pub max_duration: f64,

    /// Length of the pre-stim analysis window in seconds, looking back from
    /// each stimulation start.
    ///
    /// Default: `180.0` s (one nominal stimulation interval).
    pub pre_window: f64,

    /// Length of the post-stim analysis window in seconds, looking forward
    /// from each stimulation end.
    ///
    /// Default: `180.0` s.
    pub post_window: f64,

    /// How to resolve a post-stim window running into the next protocol's
    /// pre-stim window.  See [`OverlapPolicy`].
    ///
    /// Default: [`OverlapPolicy::MidpointSplit`].
    pub overlap_policy: OverlapPolicy,
}

impl Default for PipelineConfig {
    /// Returns the standard protocol configuration:
    /// 170–220 s pulses, 180 s pre/post windows, midpoint overlap split.
    fn default() -> Self {
        Self {
            min_duration: 170.0,
            max_duration: 220.0,
            pre_window: 180.0,
            post_window: 180.0,
            overlap_policy: OverlapPolicy::MidpointSplit,
        }
    }
}

impl PipelineConfig {
    /// Check the configuration before any processing starts.
    ///
    /// These are the only fatal errors in the pipeline: everything downstream
    /// degrades to omission records rather than failing.
    pub fn validate(&self) -> Result<()> {
        if !self.min_duration.is_finite() || self.min_duration < 0.0 {
            bail!("min_duration must be a non-negative number, got {}", self.min_duration);
        }
        if !self.max_duration.is_finite() || self.max_duration < self.min_duration {
            bail!(
                "max_duration ({}) must be >= min_duration ({})",
                self.max_duration,
                self.min_duration
            );
        }
        if !(self.pre_window.is_finite() && self.pre_window > 0.0) {
            bail!("pre_window must be a positive number of seconds, got {}", self.pre_window);
        }
        if !(self.post_window.is_finite() && self.post_window > 0.0) {
            bail!("post_window must be a positive number of seconds, got {}", self.post_window);
        }
        Ok(())
    }
}
