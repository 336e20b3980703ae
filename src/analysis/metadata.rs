//! Analysis metadata structures

use serde::{Deserialize, Serialize};

use super::result::AnalysisFlag;

/// Whether a file is a single hit or a loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleKind {
    /// Shorter than the loop threshold
    OneShot,
    /// At or above the loop threshold
    Loop,
}

impl SampleKind {
    /// Classify by untrimmed duration
    pub fn from_duration(duration_seconds: f32, loop_min_duration_s: f32) -> Self {
        if duration_seconds < loop_min_duration_s {
            SampleKind::OneShot
        } else {
            SampleKind::Loop
        }
    }
}

/// Analysis metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    /// Algorithm version
    pub algorithm_version: String,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Untrimmed duration in seconds
    pub duration_seconds: f32,

    /// Samples of leading silence removed before analysis
    pub onset_offset_samples: usize,

    /// One-shot or loop
    pub sample_kind: SampleKind,

    /// Analysis flags, in the order they were raised
    pub flags: Vec<AnalysisFlag>,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            sample_rate: 0,
            duration_seconds: 0.0,
            onset_offset_samples: 0,
            sample_kind: SampleKind::OneShot,
            flags: vec![],
        }
    }
}
