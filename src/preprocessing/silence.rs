//! Leading silence detection and trimming
//!
//! Sample packs are full of files with a few milliseconds of dead air before
//! the transient. Every onset-relative measurement (pitch window, attack
//! window) is taken from the first audible sample, so trimming comes first.
//!
//! # Example
//!
//! ```
//! use sample_dna::preprocessing::silence::{find_onset, trim_leading_silence};
//!
//! let samples = [0.0, 0.0, 0.0005, 0.4, -0.3];
//! assert_eq!(find_onset(&samples, 0.001), 3);
//! assert_eq!(trim_leading_silence(&samples, 0.001), &[0.4, -0.3]);
//! ```

/// Index of the first sample whose absolute amplitude exceeds `threshold`
///
/// `threshold` is a linear amplitude, not dB. If no sample exceeds it the
/// waveform is treated as already trimmed and 0 is returned; silence is
/// detected later from the onset-window peak, not here.
pub fn find_onset(samples: &[f32], threshold: f32) -> usize {
    samples
        .iter()
        .position(|s| s.abs() > threshold)
        .unwrap_or(0)
}

/// Slice of `samples` starting at [`find_onset`]
pub fn trim_leading_silence(samples: &[f32], threshold: f32) -> &[f32] {
    let start = find_onset(samples, threshold);
    if start > 0 {
        log::debug!("Trimmed {} leading samples below {:.4}", start, threshold);
    }
    &samples[start..]
}
