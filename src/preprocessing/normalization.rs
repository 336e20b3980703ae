//! Peak normalization
//!
//! Features that compare against the waveform's own peak (decay fraction,
//! ZCR gate) are scale-invariant already; normalization exists so
//! downstream consumers and absolute thresholds see a consistent level.
//!
//! # Example
//!
//! ```
//! use sample_dna::preprocessing::normalization::normalize_peak;
//!
//! let normalized = normalize_peak(&[0.25, -0.5, 0.1]);
//! assert_eq!(normalized, vec![0.5, -1.0, 0.2]);
//! ```

/// Peak amplitudes at or below this are treated as silence
const EPSILON: f32 = 1e-10;

/// Largest absolute sample value
pub fn peak_amplitude(samples: &[f32]) -> f32 {
    samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max)
}

/// Rescale samples in place by `1 / max(|sample|)`
///
/// Returns the linear gain applied. Silent input (peak of 0) is left
/// unchanged and reports a gain of 1.0.
pub fn normalize_peak_in_place(samples: &mut [f32]) -> f32 {
    let peak = peak_amplitude(samples);

    if peak <= EPSILON {
        log::debug!("Peak normalization skipped: input is silent");
        return 1.0;
    }

    let gain = 1.0 / peak;
    for sample in samples.iter_mut() {
        *sample *= gain;
    }

    log::debug!(
        "Peak normalization: peak={:.4}, gain={:.2} dB",
        peak,
        20.0 * gain.log10()
    );

    gain
}

/// Copying variant of [`normalize_peak_in_place`]
pub fn normalize_peak(samples: &[f32]) -> Vec<f32> {
    let mut out = samples.to_vec();
    normalize_peak_in_place(&mut out);
    out
}
