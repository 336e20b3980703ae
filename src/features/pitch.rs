//! Fundamental frequency estimation
//!
//! Time-domain pitch estimate for the onset of a one-shot, biased towards the
//! sub-bass band where kicks and 808s live.
//!
//! # Algorithm
//!
//! 1. Take a window from the start of the trimmed signal, at least two periods
//!    of the lowest searched frequency long
//! 2. Compute the normalized autocorrelation (NACF) for every lag in the search band:
//!    `r(L) = Σ x[i]·x[i+L] / sqrt(E[0..n-L] · E[L..n])`
//! 3. Pick local maxima of `r(L)` as candidates
//! 4. Multiply candidates whose frequency falls in the bias band by `low_freq_bias`,
//!    unless the candidate is only a subharmonic of a shorter-lag peak
//! 5. Treat candidates within `octave_tolerance` of the best score as ties and keep
//!    the shortest lag (highest frequency), which avoids octave-down errors
//! 6. Refine the winning lag with parabolic interpolation; frequency = sample_rate / lag
//! 7. Report best score / best unrelated competitor as the confidence ratio
//!
//! Normalizing by the energy of both overlapping segments keeps decaying
//! signals (every one-shot) from favouring short lags.
//!
//! # Example
//!
//! ```
//! use sample_dna::config::PitchConfig;
//! use sample_dna::features::pitch::estimate_fundamental;
//!
//! let sr = 44100;
//! let samples: Vec<f32> = (0..8192)
//!     .map(|i| (2.0 * std::f32::consts::PI * 55.0 * i as f32 / sr as f32).sin())
//!     .collect();
//!
//! let pitch = estimate_fundamental(&samples, sr, &PitchConfig::default());
//! assert!((pitch.frequency_hz - 55.0).abs() < 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::PitchConfig;

/// Numerical stability epsilon
const EPSILON: f64 = 1e-10;

/// Relative error allowed when testing two lags for an integer ratio
const HARMONIC_TOLERANCE: f32 = 0.03;

/// Candidates closer than this (in lags) to the winner are the same peak
const ADJACENT_LAGS: usize = 2;

/// Result of fundamental frequency estimation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchEstimate {
    /// Estimated fundamental in Hz, 0.0 when unpitched
    pub frequency_hz: f32,

    /// Best score / strongest unrelated competitor, capped at `max_confidence_ratio`
    ///
    /// 0.0 when unpitched.
    pub confidence_ratio: f32,

    /// Normalized autocorrelation at the winning lag (0.0-1.0)
    pub periodicity: f32,
}

impl PitchEstimate {
    /// No usable fundamental
    pub fn unpitched() -> Self {
        Self::default()
    }

    /// `true` when a fundamental was found
    pub fn is_pitched(&self) -> bool {
        self.frequency_hz > 0.0
    }
}

/// Autocorrelation peak candidate
#[derive(Debug, Clone, Copy)]
struct LagPeak {
    lag: usize,
    /// Normalized correlation
    raw: f32,
    /// Correlation after the low-frequency bias
    score: f32,
}

/// Estimate the fundamental frequency of the onset of `samples`
///
/// `samples` should already be trimmed so that index 0 is the onset. Only the
/// first `config.window_size` samples are used, widened at high sample rates
/// to hold two periods of `config.min_freq_hz`.
///
/// # Arguments
///
/// * `samples` - Trimmed mono samples
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Search band, bias and tie-breaking parameters
///
/// # Returns
///
/// [`PitchEstimate::unpitched`] for noise, silence, too-short input, or a
/// result outside the plausible range. Never fails.
pub fn estimate_fundamental(samples: &[f32], sample_rate: u32, config: &PitchConfig) -> PitchEstimate {
    if sample_rate == 0 || samples.is_empty() {
        return PitchEstimate::unpitched();
    }

    let sr = sample_rate as f32;

    // Long enough for two periods of the lowest searched frequency at any rate
    let min_window = (2.0 * sr / config.min_freq_hz).ceil() as usize + ADJACENT_LAGS;
    let n = config.window_size.max(min_window).min(samples.len());
    let window = &samples[..n];

    let lag_min = ((sr / config.max_freq_hz).floor() as usize).max(1);
    let lag_max = ((sr / config.min_freq_hz).ceil() as usize).min(n / 2);

    if lag_max < lag_min + ADJACENT_LAGS {
        log::debug!(
            "Pitch search band empty: {} samples, lags {}..{}",
            n,
            lag_min,
            lag_max
        );
        return PitchEstimate::unpitched();
    }

    log::debug!(
        "Estimating fundamental: {} samples at {} Hz, lags {}..={}",
        n,
        sample_rate,
        lag_min,
        lag_max
    );

    let nacf = normalized_autocorrelation(window, lag_min - 1, lag_max + 1);
    let peaks = find_peaks(&nacf, lag_min, lag_max, sr, config);

    let best = match select_best(&peaks, config.octave_tolerance) {
        Some(best) => best,
        None => return PitchEstimate::unpitched(),
    };

    if best.raw < config.min_periodicity {
        log::debug!(
            "Best periodicity {:.3} at lag {} below {:.3}: unpitched",
            best.raw,
            best.lag,
            config.min_periodicity
        );
        return PitchEstimate::unpitched();
    }

    let lag = refine_lag(&nacf, best.lag);
    let frequency_hz = sr / lag;

    if frequency_hz < config.plausible_min_hz || frequency_hz > config.plausible_max_hz {
        log::warn!(
            "Rejected implausible fundamental {:.1} Hz (range {:.0}-{:.0} Hz)",
            frequency_hz,
            config.plausible_min_hz,
            config.plausible_max_hz
        );
        return PitchEstimate::unpitched();
    }

    let confidence_ratio = confidence_ratio(&peaks, &best, config.max_confidence_ratio);

    log::debug!(
        "Fundamental {:.2} Hz (lag {:.2}, periodicity {:.3}, ratio {:.2})",
        frequency_hz,
        lag,
        best.raw,
        confidence_ratio
    );

    PitchEstimate {
        frequency_hz,
        confidence_ratio,
        periodicity: best.raw.clamp(0.0, 1.0),
    }
}

/// NACF for lags `lo..=hi`, indexed by lag (entries below `lo` are 0)
fn normalized_autocorrelation(window: &[f32], lo: usize, hi: usize) -> Vec<f32> {
    let n = window.len();
    let mut prefix = Vec::with_capacity(n + 1);
    let mut acc = 0.0f64;
    prefix.push(0.0);
    for &x in window {
        acc += (x as f64) * (x as f64);
        prefix.push(acc);
    }

    let mut nacf = vec![0.0f32; hi + 1];
    for lag in lo..=hi.min(n.saturating_sub(1)) {
        let head_energy = prefix[n - lag];
        let tail_energy = prefix[n] - prefix[lag];
        if head_energy <= EPSILON || tail_energy <= EPSILON {
            continue;
        }

        let dot: f64 = window[..n - lag]
            .iter()
            .zip(&window[lag..])
            .map(|(&a, &b)| a as f64 * b as f64)
            .sum();

        nacf[lag] = (dot / (head_energy * tail_energy).sqrt()) as f32;
    }
    nacf
}

/// Local maxima of the NACF in `lag_min..=lag_max`, with bias applied
fn find_peaks(nacf: &[f32], lag_min: usize, lag_max: usize, sr: f32, config: &PitchConfig) -> Vec<LagPeak> {
    let mut peaks: Vec<LagPeak> = Vec::new();

    for lag in lag_min..=lag_max {
        let v = nacf[lag];
        if v <= 0.0 || v <= nacf[lag - 1] || v < nacf[lag + 1] {
            continue;
        }

        let freq = sr / lag as f32;
        let in_bias_band = freq >= config.bias_band_low_hz && freq <= config.bias_band_high_hz;
        let biased = in_bias_band && !is_subharmonic(&peaks, lag, v, config.octave_tolerance);

        peaks.push(LagPeak {
            lag,
            raw: v,
            score: if biased { v * config.low_freq_bias } else { v },
        });
    }

    peaks
}

/// A long lag is a subharmonic when a shorter-lag peak of comparable strength
/// divides it
fn is_subharmonic(shorter: &[LagPeak], lag: usize, raw: f32, tolerance: f32) -> bool {
    shorter.iter().any(|q| {
        q.raw >= raw * (1.0 - tolerance)
            && integer_ratio(lag, q.lag).is_some_and(|k| k >= 2)
    })
}

/// `Some(k)` when the longer lag is within tolerance of `k` times the shorter
fn integer_ratio(a: usize, b: usize) -> Option<u32> {
    let (long, short) = if a >= b { (a, b) } else { (b, a) };
    if short == 0 {
        return None;
    }
    let ratio = long as f32 / short as f32;
    let k = ratio.round();
    if k >= 1.0 && (ratio - k).abs() / k <= HARMONIC_TOLERANCE {
        Some(k as u32)
    } else {
        None
    }
}

/// Shortest-lag peak within `tolerance` of the top score
fn select_best(peaks: &[LagPeak], tolerance: f32) -> Option<LagPeak> {
    let max_score = peaks.iter().map(|p| p.score).fold(f32::NEG_INFINITY, f32::max);
    if !max_score.is_finite() {
        return None;
    }
    let cutoff = max_score * (1.0 - tolerance);
    peaks.iter().copied().find(|p| p.score >= cutoff)
}

/// Parabolic interpolation around an integer lag
fn refine_lag(nacf: &[f32], lag: usize) -> f32 {
    let a = nacf[lag - 1];
    let b = nacf[lag];
    let c = nacf[lag + 1];
    let denom = a - 2.0 * b + c;
    if denom.abs() < 1e-6 {
        return lag as f32;
    }
    let offset = (0.5 * (a - c) / denom).clamp(-0.5, 0.5);
    lag as f32 + offset
}

fn confidence_ratio(peaks: &[LagPeak], best: &LagPeak, max_ratio: f32) -> f32 {
    let second = peaks
        .iter()
        .filter(|p| p.lag.abs_diff(best.lag) > ADJACENT_LAGS)
        .filter(|p| integer_ratio(p.lag, best.lag).is_none())
        .map(|p| p.score)
        .fold(0.0f32, f32::max);

    if second <= EPSILON as f32 {
        max_ratio
    } else {
        (best.score / second).min(max_ratio)
    }
}
