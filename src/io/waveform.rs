//! Decoded single-channel waveform

/// Mono samples plus their sample rate
///
/// Immutable once built. Analysis borrows it; nothing keeps a reference after
/// the call returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap decoded samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Samples in playback order
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` when there are no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds, 0.0 for a zero sample rate
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples.len() as f32 / self.sample_rate as f32
        }
    }

    /// Give the sample buffer back
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let wf = Waveform::new(vec![0.0; 22050], 44100);
        assert_eq!(wf.len(), 22050);
        assert!((wf.duration_seconds() - 0.5).abs() < 1e-6);
        assert_eq!(Waveform::new(vec![0.0; 10], 0).duration_seconds(), 0.0);
    }

    #[test]
    fn test_into_samples() {
        let wf = Waveform::new(vec![0.25, -0.5], 8000);
        assert!(!wf.is_empty());
        assert_eq!(wf.into_samples(), vec![0.25, -0.5]);
    }
}
