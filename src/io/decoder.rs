//! Audio decoding using Symphonia
//!
//! [`AudioDecoder`] is owned by the caller and passed wherever decoding
//! happens, one per worker thread. It keeps a reusable interleaved scratch
//! buffer between files; nothing about decoding is process-wide.
//!
//! # Example
//!
//! ```no_run
//! use sample_dna::io::decoder::AudioDecoder;
//!
//! let mut decoder = AudioDecoder::new();
//! let waveform = decoder.decode_file("Kicks/Deep_Kick_01.wav")?;
//! println!("{} samples at {} Hz", waveform.len(), waveform.sample_rate());
//! # Ok::<(), sample_dna::AnalysisError>(())
//! ```

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::waveform::Waveform;
use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::extract_channel;

/// Caller-owned decoding resource
#[derive(Debug, Default)]
pub struct AudioDecoder {
    /// Channel kept from multi-channel files (default: 0)
    pub channel: usize,

    /// Stop after this many seconds of audio, `None` to decode everything
    pub max_duration_s: Option<f32>,

    interleaved: Vec<f32>,
}

impl AudioDecoder {
    /// Decoder keeping channel 0 of the whole file
    pub fn new() -> Self {
        Self::default()
    }

    /// Only decode the first `seconds` of each file
    ///
    /// Analysis only looks at the leading couple of seconds, so long loops
    /// need not be decoded in full.
    pub fn with_max_duration(mut self, seconds: f32) -> Self {
        self.max_duration_s = Some(seconds);
        self
    }

    /// Keep `channel` instead of channel 0
    pub fn with_channel(mut self, channel: usize) -> Self {
        self.channel = channel;
        self
    }

    /// Decode the file at `path`
    ///
    /// # Errors
    ///
    /// `AnalysisError::Io` if the file cannot be opened,
    /// `AnalysisError::DecodingError` for unsupported or corrupt audio.
    pub fn decode_file(&mut self, path: impl AsRef<Path>) -> Result<Waveform, AnalysisError> {
        let path = path.as_ref();
        log::debug!("Decoding audio file: {}", path.display());

        let file = File::open(path)?;
        let extension = path.extension().and_then(|e| e.to_str());
        self.decode_source(Box::new(file), extension)
    }

    /// Decode any Symphonia media source
    ///
    /// # Arguments
    ///
    /// * `source` - Media source (file, in-memory cursor, ...)
    /// * `extension_hint` - File extension used to speed up format probing
    ///
    /// # Errors
    ///
    /// `AnalysisError::DecodingError` when no audio track is found, the sample
    /// rate is unknown, or the selected channel does not exist.
    pub fn decode_source(
        &mut self,
        source: Box<dyn MediaSource>,
        extension_hint: Option<&str>,
    ) -> Result<Waveform, AnalysisError> {
        let mss = MediaSourceStream::new(source, Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = extension_hint {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AnalysisError::DecodingError(format!("Unsupported format: {}", e)))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AnalysisError::DecodingError("No supported audio track".to_string()))?;

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| AnalysisError::DecodingError("Sample rate unknown".to_string()))?;
        let mut decoder =
            symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

        let max_frames = self
            .max_duration_s
            .map(|s| (s.max(0.0) * sample_rate as f32).ceil() as usize);

        self.interleaved.clear();
        let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    channels = spec.channels.count();
                    let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    buf.copy_interleaved_ref(decoded);
                    self.interleaved.extend_from_slice(buf.samples());
                }
                Err(SymphoniaError::DecodeError(msg)) => {
                    log::warn!("Skipping corrupt packet: {}", msg);
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            if let Some(limit) = max_frames {
                if channels > 0 && self.interleaved.len() / channels >= limit {
                    break;
                }
            }
        }

        if channels == 0 {
            return Err(AnalysisError::DecodingError("Channel layout unknown".to_string()));
        }

        let mut samples = extract_channel(&self.interleaved, channels, self.channel)
            .map_err(|e| AnalysisError::DecodingError(e.to_string()))?;
        if let Some(limit) = max_frames {
            samples.truncate(limit);
        }

        log::debug!(
            "Decoded {} samples at {} Hz ({} channels, kept channel {})",
            samples.len(),
            sample_rate,
            channels,
            self.channel
        );

        Ok(Waveform::new(samples, sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let mut decoder = AudioDecoder::new();
        let result = decoder.decode_file("/definitely/not/here.wav");
        assert!(matches!(result, Err(AnalysisError::Io(_))));
    }

    #[test]
    fn test_garbage_is_decoding_error() {
        let mut decoder = AudioDecoder::new();
        let bytes = vec![0x42u8; 1024];
        let result = decoder.decode_source(Box::new(std::io::Cursor::new(bytes)), None);
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }

    #[test]
    fn test_builder() {
        let decoder = AudioDecoder::new().with_channel(1).with_max_duration(2.0);
        assert_eq!(decoder.channel, 1);
        assert_eq!(decoder.max_duration_s, Some(2.0));
    }
}
