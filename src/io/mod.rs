//! Audio I/O modules
//!
//! Audio decoding using Symphonia and the decoded waveform type.

pub mod decoder;
pub mod waveform;
