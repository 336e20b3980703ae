//! Waveform preprocessing modules
//!
//! This module contains utilities for preparing a decoded waveform for analysis:
//! - Leading silence detection and trimming
//! - Peak normalization
//! - Channel extraction (interleaved multi-channel to a single channel)

pub mod channel_mixer;
pub mod normalization;
pub mod silence;
