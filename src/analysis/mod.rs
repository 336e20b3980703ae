//! Analysis and result aggregation modules
//!
//! Combines the acoustic profile and path tags into the final record:
//! - Fusion & veto classification
//! - Confidence scoring
//! - Result types
//! - Metadata

pub mod confidence;
pub mod fusion;
pub mod metadata;
pub mod result;
