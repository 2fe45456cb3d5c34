// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod interpret;
pub mod persistence;
pub mod phonemes;
pub mod scoring;

pub use crate::core::engine::{Interpretation, OracleEngine, Reading, WordReading};
pub use crate::core::profiles::ProfileRegistry;
pub use crate::core::types::{ScriptProfile, WordOutcome, UNAVAILABLE_SENTINEL};
