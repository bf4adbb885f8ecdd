//! VetSight Core — analysis record types, rule-table configuration, errors.

pub mod config;
pub mod error;
pub mod types;

pub use config::{AnalyzerConfig, BehaviorStubText, ConfidenceConfig, Rule, SectionLabels};
pub use error::{Error, Result};
pub use types::*;
