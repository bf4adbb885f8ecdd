//! VetSight Analyze — turns a free-text diagnostic report into a structured
//! `AnalysisRecord` using labeled-field lookup, keyword rule tables and
//! hedging-phrase counting.

pub mod analyzer;
pub mod extract;

use once_cell::sync::Lazy;

use vetsight_core::{AnalysisMode, AnalysisRecord, AnalyzerConfig};

pub use analyzer::Analyzer;

/// Analyzer built from the default (Korean) rule set.
pub static DEFAULT_ANALYZER: Lazy<Analyzer> =
    Lazy::new(|| Analyzer::new(AnalyzerConfig::default()).expect("default analyzer config is valid"));

/// Analyze `text` with the default rule set.
pub fn analyze_response(
    text: &str,
    mode: AnalysisMode,
    subject_type: Option<&str>,
) -> AnalysisRecord {
    DEFAULT_ANALYZER.analyze(text, mode, subject_type)
}
