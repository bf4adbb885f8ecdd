//! Heuristic report extraction: labeled fields, phrase lists, rule-table
//! classification, candidate diseases and a hedging-based confidence score.
//!
//! Everything here is lexical. Each extractor degrades to an empty list or
//! a fixed default instead of failing.

pub mod classify;
pub mod confidence;
pub mod diseases;
pub mod phrases;
pub mod sections;
pub mod split;

pub use classify::{categorize_sign, classify_severity, classify_urgency, group_signs};
pub use diseases::DiseaseExtractor;
pub use sections::{LabelPattern, SectionPatterns};
pub use split::split_items;
