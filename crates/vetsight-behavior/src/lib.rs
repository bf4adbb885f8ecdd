//! Video behavior reports.
//!
//! The upstream model is asked to answer with a fenced JSON document. This
//! crate pulls that document out of the response and deserializes it. When
//! no usable JSON is present it returns a stub record instead; it does not
//! run the heuristic text pipeline on these reports.

pub mod parse;
pub mod types;

pub use parse::{extract_json_block, parse_behavior_report};
pub use types::*;
