//! Phrase-list extraction: symptoms, recommendations and labeled lists
//! (key findings, differential diagnosis).

use vetsight_core::{Provenance, Tagged};

use super::sections::LabelPattern;
use super::split::{paragraphs, split_items, ITEM_DELIMITERS};

/// Leading lines used as symptoms when no line carries a symptom cue.
const SYMPTOM_FALLBACK_LINES: usize = 2;

/// Items listed after the first `:` of every line containing a cue word.
///
/// Only the segment between the first and second colon is used, so
/// `증상: 가려움: 심함` yields `가려움`.
pub fn extract_cued_items(text: &str, cues: &[String]) -> Vec<String> {
    let mut items = Vec::new();
    for line in paragraphs(text) {
        let line_lower = line.to_lowercase();
        if !cues.iter().any(|cue| line_lower.contains(cue.as_str())) {
            continue;
        }
        if let Some(value) = line.split(':').nth(1) {
            items.extend(split_items(value, ITEM_DELIMITERS));
        }
    }
    items
}

/// Symptom phrases. Without any cued line, the first two non-empty lines stand in.
pub fn extract_symptoms(text: &str, cues: &[String]) -> Tagged<Vec<String>> {
    let items = extract_cued_items(text, cues);
    if !items.is_empty() {
        return Tagged::new(items, Provenance::KeywordScan);
    }

    let leading: Vec<String> = paragraphs(text)
        .into_iter()
        .take(SYMPTOM_FALLBACK_LINES)
        .map(str::to_string)
        .collect();
    if leading.is_empty() {
        Tagged::new(leading, Provenance::Default)
    } else {
        Tagged::new(leading, Provenance::Fallback)
    }
}

/// Recommendation phrases; no fallback.
pub fn extract_recommendations(text: &str, cues: &[String]) -> Vec<String> {
    extract_cued_items(text, cues)
}

/// Items of the first occurrence of a labeled one-line field.
pub fn extract_listed(text: &str, field: &LabelPattern) -> Vec<String> {
    field
        .line(text)
        .map(|value| split_items(value, ITEM_DELIMITERS))
        .unwrap_or_default()
}
