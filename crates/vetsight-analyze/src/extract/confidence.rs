//! Confidence estimate from hedging language.

use vetsight_core::ConfidenceConfig;

/// Occurrences of `needle` in `haystack`, overlapping matches included.
pub fn count_overlapping(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack
        .char_indices()
        .filter(|(i, _)| haystack[*i..].starts_with(needle))
        .count()
}

/// Total hedging-phrase occurrences, case-insensitive.
pub fn count_hedges(text: &str, phrases: &[String]) -> usize {
    let text_lower = text.to_lowercase();
    phrases
        .iter()
        .map(|p| count_overlapping(&text_lower, &p.to_lowercase()))
        .sum()
}

/// `baseline - penalty * hedges`, clamped into `[min, max]`.
///
/// `config` must have passed `AnalyzerConfig::validate`.
pub(crate) fn estimate_confidence(text: &str, phrases: &[String], config: &ConfidenceConfig) -> f64 {
    let hedges = count_hedges(text, phrases);
    let raw = config.baseline - config.penalty_per_hedge * hedges as f64;
    raw.clamp(config.min, config.max)
}
