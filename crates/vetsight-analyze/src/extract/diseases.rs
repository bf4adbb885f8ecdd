//! Candidate-disease extraction.
//!
//! Three strategies, in order:
//! 1. the "likely diseases" field, `name (qualifier)` entries;
//! 2. the "differential diagnosis" field, added as low-probability entries;
//! 3. only when 1 and 2 found nothing, free-text lines with disease cues.
//!
//! Names are unique across the output; the first occurrence wins.
//! Probability is only read from a parenthesized qualifier. A probability
//! written in prose is not inferred.

use regex::Regex;

use vetsight_core::config::first_match;
use vetsight_core::{
    AnalyzerConfig, DiseaseEntry, Probability, Provenance, Result, Severity, Tagged,
};

use super::classify::classify_severity;
use super::phrases::{extract_recommendations, extract_symptoms};
use super::sections::SectionPatterns;
use super::split::{paragraphs, split_items, ENTRY_DELIMITERS};

/// Pattern capturing the disease name after a name label in prose,
/// e.g. `진단: 외이염` or `질환 아토피 피부염`.
pub fn compile_name_pattern(labels: &[String]) -> Result<Regex> {
    let alternation = labels
        .iter()
        .map(|l| regex::escape(l.trim()))
        .collect::<Vec<_>>()
        .join("|");
    Ok(Regex::new(&format!(
        r"(?i)(?:{}):?\s*([^.,:;\n]+)",
        alternation
    ))?)
}

/// Split `entry` into name and the text of its trailing `( … )` qualifier.
fn split_qualifier(entry: &str) -> Option<(&str, &str)> {
    let close = entry.rfind(')')?;
    let open = entry[..close].rfind('(')?;
    let qualifier = &entry[open + 1..close];
    if qualifier.trim().is_empty() {
        return None;
    }
    Some((&entry[..open], qualifier))
}

fn push_unique(diseases: &mut Vec<DiseaseEntry>, entry: DiseaseEntry) {
    if !diseases.iter().any(|d| d.name == entry.name) {
        diseases.push(entry);
    }
}

/// Extracts candidate diseases with the patterns and rule tables of one analyzer.
pub struct DiseaseExtractor<'a> {
    pub config: &'a AnalyzerConfig,
    pub sections: &'a SectionPatterns,
    pub name_pattern: &'a Regex,
}

impl DiseaseExtractor<'_> {
    pub fn extract(&self, text: &str) -> Tagged<Vec<DiseaseEntry>> {
        let mut diseases = Vec::new();
        self.from_likely_field(text, &mut diseases);
        self.from_differential_field(text, &mut diseases);
        if !diseases.is_empty() {
            return Tagged::new(diseases, Provenance::StructuredField);
        }

        self.from_paragraphs(text, &mut diseases);
        if diseases.is_empty() {
            Tagged::new(diseases, Provenance::Default)
        } else {
            Tagged::new(diseases, Provenance::KeywordScan)
        }
    }

    fn from_likely_field(&self, text: &str, diseases: &mut Vec<DiseaseEntry>) {
        for value in self.sections.likely_diseases.lines(text) {
            for entry in split_items(value, ENTRY_DELIMITERS) {
                let (name, probability) = match split_qualifier(&entry) {
                    Some((name, qualifier)) => (name.trim(), Some(self.probability(qualifier))),
                    None => (entry.as_str(), None),
                };
                if name.is_empty() {
                    continue;
                }

                let severity = classify_severity(
                    &entry,
                    &self.sections.severity_assessment,
                    &self.config.severity_markers,
                    &self.config.severity_keywords,
                )
                .value;

                push_unique(
                    diseases,
                    DiseaseEntry {
                        name: name.to_string(),
                        symptoms: Vec::new(),
                        description: entry.clone(),
                        severity,
                        recommendations: Vec::new(),
                        probability,
                    },
                );
            }
        }
    }

    fn from_differential_field(&self, text: &str, diseases: &mut Vec<DiseaseEntry>) {
        for value in self.sections.differential_diagnosis.lines(text) {
            for name in split_items(value, ENTRY_DELIMITERS) {
                push_unique(
                    diseases,
                    DiseaseEntry {
                        name,
                        symptoms: Vec::new(),
                        description: self.config.differential_description.clone(),
                        severity: Severity::Medium,
                        recommendations: Vec::new(),
                        probability: Some(Probability::Low),
                    },
                );
            }
        }
    }

    fn from_paragraphs(&self, text: &str, diseases: &mut Vec<DiseaseEntry>) {
        for paragraph in paragraphs(text) {
            let paragraph_lower = paragraph.to_lowercase();
            if !self
                .config
                .disease_cues
                .iter()
                .any(|cue| paragraph_lower.contains(cue.as_str()))
            {
                continue;
            }

            let name = match self
                .name_pattern
                .captures(paragraph)
                .and_then(|cap| cap.get(1))
                .map(|m| m.as_str().trim())
            {
                Some(name) if !name.is_empty() => name,
                _ => continue,
            };

            let severity = first_match(&self.config.paragraph_severity, &paragraph_lower)
                .unwrap_or(Severity::Medium);

            push_unique(
                diseases,
                DiseaseEntry {
                    name: name.to_string(),
                    symptoms: extract_symptoms(paragraph, &self.config.symptom_cues).value,
                    description: paragraph.to_string(),
                    severity,
                    recommendations: extract_recommendations(
                        paragraph,
                        &self.config.recommendation_cues,
                    ),
                    probability: None,
                },
            );
        }
    }

    fn probability(&self, qualifier: &str) -> Probability {
        first_match(&self.config.probability_markers, &qualifier.to_lowercase())
            .unwrap_or(Probability::Low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        config: AnalyzerConfig,
        sections: SectionPatterns,
        name_pattern: Regex,
    }

    impl Fixture {
        fn new() -> Self {
            let config = AnalyzerConfig::default().lowercased();
            let sections = SectionPatterns::compile(&config.labels).unwrap();
            let name_pattern = compile_name_pattern(&config.disease_name_labels).unwrap();
            Self {
                config,
                sections,
                name_pattern,
            }
        }

        fn extract(&self, text: &str) -> Tagged<Vec<DiseaseEntry>> {
            DiseaseExtractor {
                config: &self.config,
                sections: &self.sections,
                name_pattern: &self.name_pattern,
            }
            .extract(text)
        }
    }

    #[test]
    fn test_split_qualifier() {
        assert_eq!(split_qualifier("아토피 (높음)"), Some(("아토피 ", "높음")));
        assert_eq!(split_qualifier("아토피"), None);
        assert_eq!(split_qualifier("아토피 ()"), None);
        assert_eq!(split_qualifier("(중간)"), Some(("", "중간")));
    }

    #[test]
    fn test_likely_field_with_probabilities() {
        let f = Fixture::new();
        let result = f.extract("- 가능성 높은 질병: 아토피 (높음), 알러지 (낮음); 옴 (중간)");
        assert_eq!(result.provenance, Provenance::StructuredField);

        let d = &result.value;
        assert_eq!(d.len(), 3);
        assert_eq!(d[0].name, "아토피");
        assert_eq!(d[0].probability, Some(Probability::High));
        assert_eq!(d[0].description, "아토피 (높음)");
        assert_eq!(d[1].name, "알러지");
        assert_eq!(d[1].probability, Some(Probability::Low));
        assert_eq!(d[1].severity, Severity::Low);
        assert_eq!(d[2].name, "옴");
        assert_eq!(d[2].probability, Some(Probability::Medium));
    }

    #[test]
    fn test_entry_without_parentheses_has_no_probability() {
        let f = Fixture::new();
        let result = f.extract("가능성 높은 질병: 피부염 가능성 높음");
        assert_eq!(result.value.len(), 1);
        assert_eq!(result.value[0].name, "피부염 가능성 높음");
        assert_eq!(result.value[0].probability, None);
    }

    #[test]
    fn test_entry_severity_from_its_own_fragment() {
        let f = Fixture::new();
        let result = f.extract("가능성 높은 질병: 파보 장염 (높음, 응급), 아토피 (중간)");
        // "(높음, 응급)" is split at the comma, so the first entry has no closing paren.
        assert_eq!(result.value[0].name, "파보 장염 (높음");
        assert_eq!(result.value[0].probability, None);
        assert_eq!(result.value[1].name, "응급)");
        assert_eq!(result.value[1].severity, Severity::Emergency);
        assert_eq!(result.value[2].name, "아토피");
        assert_eq!(result.value[2].severity, Severity::Medium);
    }

    #[test]
    fn test_differential_dedup_against_likely() {
        let f = Fixture::new();
        let text = "가능성 높은 질병: 아토피 (높음)\n감별진단: 아토피, 옴, 모낭충증";
        let d = f.extract(text).value;
        let names: Vec<&str> = d.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["아토피", "옴", "모낭충증"]);
        assert_eq!(d[0].probability, Some(Probability::High));
        assert_eq!(d[1].probability, Some(Probability::Low));
        assert_eq!(d[1].severity, Severity::Medium);
        assert_eq!(d[1].description, "감별진단으로 고려됨");
    }

    #[test]
    fn test_duplicate_likely_entries_keep_first() {
        let f = Fixture::new();
        let text = "가능성 높은 질병: 아토피 (높음)\n가능성 높은 질병: 아토피 (낮음)";
        let d = f.extract(text).value;
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].probability, Some(Probability::High));
    }

    #[test]
    fn test_paragraph_fallback() {
        let f = Fixture::new();
        let text = "전반적으로 양호합니다\n진단 외이염, 증상: 가려움, 냄새\n권장 관리: 귀 세정";
        let result = f.extract(text);
        assert_eq!(result.provenance, Provenance::KeywordScan);

        let d = &result.value;
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].name, "외이염");
        assert_eq!(d[0].description, "진단 외이염, 증상: 가려움, 냄새");
        assert_eq!(d[0].severity, Severity::Medium);
        assert_eq!(d[0].probability, None);
        assert_eq!(d[0].symptoms, vec!["가려움", "냄새"]);
        assert!(d[0].recommendations.is_empty());
    }

    #[test]
    fn test_paragraph_severity_order() {
        let f = Fixture::new();
        let d = f
            .extract("질환 피부염은 경미하지만 위험 요소가 있습니다")
            .value;
        assert_eq!(d[0].name, "피부염은 경미하지만 위험 요소가 있습니다");
        assert_eq!(d[0].severity, Severity::High);

        let d = f.extract("진단 췌장염, 응급 처치 필요").value;
        assert_eq!(d[0].name, "췌장염");
        assert_eq!(d[0].severity, Severity::Emergency);
    }

    #[test]
    fn test_nothing_found() {
        let f = Fixture::new();
        let result = f.extract("털 상태가 좋습니다");
        assert_eq!(result.provenance, Provenance::Default);
        assert!(result.value.is_empty());
    }
}
