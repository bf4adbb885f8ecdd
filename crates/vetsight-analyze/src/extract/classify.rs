//! Rule-table classification: severity, urgency, medical-sign buckets and
//! the vet-visit flag.
//!
//! Severity and urgency share one resolution order: a recognizable
//! structured field wins, a whole-text keyword scan comes second, and a
//! fixed default covers a total miss. Rule tables are scanned in order, so
//! overlapping keywords resolve to the earlier (more severe) tier.

use vetsight_core::config::first_match;
use vetsight_core::{MedicalSigns, Provenance, Rule, Severity, SignCategory, Tagged, UrgencyLevel};

use super::sections::LabelPattern;
use super::split::{split_items, SIGN_DELIMITERS};

/// Structured field → keyword scan → default.
pub fn classify_tiered<L: Copy>(
    text: &str,
    field: &LabelPattern,
    markers: &[Rule<L>],
    keywords: &[Rule<L>],
    default: L,
) -> Tagged<L> {
    if let Some(token) = field.token(text) {
        if let Some(label) = first_match(markers, &token.to_lowercase()) {
            return Tagged::new(label, Provenance::StructuredField);
        }
    }

    match first_match(keywords, &text.to_lowercase()) {
        Some(label) => Tagged::new(label, Provenance::KeywordScan),
        None => Tagged::new(default, Provenance::Default),
    }
}

/// Severity of `text`; `medium` when nothing matches.
pub fn classify_severity(
    text: &str,
    field: &LabelPattern,
    markers: &[Rule<Severity>],
    keywords: &[Rule<Severity>],
) -> Tagged<Severity> {
    classify_tiered(text, field, markers, keywords, Severity::Medium)
}

/// Urgency of `text`; `normal` when nothing matches.
pub fn classify_urgency(
    text: &str,
    field: &LabelPattern,
    markers: &[Rule<UrgencyLevel>],
    keywords: &[Rule<UrgencyLevel>],
) -> Tagged<UrgencyLevel> {
    classify_tiered(text, field, markers, keywords, UrgencyLevel::Normal)
}

pub fn categorize_sign(phrase: &str, rules: &[Rule<SignCategory>]) -> SignCategory {
    first_match(rules, &phrase.to_lowercase()).unwrap_or(SignCategory::Other)
}

/// Put each phrase into exactly one bucket.
pub fn group_signs<'a>(
    phrases: impl IntoIterator<Item = &'a str>,
    rules: &[Rule<SignCategory>],
) -> MedicalSigns {
    let mut signs = MedicalSigns::default();
    for phrase in phrases {
        signs
            .bucket_mut(categorize_sign(phrase, rules))
            .push(phrase.to_string());
    }
    signs
}

/// Medical signs from the structured block, or from the already extracted
/// symptoms when the block is missing.
pub fn extract_medical_signs(
    text: &str,
    field: &LabelPattern,
    rules: &[Rule<SignCategory>],
    symptoms: &[String],
) -> Tagged<MedicalSigns> {
    if let Some(lines) = field.block(text) {
        let items: Vec<String> = lines
            .into_iter()
            .flat_map(|line| split_items(line, SIGN_DELIMITERS))
            .collect();
        if !items.is_empty() {
            let signs = group_signs(items.iter().map(String::as_str), rules);
            return Tagged::new(signs, Provenance::StructuredField);
        }
    }

    let signs = group_signs(symptoms.iter().map(String::as_str), rules);
    let provenance = if signs.is_empty() {
        Provenance::Default
    } else {
        Provenance::Fallback
    };
    Tagged::new(signs, provenance)
}

pub fn needs_vet_visit(text: &str, keywords: &[String]) -> bool {
    let text_lower = text.to_lowercase();
    keywords.iter().any(|kw| text_lower.contains(kw.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetsight_core::AnalyzerConfig;

    fn config() -> AnalyzerConfig {
        AnalyzerConfig::default().lowercased()
    }

    fn severity(text: &str) -> Tagged<Severity> {
        let c = config();
        let field = LabelPattern::compile(&c.labels.severity_assessment).unwrap();
        classify_severity(text, &field, &c.severity_markers, &c.severity_keywords)
    }

    fn urgency(text: &str) -> Tagged<UrgencyLevel> {
        let c = config();
        let field = LabelPattern::compile(&c.labels.urgency).unwrap();
        classify_urgency(text, &field, &c.urgency_markers, &c.urgency_keywords)
    }

    #[test]
    fn test_structured_severity_wins() {
        let s = severity("심각도 평가: 낮음\n생명에 지장이 있을 수 있는 응급 상황은 아닙니다");
        assert_eq!(s.value, Severity::Low);
        assert_eq!(s.provenance, Provenance::StructuredField);
    }

    #[test]
    fn test_unrecognized_field_falls_back_to_scan() {
        // The label itself carries "심각", a high-tier keyword.
        let s = severity("심각도 평가: 모름");
        assert_eq!(s.value, Severity::High);
        assert_eq!(s.provenance, Provenance::KeywordScan);
    }

    #[test]
    fn test_emergency_dominates_overlap() {
        let s = severity("위험한 상태로 치료가 필요합니다");
        assert_eq!(s.value, Severity::Emergency);
    }

    #[test]
    fn test_severity_scan_tiers() {
        assert_eq!(severity("보통 수준").value, Severity::Medium);
        assert_eq!(severity("가벼운 발적").value, Severity::Low);
    }

    #[test]
    fn test_severity_default() {
        let s = severity("털이 윤기 있어 보입니다");
        assert_eq!(s.value, Severity::Medium);
        assert_eq!(s.provenance, Provenance::Default);
    }

    #[test]
    fn test_urgency_field_and_scan() {
        let u = urgency("긴급도: 빠른 진료 필요");
        assert_eq!(u.value, UrgencyLevel::Prompt);
        assert_eq!(u.provenance, Provenance::StructuredField);

        let u = urgency("가능한 신속하게 내원하세요");
        assert_eq!(u.value, UrgencyLevel::Prompt);
        assert_eq!(u.provenance, Provenance::KeywordScan);

        let u = urgency("특이사항 없음");
        assert_eq!(u.value, UrgencyLevel::Normal);
        assert_eq!(u.provenance, Provenance::Default);
    }

    #[test]
    fn test_urgency_unrecognized_field_hits_label_keyword() {
        // "긴급도" contains the emergency keyword "긴급".
        assert_eq!(urgency("긴급도: 일반").value, UrgencyLevel::Emergency);
    }

    #[test]
    fn test_categorize_sign_first_match() {
        let c = config();
        assert_eq!(categorize_sign("피부 발적", &c.sign_categories), SignCategory::Skin);
        assert_eq!(categorize_sign("눈 충혈", &c.sign_categories), SignCategory::Eyes);
        // Both skin and posture terms: skin comes first.
        assert_eq!(categorize_sign("다리 피부 상처", &c.sign_categories), SignCategory::Skin);
        assert_eq!(categorize_sign("관절 부종", &c.sign_categories), SignCategory::Posture);
        assert_eq!(categorize_sign("잦은 기침", &c.sign_categories), SignCategory::Behavior);
        assert_eq!(categorize_sign("식욕 저하", &c.sign_categories), SignCategory::Other);
    }

    #[test]
    fn test_medical_signs_from_block() {
        let c = config();
        let field = LabelPattern::compile(&c.labels.medical_signs).unwrap();
        let text = "- 발견된 의학적 징후: 피부 발적, 눈 분비물\n  다리 절음; 식욕 저하\n- 심각도 평가: 중간";
        let signs = extract_medical_signs(text, &field, &c.sign_categories, &[]);
        assert_eq!(signs.provenance, Provenance::StructuredField);
        assert_eq!(signs.value.skin, vec!["피부 발적"]);
        assert_eq!(signs.value.eyes, vec!["눈 분비물"]);
        assert_eq!(signs.value.posture, vec!["다리 절음"]);
        assert_eq!(signs.value.other, vec!["식욕 저하"]);
        assert_eq!(signs.value.total(), 4);
    }

    #[test]
    fn test_medical_signs_from_nested_list() {
        let c = config();
        let field = LabelPattern::compile(&c.labels.medical_signs).unwrap();
        let text = "- 주요 발견사항: 귀 발적\n- 발견된 의학적 징후:\n  - 피부 발적\n  - 눈 충혈\n- 심각도 평가: 중간";
        let symptoms = vec!["귀 발적".to_string()];
        let signs = extract_medical_signs(text, &field, &c.sign_categories, &symptoms);
        assert_eq!(signs.provenance, Provenance::StructuredField);
        assert_eq!(signs.value.skin, vec!["피부 발적"]);
        assert_eq!(signs.value.eyes, vec!["눈 충혈"]);
        assert_eq!(signs.value.total(), 2);
    }

    #[test]
    fn test_medical_signs_fall_back_to_symptoms() {
        let c = config();
        let field = LabelPattern::compile(&c.labels.medical_signs).unwrap();
        let symptoms = vec!["탈모".to_string(), "호흡 곤란".to_string()];
        let signs = extract_medical_signs("징후 목록 없음", &field, &c.sign_categories, &symptoms);
        assert_eq!(signs.provenance, Provenance::Fallback);
        assert_eq!(signs.value.skin, vec!["탈모"]);
        assert_eq!(signs.value.behavior, vec!["호흡 곤란"]);

        let empty = extract_medical_signs("", &field, &c.sign_categories, &[]);
        assert_eq!(empty.provenance, Provenance::Default);
        assert!(empty.value.is_empty());
    }

    #[test]
    fn test_needs_vet_visit() {
        let c = config();
        assert!(needs_vet_visit("가까운 동물병원을 방문하세요", &c.vet_visit_keywords));
        assert!(!needs_vet_visit("집에서 쉬게 해주세요", &c.vet_visit_keywords));
    }
}
