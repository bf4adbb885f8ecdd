//! Analyzer configuration: section labels, ordered keyword rule tables,
//! confidence tuning and behavior-report stub wording.
//!
//! The defaults reproduce the Korean vocabulary the upstream model is
//! prompted to answer in. A JSON file can override any subset of fields;
//! missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::types::{Probability, Severity, SignCategory, UrgencyLevel};

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "VETSIGHT_CONFIG";

/// One row of an ordered rule table: text containing any keyword gets `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule<L> {
    pub label: L,
    pub keywords: Vec<String>,
}

impl<L: Copy> Rule<L> {
    pub fn new(label: L, keywords: &[&str]) -> Self {
        Self {
            label,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// True if `text` contains any keyword. Callers normalize case.
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|kw| text.contains(kw.as_str()))
    }
}

/// First matching rule wins; table order is priority order.
pub fn first_match<L: Copy>(rules: &[Rule<L>], text: &str) -> Option<L> {
    rules.iter().find(|r| r.matches(text)).map(|r| r.label)
}

/// Labels of the structured fields a report may contain.
///
/// Words of a label are matched with a short gap allowed between them,
/// so `가능성 높은 질병` also matches `가능성이 높은 질병`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionLabels {
    pub severity_assessment: String,
    pub urgency: String,
    pub key_findings: String,
    pub medical_signs: String,
    pub likely_diseases: String,
    pub differential_diagnosis: String,
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            severity_assessment: "심각도 평가".into(),
            urgency: "긴급도".into(),
            key_findings: "주요 발견사항".into(),
            medical_signs: "발견된 의학적 징후".into(),
            likely_diseases: "가능성 높은 질병".into(),
            differential_diagnosis: "감별진단".into(),
        }
    }
}

impl SectionLabels {
    fn all(&self) -> [(&'static str, &str); 6] {
        [
            ("severity_assessment", &self.severity_assessment),
            ("urgency", &self.urgency),
            ("key_findings", &self.key_findings),
            ("medical_signs", &self.medical_signs),
            ("likely_diseases", &self.likely_diseases),
            ("differential_diagnosis", &self.differential_diagnosis),
        ]
    }
}

/// Hedging-phrase confidence model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub baseline: f64,
    pub penalty_per_hedge: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            baseline: 0.8,
            penalty_per_hedge: 0.05,
            min: 0.3,
            max: 0.95,
        }
    }
}

/// Wording of the stub records produced when a behavior report has no usable JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorStubText {
    /// Characters of raw text kept as the summary of an unstructured report.
    pub summary_limit: usize,
    pub parse_error_summary: String,
    pub parse_error_recommendation: String,
    pub parse_error_assessment: String,
    pub unstructured_behavior: String,
    pub unstructured_description: String,
    pub unstructured_recommendation: String,
    pub unstructured_assessment: String,
}

impl Default for BehaviorStubText {
    fn default() -> Self {
        Self {
            summary_limit: 200,
            parse_error_summary: "비디오 분석 중 오류가 발생했습니다.".into(),
            parse_error_recommendation: "다시 시도해 주세요.".into(),
            parse_error_assessment: "분석 데이터 처리 중 오류가 발생했습니다.".into(),
            unstructured_behavior: "분석 불가".into(),
            unstructured_description: "제공된 비디오를 분석할 수 없습니다.".into(),
            unstructured_recommendation: "다른 비디오로 다시 시도해 주세요.".into(),
            unstructured_assessment: "분석이 완료되었지만 구조화된 데이터를 생성할 수 없습니다."
                .into(),
        }
    }
}

/// Complete analyzer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub labels: SectionLabels,
    /// Applied to the token after the severity-assessment label.
    pub severity_markers: Vec<Rule<Severity>>,
    /// Whole-text severity scan, highest priority first.
    pub severity_keywords: Vec<Rule<Severity>>,
    /// Severity cues for disease entries pulled from free-text paragraphs.
    pub paragraph_severity: Vec<Rule<Severity>>,
    /// Applied to the token after the urgency label.
    pub urgency_markers: Vec<Rule<UrgencyLevel>>,
    /// Whole-text urgency scan, highest priority first.
    pub urgency_keywords: Vec<Rule<UrgencyLevel>>,
    /// Sign categories in priority order; unmatched phrases go to `other`.
    pub sign_categories: Vec<Rule<SignCategory>>,
    /// Applied to a parenthesized qualifier; no match means `low`.
    pub probability_markers: Vec<Rule<Probability>>,
    pub vet_visit_keywords: Vec<String>,
    pub hedging_phrases: Vec<String>,
    pub symptom_cues: Vec<String>,
    pub recommendation_cues: Vec<String>,
    pub disease_cues: Vec<String>,
    /// Tokens that precede a disease name in prose, e.g. `진단: 피부염`.
    pub disease_name_labels: Vec<String>,
    pub differential_description: String,
    pub confidence: ConfidenceConfig,
    pub behavior: BehaviorStubText,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            labels: SectionLabels::default(),
            severity_markers: vec![
                Rule::new(Severity::Emergency, &["응급"]),
                Rule::new(Severity::High, &["높음"]),
                Rule::new(Severity::Medium, &["중간"]),
                Rule::new(Severity::Low, &["낮음"]),
            ],
            severity_keywords: vec![
                Rule::new(Severity::Emergency, &["응급", "긴급", "즉각", "생명", "위험"]),
                Rule::new(Severity::High, &["심각", "위험", "즉시", "필요", "치료"]),
                Rule::new(Severity::Medium, &["중간", "보통", "관찰", "주의"]),
                Rule::new(
                    Severity::Low,
                    &["경미", "가벼운", "약간", "낮음", "심각하지 않", "정상"],
                ),
            ],
            paragraph_severity: vec![
                Rule::new(Severity::Emergency, &["응급", "긴급"]),
                Rule::new(Severity::High, &["심각", "위험"]),
                Rule::new(Severity::Low, &["경미", "가벼운"]),
            ],
            urgency_markers: vec![
                Rule::new(UrgencyLevel::Emergency, &["응급"]),
                Rule::new(UrgencyLevel::Prompt, &["빠른", "즉시"]),
            ],
            urgency_keywords: vec![
                Rule::new(UrgencyLevel::Emergency, &["응급", "즉각", "생명", "위험", "긴급"]),
                Rule::new(
                    UrgencyLevel::Prompt,
                    &["빠른", "즉시", "조속히", "지체없이", "신속"],
                ),
            ],
            sign_categories: vec![
                Rule::new(SignCategory::Skin, &["피부", "발진", "탈모", "상처", "발적"]),
                Rule::new(SignCategory::Eyes, &["눈", "충혈", "분비물", "혼탁"]),
                Rule::new(
                    SignCategory::Posture,
                    &["자세", "부종", "체중", "몸통", "다리", "관절"],
                ),
                Rule::new(
                    SignCategory::Behavior,
                    &["행동", "통증", "불편", "움직임", "기침", "호흡"],
                ),
            ],
            probability_markers: vec![
                Rule::new(Probability::High, &["높"]),
                Rule::new(Probability::Medium, &["중"]),
            ],
            vet_visit_keywords: strings(&[
                "수의사", "병원", "진료", "방문", "의학적", "전문가", "진단",
            ]),
            hedging_phrases: strings(&[
                "가능성",
                "추정",
                "추측",
                "~일 수도",
                "일 수도",
                "수 있습니다",
                "일 수 있",
                "불확실",
            ]),
            symptom_cues: strings(&[
                "증상",
                "상태",
                "관찰",
                "발견된 의학적 징후",
                "징후",
                "발견사항",
            ]),
            recommendation_cues: strings(&[
                "권장", "조언", "해야 할", "필요", "조치", "관리", "권장 조치",
            ]),
            disease_cues: strings(&["질병", "질환", "병", "진단", "가능성", "가능성 높은 질병"]),
            disease_name_labels: strings(&["질병", "질환", "병명", "진단"]),
            differential_description: "감별진단으로 고려됨".into(),
            confidence: ConfidenceConfig::default(),
            behavior: BehaviorStubText::default(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl AnalyzerConfig {
    /// Load a JSON configuration file. Fields absent from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: AnalyzerConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        info!("Loaded analyzer config from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by `VETSIGHT_CONFIG`, or use the defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(path.trim())),
            _ => Ok(Self::default()),
        }
    }

    /// Copy with every keyword lowercased; matching runs on lowercased text.
    pub fn lowercased(&self) -> Self {
        fn lower_rules<L: Copy>(rules: &[Rule<L>]) -> Vec<Rule<L>> {
            rules
                .iter()
                .map(|r| Rule {
                    label: r.label,
                    keywords: lower(&r.keywords),
                })
                .collect()
        }
        fn lower(keywords: &[String]) -> Vec<String> {
            keywords.iter().map(|k| k.to_lowercase()).collect()
        }

        Self {
            labels: self.labels.clone(),
            severity_markers: lower_rules(&self.severity_markers),
            severity_keywords: lower_rules(&self.severity_keywords),
            paragraph_severity: lower_rules(&self.paragraph_severity),
            urgency_markers: lower_rules(&self.urgency_markers),
            urgency_keywords: lower_rules(&self.urgency_keywords),
            sign_categories: lower_rules(&self.sign_categories),
            probability_markers: lower_rules(&self.probability_markers),
            vet_visit_keywords: lower(&self.vet_visit_keywords),
            hedging_phrases: lower(&self.hedging_phrases),
            symptom_cues: lower(&self.symptom_cues),
            recommendation_cues: lower(&self.recommendation_cues),
            disease_cues: lower(&self.disease_cues),
            disease_name_labels: self.disease_name_labels.clone(),
            differential_description: self.differential_description.clone(),
            confidence: self.confidence.clone(),
            behavior: self.behavior.clone(),
        }
    }

    /// Reject values that would make the pipeline misbehave.
    pub fn validate(&self) -> Result<()> {
        for (field, label) in self.labels.all() {
            if label.split_whitespace().next().is_none() {
                return Err(Error::Config(format!("label '{}' is empty", field)));
            }
        }

        check_rules("severity_markers", &self.severity_markers)?;
        check_rules("severity_keywords", &self.severity_keywords)?;
        check_rules("paragraph_severity", &self.paragraph_severity)?;
        check_rules("urgency_markers", &self.urgency_markers)?;
        check_rules("urgency_keywords", &self.urgency_keywords)?;
        check_rules("sign_categories", &self.sign_categories)?;
        check_rules("probability_markers", &self.probability_markers)?;
        if self
            .sign_categories
            .iter()
            .any(|r| r.label == SignCategory::Other)
        {
            return Err(Error::Config(
                "sign_categories must not list 'other'; it is the fallback bucket".into(),
            ));
        }

        check_keywords("vet_visit_keywords", &self.vet_visit_keywords)?;
        check_keywords("hedging_phrases", &self.hedging_phrases)?;
        check_keywords("symptom_cues", &self.symptom_cues)?;
        check_keywords("recommendation_cues", &self.recommendation_cues)?;
        check_keywords("disease_cues", &self.disease_cues)?;
        check_keywords("disease_name_labels", &self.disease_name_labels)?;
        if self.disease_name_labels.is_empty() {
            return Err(Error::Config("disease_name_labels must not be empty".into()));
        }

        let c = &self.confidence;
        if !(0.0..=1.0).contains(&c.min) || !(0.0..=1.0).contains(&c.max) || c.min > c.max {
            return Err(Error::Config(format!(
                "confidence bounds must satisfy 0 <= min <= max <= 1 (got {}..{})",
                c.min, c.max
            )));
        }
        if !c.penalty_per_hedge.is_finite() || c.penalty_per_hedge < 0.0 || !c.baseline.is_finite()
        {
            return Err(Error::Config(
                "confidence baseline and penalty must be finite, penalty >= 0".into(),
            ));
        }
        if self.behavior.summary_limit == 0 {
            return Err(Error::Config("behavior.summary_limit must be > 0".into()));
        }
        Ok(())
    }
}

// An empty table or rule silently disables its classification tier.
fn check_rules<L>(field: &str, rules: &[Rule<L>]) -> Result<()> {
    if rules.is_empty() {
        return Err(Error::Config(format!("{} must not be empty", field)));
    }
    for rule in rules {
        if rule.keywords.is_empty() {
            return Err(Error::Config(format!("{} has a rule without keywords", field)));
        }
        check_keywords(field, &rule.keywords)?;
    }
    Ok(())
}

// An empty keyword would match every text.
fn check_keywords(field: &str, keywords: &[String]) -> Result<()> {
    if keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(Error::Config(format!("{} contains an empty keyword", field)));
    }
    Ok(())
}
