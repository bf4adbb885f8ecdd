//! Analysis record types matching the renderer's data shape.

use serde::{Deserialize, Serialize};

/// Overall severity of the reported condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Emergency,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Emergency => write!(f, "emergency"),
        }
    }
}

/// How soon the subject should be seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Normal,
    Prompt,
    Emergency,
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrgencyLevel::Normal => write!(f, "normal"),
            UrgencyLevel::Prompt => write!(f, "prompt"),
            UrgencyLevel::Emergency => write!(f, "emergency"),
        }
    }
}

/// Probability qualifier attached to a candidate disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Probability {
    High,
    Medium,
    Low,
}

/// Medical-sign bucket. `Other` catches everything no rule claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignCategory {
    Skin,
    Eyes,
    Posture,
    Behavior,
    Other,
}

/// Requested analysis depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Basic,
    Detailed,
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisMode::Basic => write!(f, "basic"),
            AnalysisMode::Detailed => write!(f, "detailed"),
        }
    }
}

impl std::str::FromStr for AnalysisMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(AnalysisMode::Basic),
            "detailed" => Ok(AnalysisMode::Detailed),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown analysis mode: {}",
                other
            ))),
        }
    }
}

/// Which strategy produced an extracted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// A labeled field such as `심각도 평가: 응급`.
    StructuredField,
    /// Keyword scan over free text.
    KeywordScan,
    /// Secondary heuristic used when the primary one found nothing.
    Fallback,
    /// Nothing matched; fixed default.
    Default,
}

/// A value tagged with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tagged<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Tagged<T> {
    pub fn new(value: T, provenance: Provenance) -> Self {
        Self { value, provenance }
    }
}

/// A candidate disease mentioned in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseEntry {
    pub name: String,
    pub symptoms: Vec<String>,
    pub description: String,
    pub severity: Severity,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<Probability>,
}

/// Medical signs grouped into five mutually exclusive buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicalSigns {
    pub skin: Vec<String>,
    pub eyes: Vec<String>,
    pub posture: Vec<String>,
    pub behavior: Vec<String>,
    pub other: Vec<String>,
}

impl MedicalSigns {
    pub fn bucket_mut(&mut self, category: SignCategory) -> &mut Vec<String> {
        match category {
            SignCategory::Skin => &mut self.skin,
            SignCategory::Eyes => &mut self.eyes,
            SignCategory::Posture => &mut self.posture,
            SignCategory::Behavior => &mut self.behavior,
            SignCategory::Other => &mut self.other,
        }
    }

    pub fn total(&self) -> usize {
        self.skin.len() + self.eyes.len() + self.posture.len() + self.behavior.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Structured analysis of one free-text report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub symptoms: Vec<String>,
    pub possible_diseases: Vec<DiseaseEntry>,
    pub recommendations: Vec<String>,
    pub severity: Severity,
    pub needs_vet: bool,
    pub confidence: f64,
    pub raw_analysis: String,
    pub analysis_type: AnalysisMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_type: Option<String>,

    // Detailed mode only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_findings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_signs: Option<MedicalSigns>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub differential_diagnosis: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<UrgencyLevel>,
}

/// Provenance of every tagged value in one [`AnalysisRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisTrace {
    pub severity: Provenance,
    pub symptoms: Provenance,
    pub diseases: Provenance,
    pub urgency: Option<Provenance>,
    pub medical_signs: Option<Provenance>,
}

/// Incoming analysis request, e.g. the body handed over by a request handler.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub mode: AnalysisMode,
    #[serde(default, rename = "subjectType", alias = "petType")]
    pub subject_type: Option<String>,
}
