//! Video analysis types matching the renderer's data shape.

use serde::{Deserialize, Serialize};

/// Severity of one observed behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorSeverity {
    Normal,
    Attention,
    Concern,
    Serious,
    /// Any value outside the vocabulary above.
    #[serde(other)]
    Unknown,
}

/// Overall status of the animal in the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Healthy,
    MinorConcern,
    NeedsAttention,
    VetVisitRecommended,
    Emergency,
    /// Any value outside the vocabulary above.
    #[serde(other)]
    Unknown,
}

/// One behavior observed at a point in the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorData {
    pub timestamp: String,
    pub behavior: String,
    pub confidence: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<BehaviorSeverity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallAssessment {
    pub status: AssessmentStatus,
    #[serde(default)]
    pub description: String,
}

/// Structured video behavior analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysisData {
    #[serde(default)]
    pub animal_type: String,
    #[serde(default)]
    pub behaviors: Vec<BehaviorData>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub possible_issues: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub overall_assessment: OverallAssessment,
}

/// How the analysis was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorOutcome {
    /// JSON found and deserialized.
    Parsed,
    /// JSON found but not deserializable; stub returned.
    Malformed,
    /// No JSON in the response; stub returned.
    Unstructured,
}

/// Result of parsing one behavior report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehaviorParse {
    pub analysis: VideoAnalysisData,
    pub outcome: BehaviorOutcome,
}
