//! Behavior report parsing: fenced JSON block → `VideoAnalysisData`.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use vetsight_core::BehaviorStubText;

use crate::types::{
    AssessmentStatus, BehaviorData, BehaviorOutcome, BehaviorParse, BehaviorSeverity,
    OverallAssessment, VideoAnalysisData,
};

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json[^\S\n]*\n(.*?)\n\s*```").unwrap());

/// Locate the JSON document in a model response.
///
/// A ```` ```json ```` fence wins; otherwise the span from the first `{` to
/// the last `}` is used.
pub fn extract_json_block(text: &str) -> Option<&str> {
    if let Some(body) = FENCED_JSON.captures(text).and_then(|cap| cap.get(1)) {
        return Some(body.as_str());
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Parse a video behavior report for `animal_type`.
///
/// Never fails: unusable responses yield a stub worded by `stub`.
pub fn parse_behavior_report(
    text: &str,
    animal_type: &str,
    stub: &BehaviorStubText,
) -> BehaviorParse {
    let Some(json) = extract_json_block(text) else {
        debug!("No JSON in behavior report ({} chars)", text.chars().count());
        return BehaviorParse {
            analysis: unstructured_stub(text, animal_type, stub),
            outcome: BehaviorOutcome::Unstructured,
        };
    };

    match serde_json::from_str::<VideoAnalysisData>(json) {
        Ok(mut analysis) => {
            if analysis.animal_type.trim().is_empty() {
                analysis.animal_type = animal_type.to_string();
            }
            BehaviorParse {
                analysis,
                outcome: BehaviorOutcome::Parsed,
            }
        }
        Err(e) => {
            warn!("Failed to parse behavior report JSON: {}", e);
            BehaviorParse {
                analysis: malformed_stub(animal_type, stub),
                outcome: BehaviorOutcome::Malformed,
            }
        }
    }
}

fn malformed_stub(animal_type: &str, stub: &BehaviorStubText) -> VideoAnalysisData {
    VideoAnalysisData {
        animal_type: animal_type.to_string(),
        behaviors: Vec::new(),
        summary: stub.parse_error_summary.clone(),
        possible_issues: Vec::new(),
        recommendations: vec![stub.parse_error_recommendation.clone()],
        overall_assessment: OverallAssessment {
            status: AssessmentStatus::Healthy,
            description: stub.parse_error_assessment.clone(),
        },
    }
}

fn unstructured_stub(text: &str, animal_type: &str, stub: &BehaviorStubText) -> VideoAnalysisData {
    let head: String = text.chars().take(stub.summary_limit).collect();
    VideoAnalysisData {
        animal_type: animal_type.to_string(),
        behaviors: vec![BehaviorData {
            timestamp: "00:00".into(),
            behavior: stub.unstructured_behavior.clone(),
            confidence: 0.5,
            description: stub.unstructured_description.clone(),
            severity: Some(BehaviorSeverity::Normal),
        }],
        summary: format!("{}...", head),
        possible_issues: Vec::new(),
        recommendations: vec![stub.unstructured_recommendation.clone()],
        overall_assessment: OverallAssessment {
            status: AssessmentStatus::Healthy,
            description: stub.unstructured_assessment.clone(),
        },
    }
}
