//! Analysis pipeline: one report text in, one `AnalysisRecord` out.

use regex::Regex;
use tracing::debug;

use vetsight_core::{
    AnalysisMode, AnalysisRecord, AnalysisRequest, AnalysisTrace, AnalyzerConfig, DiseaseEntry,
    Error, MedicalSigns, Result, Severity, Tagged, UrgencyLevel,
};

use crate::extract::classify::{
    classify_severity, classify_urgency, extract_medical_signs, needs_vet_visit,
};
use crate::extract::confidence::estimate_confidence;
use crate::extract::diseases::{compile_name_pattern, DiseaseExtractor};
use crate::extract::phrases::{extract_listed, extract_recommendations, extract_symptoms};
use crate::extract::sections::SectionPatterns;

/// Compiled analyzer. Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
    sections: SectionPatterns,
    disease_name: Regex,
}

impl Analyzer {
    /// Validate `config` and compile its patterns.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let config = config.lowercased();
        let sections = SectionPatterns::compile(&config.labels)?;
        let disease_name = compile_name_pattern(&config.disease_name_labels)?;
        Ok(Self {
            config,
            sections,
            disease_name,
        })
    }

    /// Analyze `text`. Never fails; missing fields fall back to defaults.
    pub fn analyze(
        &self,
        text: &str,
        mode: AnalysisMode,
        subject_type: Option<&str>,
    ) -> AnalysisRecord {
        self.analyze_traced(text, mode, subject_type).0
    }

    /// Analyze a request, rejecting one without text.
    pub fn analyze_request(&self, request: &AnalysisRequest) -> Result<AnalysisRecord> {
        let text = request
            .text
            .as_deref()
            .ok_or_else(|| Error::InvalidInput("analysis text is missing".into()))?;
        Ok(self.analyze(text, request.mode, request.subject_type.as_deref()))
    }

    /// Analyze `text` and report which strategy produced each tagged value.
    pub fn analyze_traced(
        &self,
        text: &str,
        mode: AnalysisMode,
        subject_type: Option<&str>,
    ) -> (AnalysisRecord, AnalysisTrace) {
        let symptoms = self.symptoms(text);
        let diseases = self.diseases(text);
        let severity = self.severity(text);

        let mut record = AnalysisRecord {
            symptoms: Vec::new(),
            possible_diseases: diseases.value,
            recommendations: self.recommendations(text),
            severity: severity.value,
            needs_vet: self.needs_vet(text),
            confidence: self.confidence(text),
            raw_analysis: text.to_string(),
            analysis_type: mode,
            subject_type: subject_type.map(str::to_string),
            key_findings: None,
            medical_signs: None,
            differential_diagnosis: None,
            urgency_level: None,
        };
        let mut trace = AnalysisTrace {
            severity: severity.provenance,
            symptoms: symptoms.provenance,
            diseases: diseases.provenance,
            urgency: None,
            medical_signs: None,
        };

        if mode == AnalysisMode::Detailed {
            let urgency = self.urgency(text);
            let signs = self.medical_signs(text, &symptoms.value);
            record.key_findings = Some(self.key_findings(text));
            record.differential_diagnosis = Some(self.differential_diagnosis(text));
            record.medical_signs = Some(signs.value);
            record.urgency_level = Some(urgency.value);
            trace.urgency = Some(urgency.provenance);
            trace.medical_signs = Some(signs.provenance);
        }
        record.symptoms = symptoms.value;

        debug!(
            "Analyzed {} chars ({:?}): severity={} via {:?}, {} diseases via {:?}, confidence={:.2}",
            text.chars().count(),
            mode,
            record.severity,
            trace.severity,
            record.possible_diseases.len(),
            trace.diseases,
            record.confidence,
        );

        (record, trace)
    }

    pub fn severity(&self, text: &str) -> Tagged<Severity> {
        classify_severity(
            text,
            &self.sections.severity_assessment,
            &self.config.severity_markers,
            &self.config.severity_keywords,
        )
    }

    pub fn urgency(&self, text: &str) -> Tagged<UrgencyLevel> {
        classify_urgency(
            text,
            &self.sections.urgency,
            &self.config.urgency_markers,
            &self.config.urgency_keywords,
        )
    }

    pub fn symptoms(&self, text: &str) -> Tagged<Vec<String>> {
        extract_symptoms(text, &self.config.symptom_cues)
    }

    pub fn recommendations(&self, text: &str) -> Vec<String> {
        extract_recommendations(text, &self.config.recommendation_cues)
    }

    pub fn diseases(&self, text: &str) -> Tagged<Vec<DiseaseEntry>> {
        DiseaseExtractor {
            config: &self.config,
            sections: &self.sections,
            name_pattern: &self.disease_name,
        }
        .extract(text)
    }

    pub fn key_findings(&self, text: &str) -> Vec<String> {
        extract_listed(text, &self.sections.key_findings)
    }

    pub fn differential_diagnosis(&self, text: &str) -> Vec<String> {
        extract_listed(text, &self.sections.differential_diagnosis)
    }

    /// Sign buckets from the structured block, else from `symptoms`.
    pub fn medical_signs(&self, text: &str, symptoms: &[String]) -> Tagged<MedicalSigns> {
        extract_medical_signs(
            text,
            &self.sections.medical_signs,
            &self.config.sign_categories,
            symptoms,
        )
    }

    pub fn needs_vet(&self, text: &str) -> bool {
        needs_vet_visit(text, &self.config.vet_visit_keywords)
    }

    pub fn confidence(&self, text: &str) -> f64 {
        estimate_confidence(text, &self.config.hedging_phrases, &self.config.confidence)
    }
}
