//! Patient analysis service.
//!
//! Partitions a full patient collection into the three alert lists reported back to
//! the assessment API.

use crate::scoring;
use triage_types::{AnalysisResult, AnalysisSummary, PatientAssessment, PatientRecord};

/// Classifies patient collections; holds no state between calls.
#[derive(Clone, Debug, Default)]
pub struct PatientAnalyzer;

impl PatientAnalyzer {
    /// Creates a new instance of PatientAnalyzer.
    pub fn new() -> Self {
        Self
    }

    /// Runs one pass over `patients` and builds the alert lists.
    ///
    /// Each patient is assessed once and its id appended to every list whose flag is
    /// set; the three lists are then sorted independently in lexical order. Records
    /// without a usable `patient_id` are assessed and counted in the total but cannot
    /// be reported in any list.
    pub fn analyze_patients(&self, patients: &[PatientRecord]) -> AnalysisResult {
        tracing::info!("Analyzing {} patients...", patients.len());

        let mut result = AnalysisResult::default();

        for patient in patients {
            let assessment = scoring::assess(patient);
            let flagged =
                assessment.is_high_risk || assessment.has_fever || assessment.has_data_quality_issues;

            let Some(id) = patient.id() else {
                if flagged {
                    tracing::warn!(
                        "patient without a usable patient_id was flagged ({:?}); it cannot be reported",
                        assessment
                    );
                }
                continue;
            };

            if assessment.is_high_risk {
                result.high_risk_patients.push(id.clone());
            }
            if assessment.has_fever {
                result.fever_patients.push(id.clone());
            }
            if assessment.has_data_quality_issues {
                result.data_quality_issues.push(id);
            }
        }

        result.high_risk_patients.sort();
        result.fever_patients.sort();
        result.data_quality_issues.sort();

        result.summary = AnalysisSummary {
            total_patients: patients.len(),
            high_risk_count: result.high_risk_patients.len(),
            fever_count: result.fever_patients.len(),
            data_quality_issues_count: result.data_quality_issues.len(),
        };

        tracing::info!(
            total_patients = result.summary.total_patients,
            high_risk = result.summary.high_risk_count,
            fever = result.summary.fever_count,
            data_quality_issues = result.summary.data_quality_issues_count,
            "Analysis results"
        );

        result
    }

    /// Assesses a single patient and logs the breakdown at debug level.
    pub fn debug_patient(&self, patient: &PatientRecord) -> PatientAssessment {
        let assessment = scoring::assess(patient);

        tracing::debug!("Debug analysis for patient {}:", patient.display_id());
        tracing::debug!(
            "- Blood Pressure: {} (Risk: {})",
            render_field(patient.blood_pressure.as_ref()),
            assessment.blood_pressure_risk
        );
        tracing::debug!(
            "- Temperature: {} (Risk: {})",
            render_field(patient.temperature.as_ref()),
            assessment.temperature_risk
        );
        tracing::debug!(
            "- Age: {} (Risk: {})",
            render_field(patient.age.as_ref()),
            assessment.age_risk
        );
        tracing::debug!("- Total Risk Score: {}", assessment.total_risk);
        tracing::debug!("- Has Fever: {}", assessment.has_fever);
        tracing::debug!("- Data Quality Issues: {}", assessment.has_data_quality_issues);
        tracing::debug!("- Is High Risk: {}", assessment.is_high_risk);

        assessment
    }

    /// Diagnostic breakdown for the first `sample_size` patients.
    pub fn sample_analysis(
        &self,
        patients: &[PatientRecord],
        sample_size: usize,
    ) -> Vec<PatientAssessment> {
        tracing::debug!("Sample analysis (first {} patients):", sample_size);
        patients
            .iter()
            .take(sample_size)
            .map(|patient| self.debug_patient(patient))
            .collect()
    }
}

fn render_field(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "missing".into(),
    }
}
