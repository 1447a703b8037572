//! # Triage Types
//!
//! Value types shared by the retrieval client and the risk classification engine:
//! - `PatientRecord`: one loosely-typed record as delivered by the clinical data API
//! - `PatientId`: the identifier reported back in assessment lists
//! - `PatientAssessment`, `AnalysisResult`, `AssessmentSubmission`: classification outputs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors that can occur when creating validated identifier types.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The identifier was empty
    #[error("patient id cannot be empty")]
    Empty,
}

/// A patient identifier as reported by the clinical data API.
///
/// The API may send identifiers as JSON strings or numbers; both are held as text.
/// Ordering is byte-wise lexical, so `"10"` sorts before `"2"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new `PatientId`.
    ///
    /// The identifier is kept verbatim (no trimming) since it is echoed back to the API.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the input is the empty string.
    pub fn new(input: impl Into<String>) -> Result<Self, IdError> {
        let id = input.into();
        if id.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(id))
    }

    /// Derives an identifier from a raw JSON field.
    ///
    /// Strings are used as-is and numbers use their JSON rendering. Any other JSON
    /// type, or an empty string, yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::new(s.as_str()).ok(),
            Value::Number(n) => Self::new(n.to_string()).ok(),
            _ => None,
        }
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for PatientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PatientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        PatientId::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("patient id must be a non-empty string or number"))
    }
}

/// One patient record as returned by `GET /patients`.
///
/// Only the four clinically relevant fields are surfaced. They are kept as raw JSON
/// because the API routinely sends them as numbers, strings, `null`, or garbage;
/// a missing field and an explicit `null` both deserialize to `None`. Every other
/// field is preserved untouched in `other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl PatientRecord {
    /// The record's identifier, if it carries a usable one.
    pub fn id(&self) -> Option<PatientId> {
        self.patient_id.as_ref().and_then(PatientId::from_value)
    }

    /// Identifier rendering for log lines; never fails.
    pub fn display_id(&self) -> String {
        match self.id() {
            Some(id) => id.0,
            None => "<unknown>".into(),
        }
    }
}

/// Sub-scores and classification flags computed for a single patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatientAssessment {
    pub blood_pressure_risk: u8,
    pub temperature_risk: u8,
    pub age_risk: u8,
    pub total_risk: u8,
    pub has_fever: bool,
    pub has_data_quality_issues: bool,
    pub is_high_risk: bool,
}

/// Counts reported alongside the three alert lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub total_patients: usize,
    pub high_risk_count: usize,
    pub fever_count: usize,
    pub data_quality_issues_count: usize,
}

/// Outcome of one full analysis pass. Each list is sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub high_risk_patients: Vec<PatientId>,
    pub fever_patients: Vec<PatientId>,
    pub data_quality_issues: Vec<PatientId>,
    pub summary: AnalysisSummary,
}

/// Body of `POST /submit-assessment`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub high_risk_patients: Vec<PatientId>,
    pub fever_patients: Vec<PatientId>,
    pub data_quality_issues: Vec<PatientId>,
}

impl From<AnalysisResult> for AssessmentSubmission {
    fn from(result: AnalysisResult) -> Self {
        Self {
            high_risk_patients: result.high_risk_patients,
            fever_patients: result.fever_patients,
            data_quality_issues: result.data_quality_issues,
        }
    }
}
