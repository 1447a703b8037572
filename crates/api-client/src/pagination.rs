//! Normalisation of `GET /patients` page bodies.
//!
//! The API answers in one of two layouts:
//!
//! - flagged: `{"data": [...], "pagination": {"hasNext": true}}`
//! - counted: `{"patients": [...], "current_page": 1, "total_records": 47, "per_page": 20}`
//!
//! A body is resolved into `PageResponse` once; everything downstream works on the enum.

use crate::error::RetrievalError;
use serde::Deserialize;
use serde_json::Value;
use triage_types::PatientRecord;

/// One page of patients with its continuation information.
#[derive(Debug, Clone, PartialEq)]
pub enum PageResponse {
    /// `data` array with an explicit `pagination.hasNext` flag. A bare top-level
    /// array is read as a final page of this kind.
    Flagged {
        patients: Vec<PatientRecord>,
        has_next: bool,
    },
    /// `patients` array with page counters.
    Counted {
        patients: Vec<PatientRecord>,
        current_page: Option<f64>,
        total_records: Option<f64>,
        per_page: Option<f64>,
    },
}

#[derive(Deserialize, Default)]
struct PaginationBlock {
    #[serde(rename = "hasNext", default)]
    has_next: Option<Value>,
}

impl PageResponse {
    /// Resolves a page body. `page` is only used to label format errors.
    ///
    /// # Errors
    ///
    /// Returns `RetrievalError::InvalidResponseFormat` when the body matches neither
    /// layout, or when a patient entry is not a JSON object.
    pub fn from_body(body: Value, page: u32) -> Result<Self, RetrievalError> {
        let invalid = || RetrievalError::InvalidResponseFormat { page };

        let mut object = match body {
            Value::Array(items) => {
                return Ok(PageResponse::Flagged {
                    patients: decode_patients(items).ok_or_else(invalid)?,
                    has_next: false,
                });
            }
            Value::Object(object) => object,
            _ => return Err(invalid()),
        };

        if let Some(Value::Array(items)) = object.remove("data") {
            let pagination: PaginationBlock = object
                .remove("pagination")
                .and_then(|v| serde_json::from_value(v).ok())
                .unwrap_or_default();

            return Ok(PageResponse::Flagged {
                patients: decode_patients(items).ok_or_else(invalid)?,
                has_next: matches!(pagination.has_next, Some(Value::Bool(true))),
            });
        }

        if let Some(Value::Array(items)) = object.remove("patients") {
            return Ok(PageResponse::Counted {
                patients: decode_patients(items).ok_or_else(invalid)?,
                current_page: object.get("current_page").and_then(as_number),
                total_records: object.get("total_records").and_then(as_number),
                per_page: object.get("per_page").and_then(as_number),
            });
        }

        Err(invalid())
    }

    /// Whether another page should be requested after this one.
    ///
    /// For counted pages this is `current_page < ceil(total_records / per_page)`;
    /// missing counters or a zero page size end the pagination.
    pub fn has_next(&self) -> bool {
        match self {
            PageResponse::Flagged { has_next, .. } => *has_next,
            PageResponse::Counted {
                current_page: Some(current),
                total_records: Some(total),
                per_page: Some(per_page),
                ..
            } if *per_page > 0.0 => *current < (total / per_page).ceil(),
            PageResponse::Counted { .. } => false,
        }
    }

    pub fn patients(&self) -> &[PatientRecord] {
        match self {
            PageResponse::Flagged { patients, .. } | PageResponse::Counted { patients, .. } => {
                patients
            }
        }
    }

    pub fn into_patients(self) -> Vec<PatientRecord> {
        match self {
            PageResponse::Flagged { patients, .. } | PageResponse::Counted { patients, .. } => {
                patients
            }
        }
    }
}

fn decode_patients(items: Vec<Value>) -> Option<Vec<PatientRecord>> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => serde_json::from_value(item).ok(),
            _ => None,
        })
        .collect()
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
