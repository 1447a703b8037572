//! # Triage Core
//!
//! Deterministic risk classification for patient records fetched from the clinical
//! data API:
//! - Field validation (`validation`)
//! - Blood pressure, temperature, and age sub-scores (`scoring`)
//! - Partitioning into high-risk, fever, and data-quality lists (`analyzer`)
//! - Startup configuration (`config`)
//!
//! **No transport concerns**: HTTP retrieval and submission belong in `triage-api-client`.

pub mod analyzer;
pub mod config;
pub mod constants;
pub mod error;
pub mod scoring;
pub mod validation;

pub use analyzer::PatientAnalyzer;
pub use config::AssessmentConfig;
pub use error::{ConfigError, ConfigResult};
pub use triage_types::{
    AnalysisResult, AnalysisSummary, AssessmentSubmission, PatientAssessment, PatientId,
    PatientRecord,
};
