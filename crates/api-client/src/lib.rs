//! # Triage API Client
//!
//! Resilient access to the clinical data assessment API:
//! - Paginated patient retrieval with retry and exponential backoff
//! - Normalisation of the two page layouts the API emits
//! - Single-shot submission of the assessment lists
//!
//! Risk classification lives in `triage-core`; this crate only moves data.

pub mod client;
pub mod error;
pub mod pagination;
pub mod retry;

pub use client::AssessmentClient;
pub use error::{ClientSetupError, RequestError, RetrievalError, SubmissionError};
pub use pagination::PageResponse;
pub use retry::{RetriesExhausted, RetryPolicy, RetryState};
