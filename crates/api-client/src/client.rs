use crate::error::{ClientSetupError, RequestError, RetrievalError, SubmissionError};
use crate::pagination::PageResponse;
use crate::retry::RetryPolicy;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use triage_core::constants::{API_KEY_HEADER, PATIENTS_ENDPOINT, SUBMIT_ASSESSMENT_ENDPOINT};
use triage_core::AssessmentConfig;
use triage_types::{AssessmentSubmission, PatientId, PatientRecord};

/// HTTP client for the clinical data assessment API.
///
/// Holds only immutable configuration; every call is independent and re-issues its
/// requests.
#[derive(Clone, Debug)]
pub struct AssessmentClient {
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
    default_limit: u32,
    page_size: u32,
    page_delay: Duration,
    request_timeout: Duration,
}

impl AssessmentClient {
    /// Create a client from resolved configuration.
    ///
    /// Every request carries the `x-api-key` header and a JSON content type, and each
    /// attempt is bounded by the configured request timeout.
    pub fn new(cfg: &AssessmentConfig) -> Result<Self, ClientSetupError> {
        let mut headers = HeaderMap::new();
        let mut api_key =
            HeaderValue::from_str(cfg.api_key()).map_err(ClientSetupError::InvalidApiKey)?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(cfg.request_timeout())
            .build()
            .map_err(ClientSetupError::Build)?;

        Ok(Self {
            base_url: cfg.base_url().to_string(),
            client,
            retry: RetryPolicy::new(cfg.retry_attempts(), cfg.retry_base_delay()),
            default_limit: cfg.default_limit(),
            page_size: cfg.max_limit(),
            page_delay: cfg.page_delay(),
            request_timeout: cfg.request_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn classify(&self, err: reqwest::Error) -> RequestError {
        if err.is_timeout() {
            RequestError::Timeout(self.request_timeout)
        } else if err.is_connect() {
            RequestError::Connect(self.base_url.clone())
        } else {
            RequestError::Transport(err)
        }
    }

    async fn get_once(&self, url: &str, query: &[(&str, u32)]) -> Result<Value, RequestError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                RequestError::Timeout(self.request_timeout)
            } else {
                RequestError::Decode(e)
            }
        })
    }

    /// GET `endpoint` with `query`, retrying failed attempts with exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns `RetrievalError::RetriesExhausted` with the last attempt's error once
    /// every attempt has failed.
    pub async fn make_request(
        &self,
        endpoint: &str,
        query: &[(&str, u32)],
    ) -> Result<Value, RetrievalError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let label = describe(endpoint, query);
        let url = url.as_str();

        self.retry
            .run(&label, move |_| self.get_once(url, query))
            .await
            .map_err(|exhausted| RetrievalError::RetriesExhausted {
                endpoint: label.clone(),
                attempts: exhausted.attempts,
                source: exhausted.last_error,
            })
    }

    /// Fetch one page of patients. `limit` defaults to the configured `DEFAULT_LIMIT`.
    pub async fn get_patients(
        &self,
        page: u32,
        limit: Option<u32>,
    ) -> Result<PageResponse, RetrievalError> {
        let limit = limit.unwrap_or(self.default_limit);
        let body = self
            .make_request(PATIENTS_ENDPOINT, &[("page", page), ("limit", limit)])
            .await?;
        PageResponse::from_body(body, page)
    }

    /// Fetch every page of patients in order.
    ///
    /// Pages are requested at the configured bulk page size until the API reports no
    /// further pages. Any failed page aborts the whole retrieval.
    pub async fn get_all_patients(&self) -> Result<Vec<PatientRecord>, RetrievalError> {
        let mut all_patients = Vec::new();
        let mut current_page = 1u32;
        let mut has_next = true;

        tracing::info!("Starting to fetch all patients...");

        while has_next {
            let response = match self.get_patients(current_page, Some(self.page_size)).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!("Error fetching page {}: {}", current_page, e);
                    return Err(e);
                }
            };

            has_next = response.has_next();
            let patients = response.into_patients();
            tracing::info!("Fetched page {}: {} patients", current_page, patients.len());

            all_patients.extend(patients);
            current_page += 1;

            if has_next && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        tracing::info!("Total patients fetched: {}", all_patients.len());
        Ok(all_patients)
    }

    /// Submit the three alert lists. Never retried.
    pub async fn submit_assessment(
        &self,
        high_risk_patients: Vec<PatientId>,
        fever_patients: Vec<PatientId>,
        data_quality_issues: Vec<PatientId>,
    ) -> Result<Value, SubmissionError> {
        self.submit(&AssessmentSubmission {
            high_risk_patients,
            fever_patients,
            data_quality_issues,
        })
        .await
    }

    /// POST a prepared submission and return the server's response body unchanged.
    ///
    /// # Errors
    ///
    /// `SubmissionError::Rejected` carries the server's error body for non-2xx
    /// responses; transport failures surface as `SubmissionError::Request`.
    pub async fn submit(&self, submission: &AssessmentSubmission) -> Result<Value, SubmissionError> {
        let url = format!("{}{}", self.base_url, SUBMIT_ASSESSMENT_ENDPOINT);

        if let Ok(payload) = serde_json::to_string_pretty(submission) {
            tracing::debug!("Submitting payload: {}", payload);
        }

        let response = match self.client.post(&url).json(submission).send().await {
            Ok(response) => response,
            Err(e) => {
                let err = self.classify(e);
                tracing::error!("Error submitting assessment: {}", err);
                return Err(err.into());
            }
        };

        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e))?;
        let body = opaque_body(text);

        if !status.is_success() {
            tracing::error!("Error submitting assessment: HTTP {}", status.as_u16());
            tracing::debug!("Response data: {}", body);
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

/// JSON when the body parses, otherwise the raw text as a JSON string.
fn opaque_body(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

fn describe(endpoint: &str, query: &[(&str, u32)]) -> String {
    if query.is_empty() {
        return endpoint.to_string();
    }
    let params: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{}?{}", endpoint, params.join("&"))
}
