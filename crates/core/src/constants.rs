//! Constants used throughout the triage core crate.
//!
//! Clinical thresholds, risk scores, and the defaults for runtime configuration live
//! here so that the scoring rules can be audited in one place.

/// Default API root when `BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://assessment.ksensetech.com/api";

/// Page size for single-page requests.
pub const DEFAULT_LIMIT: u32 = 5;

/// Page size for bulk retrieval of the whole patient list.
pub const DEFAULT_MAX_LIMIT: u32 = 20;

/// Attempts made for one GET before giving up.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Base of the exponential backoff, multiplied by `2^attempt`.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;

/// Courtesy pause between consecutive page requests.
pub const DEFAULT_PAGE_DELAY_MS: u64 = 100;

/// Upper bound on a single HTTP attempt.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Number of patients shown by the sample diagnostic.
pub const DEFAULT_SAMPLE_SIZE: usize = 3;

/// Path of the paginated patient listing.
pub const PATIENTS_ENDPOINT: &str = "/patients";

/// Path of the assessment submission.
pub const SUBMIT_ASSESSMENT_ENDPOINT: &str = "/submit-assessment";

/// Header carrying the static API credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Separator between systolic and diastolic readings.
pub const BLOOD_PRESSURE_SEPARATOR: char = '/';

// Blood pressure bands (mmHg).
pub const NORMAL_SYSTOLIC_MAX_EXCLUSIVE: i64 = 120;
pub const ELEVATED_SYSTOLIC_MIN: i64 = 120;
pub const ELEVATED_SYSTOLIC_MAX: i64 = 129;
pub const STAGE1_SYSTOLIC_MIN: i64 = 130;
pub const STAGE1_SYSTOLIC_MAX: i64 = 139;
pub const STAGE2_SYSTOLIC_MIN: i64 = 140;
pub const NORMAL_DIASTOLIC_MAX_EXCLUSIVE: i64 = 80;
pub const STAGE1_DIASTOLIC_MIN: i64 = 80;
pub const STAGE1_DIASTOLIC_MAX: i64 = 89;
pub const STAGE2_DIASTOLIC_MIN: i64 = 90;

pub const BP_NORMAL_SCORE: u8 = 1;
pub const BP_ELEVATED_SCORE: u8 = 2;
pub const BP_STAGE1_SCORE: u8 = 3;
pub const BP_STAGE2_SCORE: u8 = 4;

// Temperature bands (°F).
pub const TEMP_NORMAL_MAX: f64 = 99.5;
pub const TEMP_LOW_FEVER_MIN: f64 = 99.6;
pub const TEMP_LOW_FEVER_MAX: f64 = 100.9;
pub const TEMP_HIGH_FEVER_MIN: f64 = 101.0;

/// Temperatures at or above this value count as fever.
pub const FEVER_THRESHOLD: f64 = 99.6;

pub const TEMP_NORMAL_SCORE: u8 = 0;
pub const TEMP_LOW_FEVER_SCORE: u8 = 1;
pub const TEMP_HIGH_FEVER_SCORE: u8 = 2;

// Age bands (years).
pub const AGE_UNDER_40_MAX: i64 = 39;
pub const AGE_40_TO_65_MIN: i64 = 40;
pub const AGE_40_TO_65_MAX: i64 = 65;
pub const AGE_OVER_65_MIN: i64 = 66;

pub const AGE_UNDER_40_SCORE: u8 = 1;
pub const AGE_40_TO_65_SCORE: u8 = 1;
pub const AGE_OVER_65_SCORE: u8 = 2;

/// Sub-score returned for any field that fails validation.
pub const INVALID_FIELD_SCORE: u8 = 0;

/// Total risk at or above which a patient is high risk.
pub const HIGH_RISK_THRESHOLD: u8 = 4;
