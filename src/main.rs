use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use triage_api_client::AssessmentClient;
use triage_core::{AnalysisResult, AssessmentConfig, AssessmentSubmission, PatientAnalyzer, PatientId};

/// Entry point for the patient risk assessment run
///
/// Fetches every patient page from the assessment API, classifies the patients,
/// logs a sample breakdown and the resulting lists, then submits them.
///
/// # Environment Variables
/// - `API_KEY`: credential sent as `x-api-key` (required)
/// - `BASE_URL`: API root (default: "https://assessment.ksensetech.com/api")
/// - `DEFAULT_LIMIT` / `MAX_LIMIT`: page sizes (defaults: 5 / 20)
/// - `RETRY_ATTEMPTS`, `RETRY_BASE_DELAY_MS`, `PAGE_DELAY_MS`, `REQUEST_TIMEOUT_MS`
/// - `SAMPLE_SIZE`: patients shown in the sample breakdown (default: 3)
/// - `SUBMIT`: set to "false" to stop after displaying results
///
/// # Returns
/// * `Ok(())` - If the assessment completed (and was accepted, when submitting)
/// * `Err(anyhow::Error)` - On configuration, retrieval, or submission failure
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("triage=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = AssessmentConfig::from_lookup(|key| std::env::var(key).ok())?;
    let client = AssessmentClient::new(&cfg)?;

    let submission = match run(&client, &cfg).await {
        Ok(submission) => submission,
        Err(e) => {
            tracing::error!("Error during assessment: {e:#}");
            return Err(e);
        }
    };

    if !cfg.submit() {
        tracing::info!("SUBMIT is disabled; assessment was not submitted");
        return Ok(());
    }

    tracing::info!("Submitting assessment...");
    match client.submit(&submission).await {
        Ok(result) => {
            tracing::info!("Submission successful!");
            tracing::info!("Results: {}", pretty(&result));
            Ok(())
        }
        Err(e) => {
            tracing::error!("Submission failed: {e}");
            Err(e.into())
        }
    }
}

async fn run(client: &AssessmentClient, cfg: &AssessmentConfig) -> anyhow::Result<AssessmentSubmission> {
    tracing::info!("Starting patient risk assessment against {}", client.base_url());

    tracing::info!("Step 1: Fetching patient data...");
    let patients = client.get_all_patients().await?;
    tracing::info!("Successfully fetched {} patients", patients.len());

    tracing::info!("Step 2: Analyzing patient data...");
    let analyzer = PatientAnalyzer::new();
    let analysis = analyzer.analyze_patients(&patients);
    tracing::info!("Analysis complete");

    tracing::info!("Step 3: Sample analysis for verification...");
    analyzer.sample_analysis(&patients, cfg.sample_size());

    tracing::info!("Step 4: Preparing submission data...");
    display_results(&analysis);

    Ok(AssessmentSubmission::from(analysis))
}

fn display_results(analysis: &AnalysisResult) {
    tracing::info!("Submission summary:");
    tracing::info!("  - High-risk patients: {}", analysis.summary.high_risk_count);
    tracing::info!("  - Fever patients: {}", analysis.summary.fever_count);
    tracing::info!("  - Data quality issues: {}", analysis.summary.data_quality_issues_count);

    tracing::info!("high-risk: {}", join_ids(&analysis.high_risk_patients));
    tracing::info!("fever: {}", join_ids(&analysis.fever_patients));
    tracing::info!("data-quality: {}", join_ids(&analysis.data_quality_issues));
}

fn join_ids(ids: &[PatientId]) -> String {
    let ids: Vec<&str> = ids.iter().map(PatientId::as_str).collect();
    format!("[{}]", ids.join(", "))
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
