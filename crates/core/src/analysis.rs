use crate::{
    config::ServerConfig,
    error::{Result, VidlensError},
    types::AnalysisResult,
};

/// Shown when the server replies without a `result` field.
pub const FALLBACK_RESULT: &str = "No analysis result was returned.";

/// Extract the result text from a server response body.
///
/// A missing or non-string `result` yields the fallback placeholder rather
/// than an empty string.
pub fn parse_analysis(body: &serde_json::Value) -> AnalysisResult {
    let text = body
        .get("result")
        .and_then(|v| v.as_str())
        .unwrap_or(FALLBACK_RESULT)
        .to_string();
    AnalysisResult { text }
}

/// Request the analysis for a completed upload session. Issued exactly once
/// per session, after every chunk was acknowledged.
pub async fn request_analysis(
    client: &reqwest::Client,
    config: &ServerConfig,
    upload_id: &str,
) -> Result<AnalysisResult> {
    let response = client
        .post(config.generate_analysis_url())
        .header("Content-Type", "application/json")
        .json(&serde_json::json!({ "upload_id": upload_id }))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(VidlensError::AnalysisFailed {
            reason: format!("server responded with status {status}"),
        });
    }

    let body: serde_json::Value = response.json().await?;
    Ok(parse_analysis(&body))
}
