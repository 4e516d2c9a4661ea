use crate::domain::ports::ImageAnalyzer;
use crate::utils::error::{Result, SecurityError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const CAT_LABEL: &str = "cat";

#[derive(Debug, Deserialize)]
struct LabelResponse {
    #[serde(default)]
    labels: Vec<Label>,
}

#[derive(Debug, Deserialize)]
struct Label {
    name: String,
    confidence: f32,
}

/// Label-detection service reached over HTTP.
///
/// The raw image is POSTed as `application/octet-stream` with the threshold
/// in the `min_confidence` query parameter. The service answers with
/// `{"labels": [{"name": "Cat", "confidence": 97.4}, ...]}`.
#[derive(Debug, Clone)]
pub struct HttpImageAnalyzer {
    client: Client,
    endpoint: String,
}

impl HttpImageAnalyzer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SecurityError::ConfigError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ImageAnalyzer for HttpImageAnalyzer {
    async fn contains_cat(&self, image: &[u8], confidence_threshold: f32) -> Result<bool> {
        tracing::debug!("Posting image to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("min_confidence", confidence_threshold)])
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| SecurityError::analysis(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SecurityError::analysis(format!(
                "provider returned HTTP {}",
                status
            )));
        }

        let body: LabelResponse = response
            .json()
            .await
            .map_err(|e| SecurityError::analysis(format!("unreadable provider response: {}", e)))?;

        tracing::debug!("Provider returned {} labels", body.labels.len());
        Ok(body
            .labels
            .iter()
            .any(|l| l.name.eq_ignore_ascii_case(CAT_LABEL) && l.confidence >= confidence_threshold))
    }
}
