use crate::adapters::http::HttpImageAnalyzer;
use crate::config::toml_config::{AnalysisConfig, AnalysisProvider};
use crate::domain::ports::ImageAnalyzer;
use crate::utils::error::Result;
use crate::utils::validation::{required, validate_timeout};
use async_trait::async_trait;

/// Always returns the same verdict. Used offline and in demos.
#[derive(Debug, Clone, Copy)]
pub struct StaticImageAnalyzer {
    verdict: bool,
}

impl StaticImageAnalyzer {
    pub fn new(verdict: bool) -> Self {
        Self { verdict }
    }
}

#[async_trait]
impl ImageAnalyzer for StaticImageAnalyzer {
    async fn contains_cat(&self, _image: &[u8], _confidence_threshold: f32) -> Result<bool> {
        Ok(self.verdict)
    }
}

/// The analyzer selected by `[analysis] provider`.
#[derive(Debug, Clone)]
pub enum ConfiguredAnalyzer {
    Http(HttpImageAnalyzer),
    Static(StaticImageAnalyzer),
}

impl ConfiguredAnalyzer {
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        match config.provider {
            AnalysisProvider::Http => {
                let endpoint = required("analysis.endpoint", &config.endpoint)?;
                let timeout = validate_timeout("analysis.timeout_seconds", config.timeout_seconds)?;
                Ok(Self::Http(HttpImageAnalyzer::new(endpoint.clone(), timeout)?))
            }
            AnalysisProvider::Static => Ok(Self::Static(StaticImageAnalyzer::new(config.static_verdict))),
        }
    }
}

#[async_trait]
impl ImageAnalyzer for ConfiguredAnalyzer {
    async fn contains_cat(&self, image: &[u8], confidence_threshold: f32) -> Result<bool> {
        match self {
            Self::Http(analyzer) => analyzer.contains_cat(image, confidence_threshold).await,
            Self::Static(analyzer) => analyzer.contains_cat(image, confidence_threshold).await,
        }
    }
}
