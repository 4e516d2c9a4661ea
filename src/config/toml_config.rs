use crate::core::engine::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::utils::error::{Result, SecurityError};
use crate::utils::validation::{
    required, validate_confidence_threshold, validate_endpoint, validate_state_file,
    validate_timeout, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub state_file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisProvider {
    Http,
    #[default]
    Static,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub provider: AnalysisProvider,
    pub endpoint: Option<String>,
    pub timeout_seconds: u64,
    pub confidence_threshold: f32,
    /// Verdict returned by the static provider.
    pub static_verdict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: "./sentinel-state.json".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: AnalysisProvider::default(),
            endpoint: None,
            timeout_seconds: 10,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            static_verdict: false,
        }
    }
}

impl SentinelConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SecurityError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VISION_ENDPOINT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SecurityError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn state_file(&self) -> &str {
        &self.storage.state_file
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.analysis.confidence_threshold
    }
}

impl Validate for SentinelConfig {
    fn validate(&self) -> Result<()> {
        validate_state_file("storage.state_file", &self.storage.state_file)?;

        if self.analysis.provider == AnalysisProvider::Http {
            let endpoint = required("analysis.endpoint", &self.analysis.endpoint)?;
            validate_endpoint("analysis.endpoint", endpoint)?;
        }

        validate_timeout("analysis.timeout_seconds", self.analysis.timeout_seconds)?;
        validate_confidence_threshold(
            "analysis.confidence_threshold",
            self.analysis.confidence_threshold,
        )?;

        Ok(())
    }
}
