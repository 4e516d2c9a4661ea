use crate::domain::model::SensorId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecurityError {
    #[error("Sensor already registered: {0}")]
    DuplicateSensor(SensorId),

    #[error("Sensor not found: {0}")]
    SensorNotFound(SensorId),

    #[error("Image analysis failed: {message}")]
    AnalysisError { message: String },

    #[error("Repository error: {message}")]
    RepositoryError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Registry,
    Analysis,
    Persistence,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SecurityError {
    pub fn analysis(message: impl Into<String>) -> Self {
        Self::AnalysisError {
            message: message.into(),
        }
    }

    pub fn repository(message: impl Into<String>) -> Self {
        Self::RepositoryError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateSensor(_) | Self::SensorNotFound(_) => ErrorCategory::Registry,
            Self::AnalysisError { .. } => ErrorCategory::Analysis,
            Self::RepositoryError { .. } | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorCategory::Persistence
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Registry | ErrorCategory::Input => ErrorSeverity::Low,
            // 影像服務通常是暫時性故障，可重試
            ErrorCategory::Analysis => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Persistence => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::DuplicateSensor(_) => "Use a different sensor name or remove the existing sensor first",
            Self::SensorNotFound(_) => "Check the sensor list for the exact name and type",
            Self::AnalysisError { .. } => {
                "Check that the image analysis endpoint is reachable and try the scan again"
            }
            Self::RepositoryError { .. } | Self::IoError(_) => {
                "Check that the state file location exists and is writable"
            }
            Self::SerializationError(_) => {
                "The state file is corrupted; restore it from a backup or delete it to start fresh"
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the configuration file and fix the reported field",
            Self::ValidationError { .. } => "Check the command arguments",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::DuplicateSensor(id) => format!("Sensor '{}' already exists", id),
            Self::SensorNotFound(id) => format!("No sensor named '{}'", id),
            Self::AnalysisError { .. } => "The camera image could not be analysed".to_string(),
            Self::RepositoryError { .. } | Self::IoError(_) | Self::SerializationError(_) => {
                "The security system state could not be read or saved".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SecurityError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SensorType;

    #[test]
    fn test_severity_follows_category() {
        let duplicate = SecurityError::DuplicateSensor(SensorId::new("Front", SensorType::Door));
        assert_eq!(duplicate.category(), ErrorCategory::Registry);
        assert_eq!(duplicate.severity(), ErrorSeverity::Low);

        assert_eq!(
            SecurityError::analysis("timeout").severity(),
            ErrorSeverity::Medium
        );
        assert_eq!(
            SecurityError::repository("disk full").severity(),
            ErrorSeverity::Critical
        );
    }

    #[test]
    fn test_user_friendly_message_names_sensor() {
        let err = SecurityError::SensorNotFound(SensorId::new("Garage", SensorType::Window));
        assert!(err.user_friendly_message().contains("Garage"));
    }
}
