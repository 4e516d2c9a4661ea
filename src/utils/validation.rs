use crate::utils::error::{Result, SecurityError};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Longest sensor name accepted, in characters.
pub const MAX_SENSOR_NAME_LEN: usize = 64;

/// Upper bound for the image analysis request timeout.
pub const MAX_ANALYSIS_TIMEOUT_SECS: u64 = 300;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> SecurityError {
    SecurityError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn required<'a, T>(field: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SecurityError::MissingConfigError {
        field: field.to_string(),
    })
}

/// Parses a label-detection endpoint. Only absolute http(s) URLs with a host pass.
pub fn validate_endpoint(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| invalid(field, raw, format!("not a URL ({})", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            raw,
            format!("scheme '{}' is not supported, use http or https", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(field, raw, "URL has no host"));
    }

    Ok(url)
}

/// The state file must name a file; directories and blank paths are rejected.
pub fn validate_state_file(field: &str, raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
        return Err(invalid(field, raw, "state file path is empty"));
    }
    if raw.contains('\0') {
        return Err(invalid(field, raw.escape_default(), "path contains a NUL byte"));
    }
    if raw.ends_with('/') || raw.ends_with(std::path::MAIN_SEPARATOR) {
        return Err(invalid(field, raw, "path names a directory, not a file"));
    }
    match Path::new(raw).file_name() {
        Some(_) => Ok(()),
        None => Err(invalid(field, raw, "path names a directory, not a file")),
    }
}

/// Sensor names end up on panels and in log lines: one line, not blank, bounded.
pub fn validate_sensor_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    let reason = if trimmed.is_empty() {
        "sensor name cannot be blank"
    } else if trimmed.chars().any(char::is_control) {
        "sensor name must be a single line of printable text"
    } else if trimmed.chars().count() > MAX_SENSOR_NAME_LEN {
        "sensor name is too long"
    } else {
        return Ok(());
    };

    Err(SecurityError::ValidationError {
        message: format!("{}: '{}'", reason, name.escape_debug()),
    })
}

/// Confidence is a percentage as reported by the classifier.
pub fn validate_confidence_threshold(field: &str, value: f32) -> Result<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, value, "confidence must be a percentage between 0 and 100"))
    }
}

pub fn validate_timeout(field: &str, seconds: u64) -> Result<Duration> {
    match seconds {
        0 => Err(invalid(field, seconds, "timeout must be at least one second")),
        s if s > MAX_ANALYSIS_TIMEOUT_SECS => Err(invalid(
            field,
            seconds,
            format!("timeout cannot exceed {} seconds", MAX_ANALYSIS_TIMEOUT_SECS),
        )),
        s => Ok(Duration::from_secs(s)),
    }
}
