pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::SentinelConfig;

pub use adapters::{ConfiguredAnalyzer, InMemoryRepository, JsonFileRepository};
pub use crate::core::engine::{AlarmEngine, DEFAULT_CONFIDENCE_THRESHOLD};
pub use domain::model::{AlarmStatus, ArmingStatus, SecuritySystemState, Sensor, SensorId, SensorType};
pub use domain::ports::{ImageAnalyzer, SecurityRepository, StatusListener};
pub use utils::error::{Result, SecurityError};
