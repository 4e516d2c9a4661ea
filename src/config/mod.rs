#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, SensorCommand};
pub use toml_config::{AnalysisConfig, AnalysisProvider, LogFormat, SentinelConfig};
