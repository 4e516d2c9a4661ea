pub mod engine;
pub mod listeners;
pub mod registry;

pub use crate::domain::model::{AlarmStatus, ArmingStatus, SecuritySystemState, Sensor, SensorId};
pub use crate::domain::ports::{ImageAnalyzer, SecurityRepository, StatusListener};
pub use crate::utils::error::Result;
