use crate::utils::error::SecurityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorType {
    Door,
    Window,
    Motion,
}

/// Identity of a sensor. Two sensors with the same name and type are the same sensor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SensorId {
    pub name: String,
    pub sensor_type: SensorType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArmingStatus {
    #[default]
    Disarmed,
    ArmedHome,
    ArmedAway,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmStatus {
    #[default]
    NoAlarm,
    PendingAlarm,
    Alarm,
}

/// Everything the repository persists. Sensors are kept sorted by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySystemState {
    pub arming_status: ArmingStatus,
    pub alarm_status: AlarmStatus,
    #[serde(default)]
    pub sensors: Vec<Sensor>,
    #[serde(default)]
    pub cat_detected: bool,
}

impl SensorId {
    pub fn new(name: impl Into<String>, sensor_type: SensorType) -> Self {
        Self {
            name: name.into(),
            sensor_type,
        }
    }
}

impl Sensor {
    /// New sensors start inactive.
    pub fn new(name: impl Into<String>, sensor_type: SensorType) -> Self {
        Self {
            id: SensorId::new(name, sensor_type),
            active: false,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

impl ArmingStatus {
    pub fn is_armed(self) -> bool {
        !matches!(self, ArmingStatus::Disarmed)
    }
}

impl SecuritySystemState {
    pub fn any_sensor_active(&self) -> bool {
        self.sensors.iter().any(|s| s.active)
    }

    /// Inserts or replaces by identity, keeping sensors sorted.
    pub fn insert_sensor(&mut self, sensor: Sensor) {
        match self.sensors.binary_search_by(|s| s.id.cmp(&sensor.id)) {
            Ok(index) => self.sensors[index] = sensor,
            Err(index) => self.sensors.insert(index, sensor),
        }
    }

    /// Returns false if no sensor with this identity exists.
    pub fn replace_sensor(&mut self, sensor: Sensor) -> bool {
        match self.sensors.iter_mut().find(|s| s.id == sensor.id) {
            Some(slot) => {
                *slot = sensor;
                true
            }
            None => false,
        }
    }

    pub fn remove_sensor(&mut self, id: &SensorId) -> bool {
        let before = self.sensors.len();
        self.sensors.retain(|s| &s.id != id);
        self.sensors.len() != before
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

fn invalid(kind: &str, input: &str) -> SecurityError {
    SecurityError::ValidationError {
        message: format!("unknown {}: '{}'", kind, input),
    }
}

impl FromStr for SensorType {
    type Err = SecurityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "door" => Ok(SensorType::Door),
            "window" => Ok(SensorType::Window),
            "motion" => Ok(SensorType::Motion),
            _ => Err(invalid("sensor type", s)),
        }
    }
}

impl FromStr for ArmingStatus {
    type Err = SecurityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "disarmed" => Ok(ArmingStatus::Disarmed),
            "armed_home" | "home" => Ok(ArmingStatus::ArmedHome),
            "armed_away" | "away" => Ok(ArmingStatus::ArmedAway),
            _ => Err(invalid("arming status", s)),
        }
    }
}

impl FromStr for AlarmStatus {
    type Err = SecurityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "no_alarm" | "none" => Ok(AlarmStatus::NoAlarm),
            "pending_alarm" | "pending" => Ok(AlarmStatus::PendingAlarm),
            "alarm" => Ok(AlarmStatus::Alarm),
            _ => Err(invalid("alarm status", s)),
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SensorType::Door => "door",
            SensorType::Window => "window",
            SensorType::Motion => "motion",
        };
        f.write_str(label)
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.sensor_type)
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.active { "active" } else { "inactive" };
        write!(f, "{} [{}]", self.id, state)
    }
}

impl fmt::Display for ArmingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArmingStatus::Disarmed => "disarmed",
            ArmingStatus::ArmedHome => "armed (home)",
            ArmingStatus::ArmedAway => "armed (away)",
        };
        f.write_str(label)
    }
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlarmStatus::NoAlarm => "no alarm",
            AlarmStatus::PendingAlarm => "pending alarm",
            AlarmStatus::Alarm => "ALARM",
        };
        f.write_str(label)
    }
}
