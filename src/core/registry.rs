use crate::domain::model::{Sensor, SensorId};
use crate::domain::ports::SecurityRepository;
use crate::utils::error::{Result, SecurityError};
use crate::utils::validation::validate_sensor_name;

/// Sensor membership rules on top of the repository: identities are unique
/// and removal requires the sensor to exist.
pub struct SensorRegistry<'a, R: SecurityRepository> {
    repository: &'a R,
}

impl<'a, R: SecurityRepository> SensorRegistry<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    pub async fn add_sensor(&self, sensor: Sensor) -> Result<()> {
        validate_sensor_name(&sensor.id.name)?;
        let sensors = self.repository.get_sensors().await?;
        if sensors.iter().any(|s| s.id == sensor.id) {
            return Err(SecurityError::DuplicateSensor(sensor.id));
        }
        tracing::debug!("Registering sensor {}", sensor.id);
        self.repository.add_sensor(sensor).await
    }

    /// Returns the sensor as it was stored before removal.
    pub async fn remove_sensor(&self, id: &SensorId) -> Result<Sensor> {
        let existing = self.find(id).await?;
        tracing::debug!("Removing sensor {}", id);
        self.repository.remove_sensor(id).await?;
        Ok(existing)
    }

    pub async fn list_sensors(&self) -> Result<Vec<Sensor>> {
        self.repository.get_sensors().await
    }

    pub async fn find(&self, id: &SensorId) -> Result<Sensor> {
        self.repository
            .get_sensors()
            .await?
            .into_iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| SecurityError::SensorNotFound(id.clone()))
    }

    pub async fn any_active_except(&self, id: &SensorId) -> Result<bool> {
        let sensors = self.repository.get_sensors().await?;
        Ok(sensors.iter().any(|s| s.active && &s.id != id))
    }
}
