use crate::domain::model::{AlarmStatus, ArmingStatus, SecuritySystemState, Sensor, SensorId};
use crate::domain::ports::SecurityRepository;
use crate::utils::error::{Result, SecurityError};
use std::sync::{Mutex, MutexGuard};

/// Process-local repository. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Mutex<SecuritySystemState>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, SecuritySystemState>> {
        self.state
            .lock()
            .map_err(|_| SecurityError::repository("in-memory state lock poisoned"))
    }
}

impl SecurityRepository for InMemoryRepository {
    async fn get_arming_status(&self) -> Result<ArmingStatus> {
        Ok(self.lock()?.arming_status)
    }

    async fn set_arming_status(&self, status: ArmingStatus) -> Result<()> {
        self.lock()?.arming_status = status;
        Ok(())
    }

    async fn get_alarm_status(&self) -> Result<AlarmStatus> {
        Ok(self.lock()?.alarm_status)
    }

    async fn set_alarm_status(&self, status: AlarmStatus) -> Result<()> {
        self.lock()?.alarm_status = status;
        Ok(())
    }

    async fn get_cat_detected(&self) -> Result<bool> {
        Ok(self.lock()?.cat_detected)
    }

    async fn set_cat_detected(&self, detected: bool) -> Result<()> {
        self.lock()?.cat_detected = detected;
        Ok(())
    }

    async fn get_sensors(&self) -> Result<Vec<Sensor>> {
        Ok(self.lock()?.sensors.clone())
    }

    async fn add_sensor(&self, sensor: Sensor) -> Result<()> {
        self.lock()?.insert_sensor(sensor);
        Ok(())
    }

    async fn remove_sensor(&self, id: &SensorId) -> Result<()> {
        self.lock()?.remove_sensor(id);
        Ok(())
    }

    async fn update_sensor(&self, sensor: Sensor) -> Result<()> {
        let id = sensor.id.clone();
        if self.lock()?.replace_sensor(sensor) {
            Ok(())
        } else {
            Err(SecurityError::SensorNotFound(id))
        }
    }

    async fn snapshot(&self) -> Result<SecuritySystemState> {
        Ok(self.lock()?.clone())
    }
}
