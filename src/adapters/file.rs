use crate::domain::model::{AlarmStatus, ArmingStatus, SecuritySystemState, Sensor, SensorId};
use crate::domain::ports::SecurityRepository;
use crate::utils::error::{Result, SecurityError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Keeps the whole security state as one JSON document on disk.
///
/// Every mutation is written through before it becomes visible to readers.
/// Writes go to a sibling temp file that is then renamed over the target,
/// so a crash never leaves a half-written state file.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    state: Mutex<SecuritySystemState>,
}

impl JsonFileRepository {
    /// Loads the state file, or starts from the default state if it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                SecurityError::repository(format!("corrupt state file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No state file at {}, starting fresh", path.display());
                SecuritySystemState::default()
            }
            Err(e) => {
                return Err(SecurityError::repository(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read<T>(&self, f: impl FnOnce(&SecuritySystemState) -> T) -> T {
        let state = self.state.lock().await;
        f(&state)
    }

    /// Applies `f` to a copy of the state, persists it, and only then swaps it in.
    async fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut SecuritySystemState) -> Result<()> + Send,
    {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        f(&mut next)?;
        self.persist(&next).await?;
        *state = next;
        Ok(())
    }

    async fn persist(&self, state: &SecuritySystemState) -> Result<()> {
        let json = serde_json::to_vec_pretty(state)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(e))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &json)
            .await
            .map_err(|e| self.write_error(e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.write_error(e))?;

        tracing::debug!("Wrote {} bytes to {}", json.len(), self.path.display());
        Ok(())
    }

    fn write_error(&self, e: std::io::Error) -> SecurityError {
        SecurityError::repository(format!("failed to write {}: {}", self.path.display(), e))
    }
}

impl SecurityRepository for JsonFileRepository {
    async fn get_arming_status(&self) -> Result<ArmingStatus> {
        Ok(self.read(|s| s.arming_status).await)
    }

    async fn set_arming_status(&self, status: ArmingStatus) -> Result<()> {
        self.mutate(|s| {
            s.arming_status = status;
            Ok(())
        })
        .await
    }

    async fn get_alarm_status(&self) -> Result<AlarmStatus> {
        Ok(self.read(|s| s.alarm_status).await)
    }

    async fn set_alarm_status(&self, status: AlarmStatus) -> Result<()> {
        self.mutate(|s| {
            s.alarm_status = status;
            Ok(())
        })
        .await
    }

    async fn get_cat_detected(&self) -> Result<bool> {
        Ok(self.read(|s| s.cat_detected).await)
    }

    async fn set_cat_detected(&self, detected: bool) -> Result<()> {
        self.mutate(|s| {
            s.cat_detected = detected;
            Ok(())
        })
        .await
    }

    async fn get_sensors(&self) -> Result<Vec<Sensor>> {
        Ok(self.read(|s| s.sensors.clone()).await)
    }

    async fn add_sensor(&self, sensor: Sensor) -> Result<()> {
        self.mutate(|s| {
            s.insert_sensor(sensor);
            Ok(())
        })
        .await
    }

    async fn remove_sensor(&self, id: &SensorId) -> Result<()> {
        self.mutate(|s| {
            s.remove_sensor(id);
            Ok(())
        })
        .await
    }

    async fn update_sensor(&self, sensor: Sensor) -> Result<()> {
        self.mutate(|s| {
            let id = sensor.id.clone();
            if s.replace_sensor(sensor) {
                Ok(())
            } else {
                Err(SecurityError::SensorNotFound(id))
            }
        })
        .await
    }

    async fn snapshot(&self) -> Result<SecuritySystemState> {
        Ok(self.read(|s| s.clone()).await)
    }
}
