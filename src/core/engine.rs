use crate::core::listeners::{ListenerBus, Notification};
use crate::core::registry::SensorRegistry;
use crate::domain::model::{AlarmStatus, ArmingStatus, SecuritySystemState, Sensor, SensorId};
use crate::domain::ports::{ImageAnalyzer, SecurityRepository, StatusListener};
use crate::domain::rules::{next_alarm_status, Signal};
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Minimum classifier confidence, in percent, for an image to count as a cat sighting.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 50.0;

/// Fuses arming commands, sensor events and image verdicts into one alarm status.
///
/// Every mutating operation runs its read-evaluate-persist sequence while
/// holding `commit_lock`, so concurrent callers never interleave. The image
/// analysis call runs outside the lock. Notifications are queued on the
/// listener bus before the lock is released, so listeners see changes in
/// commit order, and delivered after it, so listeners may call back into
/// the engine. A caller's notifications may be delivered by another caller
/// that is already draining the queue.
pub struct AlarmEngine<R: SecurityRepository, A: ImageAnalyzer> {
    repository: R,
    analyzer: A,
    listeners: ListenerBus,
    confidence_threshold: f32,
    commit_lock: Mutex<()>,
}

impl<R: SecurityRepository, A: ImageAnalyzer> AlarmEngine<R, A> {
    pub fn new(repository: R, analyzer: A) -> Self {
        Self::with_confidence_threshold(repository, analyzer, DEFAULT_CONFIDENCE_THRESHOLD)
    }

    pub fn with_confidence_threshold(repository: R, analyzer: A, confidence_threshold: f32) -> Self {
        Self {
            repository,
            analyzer,
            listeners: ListenerBus::new(),
            confidence_threshold,
            commit_lock: Mutex::new(()),
        }
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn add_status_listener(&self, listener: Arc<dyn StatusListener>) -> bool {
        self.listeners.add(listener)
    }

    pub fn remove_status_listener(&self, listener: &Arc<dyn StatusListener>) -> bool {
        self.listeners.remove(listener)
    }

    pub async fn set_arming_status(&self, status: ArmingStatus) -> Result<()> {
        let result = {
            let _guard = self.commit_lock.lock().await;
            let mut outbox = Vec::new();
            let result = self.apply_arming_status(status, &mut outbox).await;
            self.listeners.enqueue(outbox);
            result
        };
        self.listeners.flush();
        result
    }

    pub async fn change_sensor_activation_status(&self, id: &SensorId, active: bool) -> Result<()> {
        let result = {
            let _guard = self.commit_lock.lock().await;
            let mut outbox = Vec::new();
            let result = self.apply_sensor_activation(id, active, &mut outbox).await;
            self.listeners.enqueue(outbox);
            result
        };
        self.listeners.flush();
        result
    }

    /// Runs the image through the analyzer and applies the verdict.
    ///
    /// On analysis failure nothing is persisted. The arming status is read
    /// again after the verdict arrives since it may have changed meanwhile.
    pub async fn process_image(&self, image: &[u8]) -> Result<bool> {
        tracing::debug!(
            "Analysing {} byte image (threshold {:.1}%)",
            image.len(),
            self.confidence_threshold
        );
        let cat_detected = match self
            .analyzer
            .contains_cat(image, self.confidence_threshold)
            .await
        {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::error!("Image analysis failed, state left unchanged: {}", e);
                return Err(e);
            }
        };

        let result = {
            let _guard = self.commit_lock.lock().await;
            let mut outbox = Vec::new();
            let result = self.apply_image_verdict(cat_detected, &mut outbox).await;
            self.listeners.enqueue(outbox);
            result
        };
        self.listeners.flush();
        result.map(|()| cat_detected)
    }

    /// Unconditional override. Always persists and notifies, even if unchanged.
    pub async fn set_alarm_status(&self, status: AlarmStatus) -> Result<()> {
        let result = {
            let _guard = self.commit_lock.lock().await;
            let mut outbox = Vec::new();
            let result = self.write_alarm_status(status, &mut outbox).await;
            self.listeners.enqueue(outbox);
            result
        };
        self.listeners.flush();
        result
    }

    pub async fn add_sensor(&self, sensor: Sensor) -> Result<()> {
        let _guard = self.commit_lock.lock().await;
        SensorRegistry::new(&self.repository).add_sensor(sensor).await
    }

    pub async fn remove_sensor(&self, id: &SensorId) -> Result<Sensor> {
        let _guard = self.commit_lock.lock().await;
        SensorRegistry::new(&self.repository).remove_sensor(id).await
    }

    pub async fn get_alarm_status(&self) -> Result<AlarmStatus> {
        self.repository.get_alarm_status().await
    }

    pub async fn get_arming_status(&self) -> Result<ArmingStatus> {
        self.repository.get_arming_status().await
    }

    pub async fn get_sensors(&self) -> Result<Vec<Sensor>> {
        SensorRegistry::new(&self.repository).list_sensors().await
    }

    pub async fn is_cat_detected(&self) -> Result<bool> {
        self.repository.get_cat_detected().await
    }

    pub async fn state(&self) -> Result<SecuritySystemState> {
        self.repository.snapshot().await
    }

    /// Arming is persisted before a cat-triggered `ALARM`, and `NO_ALARM`
    /// before `DISARMED`, so a failed write never leaves `DISARMED` with `ALARM`.
    async fn apply_arming_status(
        &self,
        status: ArmingStatus,
        outbox: &mut Vec<Notification>,
    ) -> Result<()> {
        if !status.is_armed() {
            self.write_alarm_status(AlarmStatus::NoAlarm, outbox).await?;
            self.repository.set_arming_status(status).await?;
            tracing::info!("Arming status set to {}", status);
            return Ok(());
        }

        for sensor in self.repository.get_sensors().await? {
            let sensor = sensor.with_active(false);
            self.repository.update_sensor(sensor.clone()).await?;
            outbox.push(Notification::SensorChanged(sensor));
        }
        self.repository.set_arming_status(status).await?;
        tracing::info!("Arming status set to {}", status);

        let current = self.repository.get_alarm_status().await?;
        let cat_detected = self.repository.get_cat_detected().await?;
        let next = next_alarm_status(
            current,
            Signal::Arming {
                status,
                cat_detected,
            },
        );
        self.commit_alarm_status(current, next, outbox).await
    }

    async fn apply_sensor_activation(
        &self,
        id: &SensorId,
        active: bool,
        outbox: &mut Vec<Notification>,
    ) -> Result<()> {
        let registry = SensorRegistry::new(&self.repository);
        let mut sensor = registry.find(id).await?;
        sensor.active = active;
        self.repository.update_sensor(sensor.clone()).await?;
        tracing::debug!("Persisted sensor {}", sensor);
        outbox.push(Notification::SensorChanged(sensor));

        let current = self.repository.get_alarm_status().await?;
        if current == AlarmStatus::Alarm {
            return Ok(());
        }

        let signal = if active {
            Signal::SensorActivated {
                arming: self.repository.get_arming_status().await?,
            }
        } else {
            Signal::SensorDeactivated {
                others_active: registry.any_active_except(id).await?,
            }
        };
        let next = next_alarm_status(current, signal);
        self.commit_alarm_status(current, next, outbox).await
    }

    async fn apply_image_verdict(
        &self,
        cat_detected: bool,
        outbox: &mut Vec<Notification>,
    ) -> Result<()> {
        self.repository.set_cat_detected(cat_detected).await?;
        tracing::info!("Cat detected: {}", cat_detected);
        outbox.push(Notification::CatDetected(cat_detected));

        let state = self.repository.snapshot().await?;
        let current = state.alarm_status;
        let next = next_alarm_status(
            current,
            Signal::ImageVerdict {
                cat_detected,
                arming: state.arming_status,
                any_sensor_active: state.any_sensor_active(),
            },
        );
        self.commit_alarm_status(current, next, outbox).await
    }

    async fn commit_alarm_status(
        &self,
        current: AlarmStatus,
        next: AlarmStatus,
        outbox: &mut Vec<Notification>,
    ) -> Result<()> {
        if next == current {
            return Ok(());
        }
        self.write_alarm_status(next, outbox).await?;
        tracing::info!("Alarm status {} -> {}", current, next);
        Ok(())
    }

    async fn write_alarm_status(
        &self,
        status: AlarmStatus,
        outbox: &mut Vec<Notification>,
    ) -> Result<()> {
        self.repository.set_alarm_status(status).await?;
        tracing::debug!("Persisted alarm status {}", status);
        outbox.push(Notification::AlarmChanged(status));
        Ok(())
    }
}
