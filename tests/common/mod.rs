#![allow(dead_code)]

use async_trait::async_trait;
use home_sentinel::core::listeners::Notification;
use home_sentinel::{
    AlarmStatus, ArmingStatus, ImageAnalyzer, InMemoryRepository, Result, SecurityError,
    SecurityRepository, SecuritySystemState, Sensor, SensorId, StatusListener,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<Notification>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().unwrap().clone()
    }

    pub fn alarm_changes(&self) -> Vec<AlarmStatus> {
        self.events()
            .into_iter()
            .filter_map(|n| match n {
                Notification::AlarmChanged(status) => Some(status),
                _ => None,
            })
            .collect()
    }

    pub fn sensor_changes(&self) -> Vec<Sensor> {
        self.events()
            .into_iter()
            .filter_map(|n| match n {
                Notification::SensorChanged(sensor) => Some(sensor),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl StatusListener for RecordingListener {
    fn on_sensor_status_changed(&self, sensor: &Sensor) -> anyhow::Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(Notification::SensorChanged(sensor.clone()));
        Ok(())
    }

    fn on_alarm_status_changed(&self, status: AlarmStatus) -> anyhow::Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(Notification::AlarmChanged(status));
        Ok(())
    }

    fn on_cat_detected(&self, detected: bool) -> anyhow::Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(Notification::CatDetected(detected));
        Ok(())
    }
}

/// Returns a fixed verdict and counts calls.
#[derive(Default)]
pub struct StubAnalyzer {
    verdict: AtomicBool,
    fail: AtomicBool,
    calls: AtomicUsize,
    last_threshold: Mutex<Option<f32>>,
}

impl StubAnalyzer {
    pub fn set_verdict(&self, verdict: bool) {
        self.verdict.store(verdict, Ordering::SeqCst);
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_threshold(&self) -> Option<f32> {
        *self.last_threshold.lock().unwrap()
    }
}

#[async_trait]
impl ImageAnalyzer for StubAnalyzer {
    async fn contains_cat(&self, _image: &[u8], confidence_threshold: f32) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_threshold.lock().unwrap() = Some(confidence_threshold);
        if self.fail.load(Ordering::SeqCst) {
            return Err(SecurityError::analysis("provider unavailable"));
        }
        Ok(self.verdict.load(Ordering::SeqCst))
    }
}

/// Blocks inside `contains_cat` until released, so tests can act while a
/// verdict is outstanding.
#[derive(Default)]
pub struct GatedAnalyzer {
    pub started: Notify,
    pub release: Notify,
    verdict: AtomicBool,
}

impl GatedAnalyzer {
    pub fn new(verdict: bool) -> Arc<Self> {
        let analyzer = Self::default();
        analyzer.verdict.store(verdict, Ordering::SeqCst);
        Arc::new(analyzer)
    }
}

#[async_trait]
impl ImageAnalyzer for GatedAnalyzer {
    async fn contains_cat(&self, _image: &[u8], _confidence_threshold: f32) -> Result<bool> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(self.verdict.load(Ordering::SeqCst))
    }
}

/// In-memory repository whose writes can be switched to fail.
#[derive(Default)]
pub struct FlakyRepository {
    inner: InMemoryRepository,
    fail_alarm_writes: AtomicBool,
    fail_arming_writes: AtomicBool,
    fail_cat_writes: AtomicBool,
}

impl FlakyRepository {
    pub fn fail_alarm_writes(&self, fail: bool) {
        self.fail_alarm_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_arming_writes(&self, fail: bool) {
        self.fail_arming_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_cat_writes(&self, fail: bool) {
        self.fail_cat_writes.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(SecurityError::repository(format!("{} write rejected", what)))
        } else {
            Ok(())
        }
    }
}

impl SecurityRepository for FlakyRepository {
    async fn get_arming_status(&self) -> Result<ArmingStatus> {
        self.inner.get_arming_status().await
    }

    async fn set_arming_status(&self, status: ArmingStatus) -> Result<()> {
        FlakyRepository::check(&self.fail_arming_writes, "arming")?;
        self.inner.set_arming_status(status).await
    }

    async fn get_alarm_status(&self) -> Result<AlarmStatus> {
        self.inner.get_alarm_status().await
    }

    async fn set_alarm_status(&self, status: AlarmStatus) -> Result<()> {
        FlakyRepository::check(&self.fail_alarm_writes, "alarm")?;
        self.inner.set_alarm_status(status).await
    }

    async fn get_cat_detected(&self) -> Result<bool> {
        self.inner.get_cat_detected().await
    }

    async fn set_cat_detected(&self, detected: bool) -> Result<()> {
        FlakyRepository::check(&self.fail_cat_writes, "cat")?;
        self.inner.set_cat_detected(detected).await
    }

    async fn get_sensors(&self) -> Result<Vec<Sensor>> {
        self.inner.get_sensors().await
    }

    async fn add_sensor(&self, sensor: Sensor) -> Result<()> {
        self.inner.add_sensor(sensor).await
    }

    async fn remove_sensor(&self, id: &SensorId) -> Result<()> {
        self.inner.remove_sensor(id).await
    }

    async fn update_sensor(&self, sensor: Sensor) -> Result<()> {
        self.inner.update_sensor(sensor).await
    }

    async fn snapshot(&self) -> Result<SecuritySystemState> {
        self.inner.snapshot().await
    }
}
