use crate::domain::model::{AlarmStatus, Sensor};
use crate::domain::ports::StatusListener;

/// Writes every status change to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl StatusListener for TracingListener {
    fn on_sensor_status_changed(&self, sensor: &Sensor) -> anyhow::Result<()> {
        tracing::info!(sensor = %sensor.id, active = sensor.active, "sensor status changed");
        Ok(())
    }

    fn on_alarm_status_changed(&self, status: AlarmStatus) -> anyhow::Result<()> {
        match status {
            AlarmStatus::Alarm => tracing::warn!(%status, "alarm status changed"),
            _ => tracing::info!(%status, "alarm status changed"),
        }
        Ok(())
    }

    fn on_cat_detected(&self, detected: bool) -> anyhow::Result<()> {
        tracing::info!(detected, "cat detection updated");
        Ok(())
    }
}
