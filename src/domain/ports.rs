use crate::domain::model::{AlarmStatus, ArmingStatus, SecuritySystemState, Sensor, SensorId};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Durable store for the whole security system state.
///
/// Implementations must be strongly consistent within one process: a read
/// issued after a successful write observes that write.
pub trait SecurityRepository: Send + Sync {
    fn get_arming_status(&self) -> impl Future<Output = Result<ArmingStatus>> + Send;
    fn set_arming_status(&self, status: ArmingStatus) -> impl Future<Output = Result<()>> + Send;

    fn get_alarm_status(&self) -> impl Future<Output = Result<AlarmStatus>> + Send;
    fn set_alarm_status(&self, status: AlarmStatus) -> impl Future<Output = Result<()>> + Send;

    fn get_cat_detected(&self) -> impl Future<Output = Result<bool>> + Send;
    fn set_cat_detected(&self, detected: bool) -> impl Future<Output = Result<()>> + Send;

    fn get_sensors(&self) -> impl Future<Output = Result<Vec<Sensor>>> + Send;
    fn add_sensor(&self, sensor: Sensor) -> impl Future<Output = Result<()>> + Send;
    fn remove_sensor(&self, id: &SensorId) -> impl Future<Output = Result<()>> + Send;
    fn update_sensor(&self, sensor: Sensor) -> impl Future<Output = Result<()>> + Send;

    fn snapshot(&self) -> impl Future<Output = Result<SecuritySystemState>> + Send;
}

impl<T: SecurityRepository> SecurityRepository for Arc<T> {
    fn get_arming_status(&self) -> impl Future<Output = Result<ArmingStatus>> + Send {
        (**self).get_arming_status()
    }

    fn set_arming_status(&self, status: ArmingStatus) -> impl Future<Output = Result<()>> + Send {
        (**self).set_arming_status(status)
    }

    fn get_alarm_status(&self) -> impl Future<Output = Result<AlarmStatus>> + Send {
        (**self).get_alarm_status()
    }

    fn set_alarm_status(&self, status: AlarmStatus) -> impl Future<Output = Result<()>> + Send {
        (**self).set_alarm_status(status)
    }

    fn get_cat_detected(&self) -> impl Future<Output = Result<bool>> + Send {
        (**self).get_cat_detected()
    }

    fn set_cat_detected(&self, detected: bool) -> impl Future<Output = Result<()>> + Send {
        (**self).set_cat_detected(detected)
    }

    fn get_sensors(&self) -> impl Future<Output = Result<Vec<Sensor>>> + Send {
        (**self).get_sensors()
    }

    fn add_sensor(&self, sensor: Sensor) -> impl Future<Output = Result<()>> + Send {
        (**self).add_sensor(sensor)
    }

    fn remove_sensor(&self, id: &SensorId) -> impl Future<Output = Result<()>> + Send {
        (**self).remove_sensor(id)
    }

    fn update_sensor(&self, sensor: Sensor) -> impl Future<Output = Result<()>> + Send {
        (**self).update_sensor(sensor)
    }

    fn snapshot(&self) -> impl Future<Output = Result<SecuritySystemState>> + Send {
        (**self).snapshot()
    }
}

/// External image classifier.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Returns whether the image contains a cat with at least `confidence_threshold`
    /// percent confidence. Provider or transport failures map to `AnalysisError`.
    async fn contains_cat(&self, image: &[u8], confidence_threshold: f32) -> Result<bool>;
}

#[async_trait]
impl<T: ImageAnalyzer + ?Sized> ImageAnalyzer for Arc<T> {
    async fn contains_cat(&self, image: &[u8], confidence_threshold: f32) -> Result<bool> {
        (**self).contains_cat(image, confidence_threshold).await
    }
}

/// Observer of security system changes.
///
/// Callbacks run synchronously on the caller's task after the change is
/// persisted. An error or panic from one listener is logged and does not
/// stop delivery to the others.
pub trait StatusListener: Send + Sync {
    fn on_sensor_status_changed(&self, _sensor: &Sensor) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_alarm_status_changed(&self, _status: AlarmStatus) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_cat_detected(&self, _detected: bool) -> anyhow::Result<()> {
        Ok(())
    }
}
