//! Alarm escalation rules as a pure function of the current alarm status
//! and the signal being applied.
//!
//! ```text
//!            armed activation           armed activation
//!  NO_ALARM ─────────────────► PENDING ─────────────────► ALARM
//!     ▲                           │                         │
//!     └── last active sensor ─────┘                         │
//!     │   deactivates                                       │
//!     └──────────── disarm / no cat with no active sensor ──┘
//! ```
//!
//! `ALARM` never changes because of sensor activity.

use crate::domain::model::{AlarmStatus, ArmingStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The arming status is being set to `status`.
    Arming {
        status: ArmingStatus,
        cat_detected: bool,
    },
    SensorActivated {
        arming: ArmingStatus,
    },
    /// A sensor went inactive; `others_active` reports whether any other
    /// registered sensor is still active.
    SensorDeactivated {
        others_active: bool,
    },
    ImageVerdict {
        cat_detected: bool,
        arming: ArmingStatus,
        any_sensor_active: bool,
    },
}

pub fn next_alarm_status(current: AlarmStatus, signal: Signal) -> AlarmStatus {
    use crate::domain::model::AlarmStatus::*;

    match signal {
        Signal::Arming {
            status: ArmingStatus::Disarmed,
            ..
        } => NoAlarm,
        // Only home mode escalates on a cat sighting.
        Signal::Arming {
            status: ArmingStatus::ArmedHome,
            cat_detected: true,
        } => Alarm,
        Signal::Arming { .. } => current,

        Signal::SensorActivated { .. } | Signal::SensorDeactivated { .. } if current == Alarm => {
            Alarm
        }
        Signal::SensorActivated {
            arming: ArmingStatus::Disarmed,
        } => current,
        Signal::SensorActivated { .. } => match current {
            NoAlarm => PendingAlarm,
            PendingAlarm | Alarm => Alarm,
        },
        Signal::SensorDeactivated {
            others_active: false,
        } if current == PendingAlarm => NoAlarm,
        Signal::SensorDeactivated { .. } => current,

        Signal::ImageVerdict {
            cat_detected: true,
            arming: ArmingStatus::ArmedHome,
            ..
        } => Alarm,
        Signal::ImageVerdict {
            cat_detected: false,
            any_sensor_active: false,
            ..
        } => NoAlarm,
        Signal::ImageVerdict { .. } => current,
    }
}
