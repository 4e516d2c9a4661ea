use crate::domain::model::{AlarmStatus, Sensor};
use crate::domain::ports::StatusListener;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, RwLock};

/// A change to deliver to every registered listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    SensorChanged(Sensor),
    AlarmChanged(AlarmStatus),
    CatDetected(bool),
}

#[derive(Debug, Default)]
struct Outbox {
    queue: VecDeque<Notification>,
    draining: bool,
}

/// Ordered set of status listeners, compared by pointer identity.
///
/// Notifications go through one FIFO queue. Callers `enqueue` while they
/// hold the engine's commit lock, so the queue follows commit order, then
/// `flush` once the lock is released. Only one caller drains at a time; the
/// others return straight away and their notifications are delivered by the
/// caller already draining. A listener that re-enters the engine therefore
/// only enqueues, and sees its own changes after the current batch.
#[derive(Default)]
pub struct ListenerBus {
    listeners: RwLock<Vec<Arc<dyn StatusListener>>>,
    outbox: Mutex<Outbox>,
}

impl ListenerBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the listener was already registered.
    pub fn add(&self, listener: Arc<dyn StatusListener>) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Returns false if the listener was not registered.
    pub fn remove(&self, listener: &Arc<dyn StatusListener>) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn enqueue(&self, notifications: Vec<Notification>) {
        if notifications.is_empty() {
            return;
        }
        self.lock_outbox().queue.extend(notifications);
    }

    /// Delivers everything queued, in order, unless another caller is
    /// already draining.
    pub fn flush(&self) {
        {
            let mut outbox = self.lock_outbox();
            if outbox.draining {
                return;
            }
            outbox.draining = true;
        }

        loop {
            let batch: Vec<Notification> = {
                let mut outbox = self.lock_outbox();
                if outbox.queue.is_empty() {
                    outbox.draining = false;
                    return;
                }
                outbox.queue.drain(..).collect()
            };
            self.dispatch(&batch);
        }
    }

    fn lock_outbox(&self) -> std::sync::MutexGuard<'_, Outbox> {
        self.outbox.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Delivers each notification to every listener in registration order.
    ///
    /// Works on a copy of the membership so listeners may add or remove
    /// listeners while being notified.
    fn dispatch(&self, notifications: &[Notification]) {
        let listeners: Vec<Arc<dyn StatusListener>> = self
            .listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        for notification in notifications {
            for (index, listener) in listeners.iter().enumerate() {
                let outcome = catch_unwind(AssertUnwindSafe(|| match notification {
                    Notification::SensorChanged(sensor) => listener.on_sensor_status_changed(sensor),
                    Notification::AlarmChanged(status) => listener.on_alarm_status_changed(*status),
                    Notification::CatDetected(detected) => listener.on_cat_detected(*detected),
                }));

                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::warn!("Listener #{} failed on {:?}: {:#}", index, notification, e);
                    }
                    Err(_) => {
                        tracing::warn!("Listener #{} panicked on {:?}", index, notification);
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for ListenerBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerBus")
            .field("listeners", &self.len())
            .finish()
    }
}
