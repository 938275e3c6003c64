// MIT License - Copyright (c) 2026 Peter Wright
// Update coordinator

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::IntegrationConfig;
use crate::devices::{DeviceSnapshot, SharedDevice};
use crate::error::Result;
use crate::event::{event_channel, CoordinatorEvent, EventReceiver, EventSender};

/// Holds the shared device snapshot and the integration settings.
///
/// Fetching data from the alarm system is somebody else's job: the
/// coordinator only applies the snapshots it is handed and tells
/// subscribers about it. Entities read the device through it and never
/// write.
#[derive(Debug)]
pub struct Coordinator {
    config: Arc<IntegrationConfig>,
    device: Arc<SharedDevice>,
    events: EventSender,
    last_update_success: AtomicBool,
    last_update: RwLock<Option<DateTime<Utc>>>,
}

impl Coordinator {
    pub fn new(config: IntegrationConfig, device: Arc<SharedDevice>) -> Self {
        let (events, _) = event_channel(64);
        Self {
            config: Arc::new(config),
            device,
            events,
            last_update_success: AtomicBool::new(true),
            last_update: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    pub fn device(&self) -> Arc<SharedDevice> {
        Arc::clone(&self.device)
    }

    /// Subscribe to refresh events.
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Whether the most recent refresh was applied.
    pub fn last_update_success(&self) -> bool {
        self.last_update_success.load(Ordering::SeqCst)
    }

    /// Time of the most recent successful refresh.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        *self.last_update.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a freshly fetched snapshot and notify subscribers.
    pub fn apply(&self, snapshot: DeviceSnapshot) {
        debug!(
            "Applying snapshot: {} sectors, {} inputs, {} alerts",
            snapshot.sectors.len(),
            snapshot.inputs.len(),
            snapshot.alerts.len()
        );
        self.device.replace(snapshot);
        let now = Utc::now();
        *self.last_update.write().unwrap_or_else(PoisonError::into_inner) = Some(now);
        if !self.last_update_success.swap(true, Ordering::SeqCst) {
            info!("Device data available again");
        }
        self.notify(CoordinatorEvent::Refreshed { at: now });
    }

    /// Parse and apply a JSON snapshot. A malformed payload marks the
    /// refresh as failed and leaves the previous snapshot in place.
    pub fn apply_json(&self, payload: &str) -> Result<()> {
        match DeviceSnapshot::from_json(payload) {
            Ok(snapshot) => {
                self.apply(snapshot);
                Ok(())
            }
            Err(e) => {
                self.mark_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Record a failed refresh.
    pub fn mark_failed(&self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!("Refresh failed: {reason}");
        self.last_update_success.store(false, Ordering::SeqCst);
        self.notify(CoordinatorEvent::RefreshFailed { reason });
    }

    fn notify(&self, event: CoordinatorEvent) {
        // No receivers is fine before the bridge starts listening.
        if self.events.send(event).is_err() {
            debug!("No coordinator subscribers");
        }
    }
}
