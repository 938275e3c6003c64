// MIT License - Copyright (c) 2026 Peter Wright
// e-Connect / Metronet constants

use std::fmt;

/// Integration domain, used in unique ids and entity ids.
pub const DOMAIN: &str = "econnect_metronet";

/// Alerts with three states (off / warning / alarm). They are not exposed
/// as binary sensors.
pub const MULTI_STATE_ALERTS: [&str; 3] = ["alarm_led", "inputs_led", "tamper_led"];

/// Alert whose "on" state is the alarm level (2), not the warning level (1).
pub const ANOMALIES_LED: &str = "anomalies_led";

pub const ICON_SECTOR: &str = "hass:shield-home-outline";
pub const ICON_INPUT: &str = "hass:electric-switch";
pub const ICON_ALERT: &str = "hass:alarm-light";

/// MQTT payloads for binary sensor state.
pub const PAYLOAD_ON: &str = "ON";
pub const PAYLOAD_OFF: &str = "OFF";

pub const AVAILABILITY_ONLINE: &str = "online";
pub const AVAILABILITY_OFFLINE: &str = "offline";

pub const MANUFACTURER: &str = "Elmo";
pub const MODEL: &str = "e-Connect/Metronet";

/// Query categories of the e-Connect device library.
///
/// The numeric values are the library's query tags and end up in the
/// unique ids of sector and input entities, so they must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Category {
    Sectors = 9,
    Inputs = 10,
    Alerts = 11,
}

impl Category {
    /// Numeric query tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sectors => "sectors",
            Self::Inputs => "inputs",
            Self::Alerts => "alerts",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary sensor device classes used by this integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Problem,
}

impl DeviceClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Problem => "problem",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
