// MIT License - Copyright (c) 2026 Peter Wright
// Alarm device model

pub mod alarm;
pub mod status;

pub use alarm::{AlarmDevice, DeviceSnapshot, Item, SharedDevice};
pub use status::Status;
