// MIT License - Copyright (c) 2026 Peter Wright
// Raw status values reported by the e-Connect device library

use serde::{Deserialize, Serialize};

/// Raw status of a sector, input or alert.
///
/// Sectors and inputs usually report a boolean; alerts report a level
/// (0 = off, 1 = warning, 2 = alarm for the tri-state LEDs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Status {
    Bool(bool),
    Level(i64),
}

impl Status {
    /// Zero/non-zero coercion.
    pub fn as_bool(self) -> bool {
        match self {
            Self::Bool(b) => b,
            Self::Level(n) => n != 0,
        }
    }

    /// Numeric level, with `true` counting as 1.
    pub fn level(self) -> i64 {
        match self {
            Self::Bool(b) => i64::from(b),
            Self::Level(n) => n,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Bool(false)
    }
}

impl From<bool> for Status {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Status {
    fn from(n: i64) -> Self {
        Self::Level(n)
    }
}
