//! Slot occupancy status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How full a slot is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlotStatus {
    /// Nothing booked.
    Empty,
    /// Some participants booked, spots remain.
    Partial,
    /// No spots remain. Includes slots whose capacity was cut below `booked`.
    Full,
}

impl SlotStatus {
    /// Classify a slot from its counters.
    pub fn of(booked: i32, capacity: i32) -> Self {
        if booked <= 0 {
            Self::Empty
        } else if booked >= capacity {
            Self::Full
        } else {
            Self::Partial
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "EMPTY"),
            Self::Partial => write!(f, "PARTIAL"),
            Self::Full => write!(f, "FULL"),
        }
    }
}
