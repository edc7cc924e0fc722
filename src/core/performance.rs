//! Performance values with an explicit "not measured" state.
//!
//! Raw performance tables encode missing measurements as non-positive
//! numbers. [`Performance::from_raw`] converts at the store boundary so the
//! rest of the crate never compares against a sentinel.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Performance of a pipeline on a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Performance {
    /// A valid measurement (always `> 0`).
    Measured(f64),
    /// No measurement exists for the pair.
    Unmeasured,
}

impl Performance {
    /// Converts a raw value, treating anything `<= 0` (or NaN) as unmeasured.
    #[must_use]
    pub fn from_raw(value: f64) -> Self {
        if value > 0.0 {
            Self::Measured(value)
        } else {
            Self::Unmeasured
        }
    }

    /// Returns the measured value, if any.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Measured(v) => Some(v),
            Self::Unmeasured => None,
        }
    }

    /// Returns `true` for a valid measurement.
    #[must_use]
    pub const fn is_measured(self) -> bool {
        matches!(self, Self::Measured(_))
    }

    /// Orders two performances best-first.
    ///
    /// Higher measured values come first; unmeasured entries sort after every
    /// measurement and compare equal to each other, so a stable sort keeps
    /// their input order.
    #[must_use]
    pub fn cmp_descending(self, other: Self) -> Ordering {
        match (self, other) {
            (Self::Measured(a), Self::Measured(b)) => b.total_cmp(&a),
            (Self::Measured(_), Self::Unmeasured) => Ordering::Less,
            (Self::Unmeasured, Self::Measured(_)) => Ordering::Greater,
            (Self::Unmeasured, Self::Unmeasured) => Ordering::Equal,
        }
    }
}

impl From<f64> for Performance {
    fn from(value: f64) -> Self {
        Self::from_raw(value)
    }
}
