//! Time provider abstraction
//!
//! The in-memory account store stamps `user_registered` on new accounts.
//! This module provides a [`Clock`] trait so production code reads the system
//! time while tests pin it to a known instant.
//!
//! # Example
//!
//! ```
//! use userbridge::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let stamp = clock.now_registered();
//! assert_eq!(stamp.len(), "2024-01-01 00:00:00".len());
//! ```

use std::fmt::Debug;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, TimeZone, Utc};

#[cfg(any(test, feature = "testing"))]
use std::sync::{Mutex, PoisonError};

use crate::constants::REGISTERED_FORMAT;

/// A time provider for account timestamps.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current time as milliseconds since Unix epoch.
    fn now_millis(&self) -> u64;

    /// Current time as a UTC datetime.
    fn now_utc(&self) -> DateTime<Utc> {
        let millis = self.now_millis();
        Utc.timestamp_millis_opt(millis as i64)
            .single()
            .unwrap_or_default()
    }

    /// Current time formatted the way account records store registration dates.
    fn now_registered(&self) -> String {
        self.now_utc().format(REGISTERED_FORMAT).to_string()
    }
}

/// Production clock using real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Test clock pinned to a settable instant.
///
/// Unlike [`SystemClock`] this never moves on its own; call [`FixedClock::advance`]
/// or [`FixedClock::set`] to change the reported time.
///
/// ```
/// use userbridge::{Clock, FixedClock};
///
/// let clock = FixedClock::new(1_704_067_200_000);
/// assert_eq!(clock.now_registered(), "2024-01-01 00:00:00");
/// clock.advance(90_000);
/// assert_eq!(clock.now_registered(), "2024-01-01 00:01:30");
/// ```
#[cfg(any(test, feature = "testing"))]
pub struct FixedClock {
    millis: Mutex<u64>,
}

#[cfg(any(test, feature = "testing"))]
impl FixedClock {
    /// Create a new fixed clock at the given time in milliseconds.
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Mutex::new(millis),
        }
    }

    /// Advance the clock by the given number of milliseconds.
    pub fn advance(&self, ms: u64) {
        *self.millis.lock().unwrap_or_else(PoisonError::into_inner) += ms;
    }

    /// Set the clock to a specific time in milliseconds.
    pub fn set(&self, ms: u64) {
        *self.millis.lock().unwrap_or_else(PoisonError::into_inner) = ms;
    }
}

#[cfg(any(test, feature = "testing"))]
impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        *self.millis.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for FixedClock {
    fn default() -> Self {
        // 2024-01-01 00:00:00 UTC
        Self::new(1_704_067_200_000)
    }
}

#[cfg(any(test, feature = "testing"))]
impl Debug for FixedClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedClock")
            .field("millis", &self.now_millis())
            .finish()
    }
}
