// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local time source.
//!
//! All timestamps in the crate are epoch milliseconds on a *naive local*
//! timeline: a wall-clock reading taken without any zone information and
//! interpreted as if it were UTC. Server timestamps scraped from chat carry no
//! zone either, so both sides end up on the same timeline.

use chrono::{DateTime, Local, NaiveDateTime};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Supplies "now" on the naive local timeline.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock backed by `chrono::Local`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        to_millis(&Local::now().naive_local())
    }
}

/// Manually advanced clock for deterministic tests and transcript replay.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(now_millis: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(now_millis)),
        }
    }

    /// Start at the given naive local date-time.
    pub fn at(when: NaiveDateTime) -> Self {
        Self::new(to_millis(&when))
    }

    pub fn set(&self, now_millis: i64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Convert a naive local date-time to epoch millis on the naive timeline.
#[inline]
pub fn to_millis(when: &NaiveDateTime) -> i64 {
    when.and_utc().timestamp_millis()
}

/// Convert epoch millis on the naive timeline back to a date-time.
///
/// Out-of-range values clamp to the Unix epoch.
pub fn from_millis(millis: i64) -> NaiveDateTime {
    DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .naive_utc()
}
