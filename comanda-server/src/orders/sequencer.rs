//! Per-day order numbering
//!
//! Order numbers restart at 1 every business day. A business day is the
//! calendar day after shifting the clock back by a fixed offset, so a
//! shop closing at 02:00 keeps late-night orders on the previous day's
//! count.

use crate::db::{Store, StoreError};
use chrono::{Duration, Local, NaiveDateTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SequencerError {
    #[error("Order store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

/// Issues order numbers, one counter per business day
#[derive(Clone)]
pub struct OrderSequencer {
    store: Store,
    day_offset: Duration,
}

impl OrderSequencer {
    pub fn new(store: Store, offset_hours: i64) -> Self {
        Self {
            store,
            day_offset: Duration::hours(offset_hours),
        }
    }

    /// Business-day key for a wall-clock instant
    ///
    /// Format is `day-month-year` without zero padding, e.g. `3-9-2026`.
    pub fn day_key_at(&self, local: NaiveDateTime) -> String {
        let shifted = local - self.day_offset;
        shifted.format("%-d-%-m-%Y").to_string()
    }

    /// Business-day key for right now
    pub fn current_day_key(&self) -> String {
        self.day_key_at(Local::now().naive_local())
    }

    /// Issue the next order number for the current business day
    ///
    /// The underlying store serializes the increment, so concurrent
    /// callers always receive distinct numbers.
    pub fn next_number(&self) -> Result<(String, u32), SequencerError> {
        let day_key = self.current_day_key();
        let sequence = self.store.next_sequence(&day_key)?;
        Ok((day_key, sequence))
    }
}
