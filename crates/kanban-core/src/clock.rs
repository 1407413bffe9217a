//! Game clock: the day counter and the simulated calendar.
//!
//! Day 1 is the configured start date. The simulated date is always derived
//! from the day counter (`start_date + (day - 1)`) and never stored on its
//! own, so the two cannot drift apart.

use chrono::{Days, NaiveDate};

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Day counter would overflow.
    #[error("day counter overflow: cannot advance beyond u64::MAX")]
    DayOverflow,

    /// The simulated date left the supported calendar range.
    #[error("simulated date for day {day} is out of range")]
    DateOutOfRange {
        /// The day whose date could not be computed.
        day: u64,
    },
}

/// Day counter anchored to a calendar start date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    /// Current day, starting at 1.
    day: u64,
    /// Calendar date of day 1.
    start_date: NaiveDate,
}

impl GameClock {
    /// Create a clock on day 1 at `start_date`.
    pub const fn new(start_date: NaiveDate) -> Self {
        Self { day: 1, start_date }
    }

    /// Advance by one day. Returns the new day number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::DayOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.day = self.day.checked_add(1).ok_or(ClockError::DayOverflow)?;
        Ok(self.day)
    }

    /// Current day number.
    pub const fn day(&self) -> u64 {
        self.day
    }

    /// Calendar date of day 1.
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Simulated calendar date of the current day.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::DateOutOfRange`] past the end of the calendar.
    pub fn current_date(&self) -> Result<NaiveDate, ClockError> {
        let offset = self.day.saturating_sub(1);
        self.start_date
            .checked_add_days(Days::new(offset))
            .ok_or(ClockError::DateOutOfRange { day: self.day })
    }

    /// Return to day 1, keeping the start date.
    pub const fn reset(&mut self) {
        self.day = 1;
    }
}
