//! Wall-clock values stored as minutes since midnight.
//!
//! Schedule text uses 24-hour `HH:MM` tokens, raw per-day hours use `HHMM`
//! integers (`1930` for half past seven in the evening), and everything is
//! rendered as `h:mm am/pm`.

use std::fmt;
use std::str::FromStr;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleError;

/// Number of minutes in a day; `24:00` is the latest representable time.
pub const MINUTES_PER_DAY: u32 = 1440;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Time of day in minutes since midnight, `0..=1440`.
pub struct ClockTime(u32);

impl ClockTime {
    /// Midnight at the start of the day.
    pub const MIDNIGHT: Self = Self(0);

    /// Build from minutes since midnight, rejecting values past `24:00`.
    #[must_use]
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Build from an hour and minute pair. `24:00` is accepted, `24:01` is not.
    #[must_use]
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour.checked_mul(60)?.checked_add(minute)?)
    }

    /// Decode an `HHMM` integer such as `830` or `1730`.
    #[must_use]
    pub fn from_hhmm(value: u32) -> Option<Self> {
        Self::from_hm(value / 100, value % 100)
    }

    /// Clock time of an instant, truncated to the minute.
    #[must_use]
    pub fn of<T: Timelike>(instant: &T) -> Self {
        Self(instant.hour() * 60 + instant.minute())
    }

    /// Minutes since midnight.
    #[must_use]
    pub fn minutes(self) -> u32 {
        self.0
    }

    /// Parse the `h:mm am/pm` display form back into a clock time.
    ///
    /// `12:00 am` is midnight and `12:00 pm` is noon.
    #[must_use]
    pub fn parse_meridiem(text: &str) -> Option<Self> {
        let (clock, meridiem) = text.trim().split_once(' ')?;
        let (hour, minute) = split_hm(clock)?;
        if !(1..=12).contains(&hour) {
            return None;
        }
        let hour = match meridiem.trim().to_ascii_lowercase().as_str() {
            "am" => hour % 12,
            "pm" => hour % 12 + 12,
            _ => return None,
        };
        Self::from_hm(hour, minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hour = (self.0 / 60) % 24;
        let minute = self.0 % 60;
        let meridiem = if hour < 12 { "am" } else { "pm" };
        let display_hour = match hour % 12 {
            0 => 12,
            other => other,
        };
        write!(formatter, "{display_hour}:{minute:02} {meridiem}")
    }
}

impl FromStr for ClockTime {
    type Err = ScheduleError;

    /// Parse a 24-hour `HH:MM` token.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTime(token.to_owned());
        let (hour, minute) = split_hm(token.trim()).ok_or_else(invalid)?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

fn split_hm(clock: &str) -> Option<(u32, u32)> {
    let (hour, minute) = clock.split_once(':')?;
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit());
    if !all_digits(hour) || hour.len() > 2 || !all_digits(minute) || minute.len() != 2 {
        return None;
    }
    Some((hour.parse().ok()?, minute.parse().ok()?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Opening interval for a single day.
pub struct TimeRange {
    /// Opening time.
    pub open: ClockTime,
    /// Closing time.
    pub close: ClockTime,
}

impl TimeRange {
    /// Open at `open`, closed from `close` on.
    #[must_use]
    pub fn contains(&self, time: ClockTime) -> bool {
        self.open <= time && time < self.close
    }

    /// Open only strictly between the two boundaries.
    #[must_use]
    pub fn contains_exclusive(&self, time: ClockTime) -> bool {
        self.open < time && time < self.close
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} - {}", self.open, self.close)
    }
}
