//! Date-selection engine for travel search forms.
//!
//! [`DatePicker`] holds the state of one open calendar widget (single date or
//! date range, month navigation, bounds, price overlay) and emits
//! [`PickerEvent`]s. [`DatePair`] keeps two linked form fields such as
//! departure/return consistent as either one is edited.

mod config;
mod coordinator;
mod consts;
mod host;
mod month;
mod picker;
mod prelude;
mod range;
#[cfg(test)]
mod test_utils;
mod types;

pub use config::{ConfigError, PickerConfig, PriceOverlay, SelectionMode};
pub use consts::*;
pub use coordinator::{DatePair, PairEdit, PairField, SearchKind, TripType};
pub use host::{OutsideClickHub, OutsideClickSubscription, PickerHost, PickerId};
pub use month::{CalendarMonth, MonthGrid, Week};
pub use picker::{ActiveEndpoint, DatePicker, DayCell, PickerEvent, RangeSelection};
pub use range::{DateRange, RangeError};
pub use types::{Day, Month, Weekday, Year};

use crate::prelude::*;
use chrono::Datelike;
use std::str::FromStr;
use types::{days_in_month, days_since_epoch};

/// A validated Gregorian calendar date.
///
/// Ordering is chronological. The textual form is ISO 8601 `YYYY-MM-DD`,
/// which is also how the date serializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct CalendarDate {
    year:  Year,
    month: Month,
    day:   Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CalendarDate {
    /// Creates a date from raw components, validating each one.
    ///
    /// # Errors
    /// Returns `ParseError` if the year, month, or day is out of range.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        let day = Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    /// Creates a date from already validated year and month.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the day does not exist in that month.
    pub fn from_parts(year: Year, month: Month, day: u8) -> Result<Self, ParseError> {
        let day = Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    pub(crate) const fn from_trusted(year: Year, month: Month, day: Day) -> Self {
        Self { year, month, day }
    }

    /// Today's date on the local clock.
    ///
    /// # Errors
    /// Returns `ParseError` if the clock reports a year outside `1..=MAX_YEAR`.
    pub fn today() -> Result<Self, ParseError> {
        let now = chrono::Local::now().date_naive();
        let year = u16::try_from(now.year()).map_err(|_| ParseError::InvalidFormat(now.to_string()))?;
        // chrono guarantees month in 1..=12 and day in 1..=31
        let month = u8::try_from(now.month()).map_err(|_| ParseError::InvalidFormat(now.to_string()))?;
        let day = u8::try_from(now.day()).map_err(|_| ParseError::InvalidFormat(now.to_string()))?;
        Self::new(year, month, day)
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// The month this date falls in.
    pub const fn calendar_month(&self) -> CalendarMonth {
        CalendarMonth::new(self.year, self.month)
    }

    pub const fn weekday(&self) -> Weekday {
        Weekday::from_days_since_epoch(self.days_since_epoch())
    }

    /// The following day, or `None` past 9999-12-31.
    pub fn succ(&self) -> Option<Self> {
        if self.day() < days_in_month(self.year(), self.month()) {
            return Self::from_parts(self.year, self.month, self.day() + 1).ok();
        }
        // roll to first of next month (respects MAX_YEAR limit)
        self.calendar_month().succ().map(|m| m.first_day())
    }

    /// The preceding day, or `None` before 0001-01-01.
    pub fn pred(&self) -> Option<Self> {
        if self.day() > MIN_DAY {
            return Self::from_parts(self.year, self.month, self.day() - 1).ok();
        }
        self.calendar_month().pred().map(|m| m.last_day())
    }

    /// Signed number of days from `self` to `other`.
    pub const fn days_until(&self, other: &Self) -> i64 {
        other.days_since_epoch() - self.days_since_epoch()
    }

    const fn days_since_epoch(&self) -> i64 {
        days_since_epoch(self.year(), self.month(), self.day())
    }

    fn parse_u16(s: &str) -> Result<u16, ParseError> {
        s.parse::<u16>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }

    fn parse_u8(s: &str) -> Result<u8, ParseError> {
        s.parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        // ISO format only: YYYY-MM-DD
        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        match parts.as_slice() {
            [year, month, day] => Self::new(
                Self::parse_u16(year)?,
                Self::parse_u8(month)?,
                Self::parse_u8(day)?,
            ),
            _ => Err(ParseError::InvalidFormat(format!(
                "Expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {} component(s): {s}",
                parts.len()
            ))),
        }
    }
}

impl TryFrom<(u16, u8, u8)> for CalendarDate {
    type Error = ParseError;

    fn try_from(value: (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1, value.2)
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
