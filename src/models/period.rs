//! Budget cadence and inclusive date windows
//!
//! A budget pairs a repetition cadence with an explicit start/end window.
//! Ledger filters use the same inclusive window type.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text layout for calendar dates in the store and on the command line
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How often a budget repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Custom,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
        }
    }

    pub fn all() -> &'static [BudgetPeriod] {
        &[Self::Daily, Self::Weekly, Self::Monthly, Self::Custom]
    }

    /// The calendar window of this cadence that contains `date`
    ///
    /// Weeks run Monday to Sunday. `Custom` has no implied window.
    pub fn window_containing(&self, date: NaiveDate) -> Option<DateWindow> {
        let (start, end) = match self {
            Self::Daily => (date, date),
            Self::Weekly => {
                let start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
                (start, start + Duration::days(6))
            }
            Self::Monthly => {
                let start = date.with_day(1)?;
                let next_month = if date.month() == 12 {
                    NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
                }?;
                (start, next_month - Duration::days(1))
            }
            Self::Custom => return None,
        };
        Some(DateWindow { start, end })
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "custom" => Ok(Self::Custom),
            other => Err(PeriodParseError::UnknownPeriod(other.to_string())),
        }
    }
}

/// An inclusive calendar-date window `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Create a window, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodParseError> {
        if start > end {
            return Err(PeriodParseError::InvertedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, PeriodParseError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// A timestamp is inside the window when its calendar date is
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.contains_date(at.date())
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(s: &str) -> Result<NaiveDate, PeriodParseError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| PeriodParseError::InvalidDate(s.to_string()))
}

/// Error type for period and window parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    UnknownPeriod(String),
    InvalidDate(String),
    InvertedWindow { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPeriod(s) => {
                write!(f, "Unknown budget period '{}' (daily, weekly, monthly, custom)", s)
            }
            Self::InvalidDate(s) => write!(f, "Invalid date '{}', expected YYYY-MM-DD", s),
            Self::InvertedWindow { start, end } => {
                write!(f, "Start date {} is after end date {}", start, end)
            }
        }
    }
}

impl std::error::Error for PeriodParseError {}
