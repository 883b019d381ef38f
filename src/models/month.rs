//! Calendar month a budget covers
//!
//! Budgets are strictly monthly, so the period type is a plain year/month
//! pair with navigation and date-range helpers.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month (e.g., "2025-10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawBudgetMonth")]
pub struct BudgetMonth {
    pub year: i32,
    pub month: u32,
}

/// Unchecked wire form; stored files go through `BudgetMonth::new`
#[derive(Deserialize)]
struct RawBudgetMonth {
    year: i32,
    month: u32,
}

impl TryFrom<RawBudgetMonth> for BudgetMonth {
    type Error = MonthParseError;

    fn try_from(raw: RawBudgetMonth) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.month)
    }
}

impl BudgetMonth {
    /// Create a month, validating the month number
    pub fn new(year: i32, month: u32) -> Result<Self, MonthParseError> {
        if !(1..=12).contains(&month) {
            return Err(MonthParseError::InvalidMonth(month));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(MonthParseError::InvalidFormat(format!("{}-{}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current local month
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// First day of the month
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        self.next().start_date() - Duration::days(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Whether this is the current local month
    pub fn is_current(&self) -> bool {
        *self == Self::current()
    }

    /// Long form, e.g. "October 2025"
    pub fn friendly(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }

    /// Parse a month
    ///
    /// Formats:
    /// - "2025-10"
    /// - "10/2025"
    /// - "current" / "this", "last" / "prev", "next"
    pub fn parse(s: &str) -> Result<Self, MonthParseError> {
        let s = s.trim();

        match s.to_lowercase().as_str() {
            "current" | "this" | "now" => return Ok(Self::current()),
            "last" | "prev" | "previous" => return Ok(Self::current().prev()),
            "next" => return Ok(Self::current().next()),
            _ => {}
        }

        let (year_str, month_str) = if let Some((y, m)) = s.split_once('-') {
            (y, m)
        } else if let Some((m, y)) = s.split_once('/') {
            (y, m)
        } else {
            return Err(MonthParseError::InvalidFormat(s.to_string()));
        };

        let year: i32 = year_str
            .trim()
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month_str
            .trim()
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;

        Self::new(year, month)
    }
}

impl Default for BudgetMonth {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for BudgetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Error type for month parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for MonthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid month format: {} (expected YYYY-MM)", s),
            Self::InvalidMonth(m) => write!(f, "Invalid month: {} (must be 1-12)", m),
        }
    }
}

impl std::error::Error for MonthParseError {}
