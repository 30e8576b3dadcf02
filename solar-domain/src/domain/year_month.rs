use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Month};

/// Calendar month key used to align every series.
///
/// Ordering is chronological. Printed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum YearMonthParseError {
    #[error("month {0} is outside 1..=12")]
    MonthOutOfRange(u32),
    #[error("year {0} is outside 0..=9999")]
    YearOutOfRange(i32),
    #[error("malformed year-month '{0}'")]
    Malformed(String),
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, YearMonthParseError> {
        if !(1..=12).contains(&month) {
            return Err(YearMonthParseError::MonthOutOfRange(month));
        }
        if !(0..=9999).contains(&year) {
            return Err(YearMonthParseError::YearOutOfRange(year));
        }
        Ok(Self {
            year,
            month: month as u8,
        })
    }

    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month() as u8,
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u8 {
        self.month
    }

    /// First calendar day of the month.
    pub fn first_day(self) -> Option<Date> {
        let month = Month::try_from(self.month).ok()?;
        Date::from_calendar_date(self.year, month, 1).ok()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Accepts `YYYY-MM`, and also `YYYY-MM-DD` (optionally followed by a time)
/// as written by tools that store the key as a full timestamp. The day is
/// ignored.
impl FromStr for YearMonth {
    type Err = YearMonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || YearMonthParseError::Malformed(s.to_string());

        let date_part = s.trim().split([' ', 'T']).next().unwrap_or("");
        let mut parts = date_part.split('-');

        let year: i32 = parts
            .next()
            .filter(|p| p.len() == 4)
            .and_then(|p| p.parse().ok())
            .ok_or_else(malformed)?;
        let month: u32 = parts
            .next()
            .filter(|p| (1..=2).contains(&p.len()))
            .and_then(|p| p.parse().ok())
            .ok_or_else(malformed)?;

        if let Some(day) = parts.next() {
            if day.parse::<u32>().is_err() {
                return Err(malformed());
            }
        }
        if parts.next().is_some() {
            return Err(malformed());
        }

        YearMonth::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
