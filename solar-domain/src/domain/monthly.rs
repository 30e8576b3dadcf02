use serde::{Deserialize, Serialize};

use super::YearMonth;

/// Monthly mean of the daily readings of a single location.
///
/// `year` and `month` duplicate `year_month` so the exported table can be
/// filtered without parsing the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyLocationRecord {
    pub year_month: YearMonth,
    pub location: String,
    pub irradiance: f64,
    pub temp_c: f64,
    pub year: i32,
    pub month: u8,
}

impl MonthlyLocationRecord {
    pub fn new(year_month: YearMonth, location: impl Into<String>, irradiance: f64, temp_c: f64) -> Self {
        Self {
            year_month,
            location: location.into(),
            irradiance,
            temp_c,
            year: year_month.year(),
            month: year_month.month(),
        }
    }
}

/// Unweighted mean of the per-location monthly means for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationwideRecord {
    pub year_month: YearMonth,
    pub irradiance: f64,
    pub temp_c: f64,
}
