use serde::{Deserialize, Serialize};
use time::Date;

use super::YearMonth;

/// One day of readings for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: Date,
    pub irradiance: f64,
    pub temp_c: f64,
    pub location: String,
}

impl DailyRecord {
    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }
}
