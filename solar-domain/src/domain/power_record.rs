use serde::{Deserialize, Serialize};

use super::YearMonth;

/// A generation figure exactly as read off a chart label.
///
/// `year` is the selector text (e.g. `113年`) and `month` the five digit
/// ROC code (e.g. `11301`); neither has been converted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPowerRecord {
    pub year: String,
    pub month: String,
    pub power_kwh: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerRecord {
    pub year_month: YearMonth,
    pub power_kwh: i64,
}
