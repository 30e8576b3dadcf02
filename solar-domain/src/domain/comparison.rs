use serde::{Deserialize, Serialize};

use super::YearMonth;

/// One month where generation, irradiance and temperature are all known,
/// with each metric also rescaled to [0, 1] over the whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub year_month: YearMonth,
    pub power_kwh: i64,
    pub irradiance: f64,
    pub temp_c: f64,
    pub power_kwh_norm: f64,
    pub irradiance_norm: f64,
    pub temp_c_norm: f64,
}
