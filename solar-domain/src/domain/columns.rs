use super::{
    ComparisonRecord, DailyRecord, MonthlyLocationRecord, NationwideRecord, PowerRecord, RawPowerRecord,
};

/// Column names of an exported table, in field order.
///
/// Lets an empty table still be written with its header row.
pub trait TableColumns {
    const COLUMNS: &'static [&'static str];
}

impl TableColumns for DailyRecord {
    const COLUMNS: &'static [&'static str] = &["date", "irradiance", "temp_c", "location"];
}

impl TableColumns for MonthlyLocationRecord {
    const COLUMNS: &'static [&'static str] = &["year_month", "location", "irradiance", "temp_c", "year", "month"];
}

impl TableColumns for NationwideRecord {
    const COLUMNS: &'static [&'static str] = &["year_month", "irradiance", "temp_c"];
}

impl TableColumns for RawPowerRecord {
    const COLUMNS: &'static [&'static str] = &["year", "month", "power_kwh"];
}

impl TableColumns for PowerRecord {
    const COLUMNS: &'static [&'static str] = &["year_month", "power_kwh"];
}

impl TableColumns for ComparisonRecord {
    const COLUMNS: &'static [&'static str] = &[
        "year_month",
        "power_kwh",
        "irradiance",
        "temp_c",
        "power_kwh_norm",
        "irradiance_norm",
        "temp_c_norm",
    ];
}
