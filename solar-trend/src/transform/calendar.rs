use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use solar_domain::domain::{PowerRecord, RawPowerRecord, YearMonth};

/// Offset between ROC (Minguo) years and Gregorian years.
pub const ROC_YEAR_OFFSET: i32 = 1911;

static ROC_MONTH_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{3,4})(\d{2})").expect("valid ROC month code pattern"));

pub fn roc_to_gregorian_year(roc_year: i32) -> i32 {
    roc_year + ROC_YEAR_OFFSET
}

/// Parses a `{roc year}{2-digit month}` code such as `11301` into 2024-01.
///
/// Only the start of the code is matched; trailing characters are ignored.
/// Returns `None` when the pattern does not match or the month is invalid.
pub fn parse_roc_month_code(code: &str) -> Option<YearMonth> {
    let caps = ROC_MONTH_CODE.captures(code.trim())?;
    let roc_year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    YearMonth::new(roc_to_gregorian_year(roc_year), month).ok()
}

/// Converts scraped records to Gregorian months.
///
/// Unparseable codes are dropped. When a month appears more than once the
/// first record in input order is kept. Output is sorted by month.
pub fn normalize_power_records(raw: &[RawPowerRecord]) -> Vec<PowerRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(raw.len());

    for r in raw {
        let Some(year_month) = parse_roc_month_code(&r.month) else {
            tracing::debug!(code = %r.month, year = %r.year, "dropping unparseable month code");
            metrics::counter!("power_codes_dropped_total").increment(1);
            continue;
        };

        if seen.insert(year_month) {
            records.push(PowerRecord {
                year_month,
                power_kwh: r.power_kwh,
            });
        } else {
            tracing::debug!(%year_month, power_kwh = r.power_kwh, "ignoring duplicate month");
        }
    }

    // Stable sort; keys are unique at this point anyway.
    records.sort_by_key(|r| r.year_month);
    records
}
