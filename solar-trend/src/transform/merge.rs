use std::collections::BTreeMap;

use solar_domain::domain::{PowerRecord, YearMonth};
use time::Date;

use super::aggregate::Mean;

/// Inclusive date range a month must start in to take part in the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Date,
    pub end: Date,
}

impl DateWindow {
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year_month: YearMonth) -> bool {
        year_month
            .first_day()
            .is_some_and(|d| d >= self.start && d <= self.end)
    }
}

/// A month where all three series have a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedRow {
    pub year_month: YearMonth,
    pub power_kwh: i64,
    pub irradiance: f64,
    pub temp_c: f64,
}

/// Restricts a monthly series to `window` and averages the values of each
/// month.
///
/// Per-location input collapses to a nationwide mean; input that already has
/// one value per month passes through unchanged. NaN values are skipped.
pub fn window_mean<I>(points: I, window: &DateWindow) -> BTreeMap<YearMonth, f64>
where
    I: IntoIterator<Item = (YearMonth, f64)>,
{
    let mut means: BTreeMap<YearMonth, Mean> = BTreeMap::new();

    for (year_month, value) in points {
        if !window.contains(year_month) {
            continue;
        }
        means.entry(year_month).or_default().add(value);
    }

    means
        .into_iter()
        .map(|(year_month, mean)| (year_month, mean.value()))
        .collect()
}

/// Inner-joins power with irradiance, then the result with temperature.
///
/// Months missing from any series are left out. Row order follows `power`.
pub fn merge_series(
    power: &[PowerRecord],
    irradiance: &BTreeMap<YearMonth, f64>,
    temperature: &BTreeMap<YearMonth, f64>,
    window: &DateWindow,
) -> Vec<MergedRow> {
    let with_irradiance: Vec<(YearMonth, i64, f64)> = power
        .iter()
        .filter(|p| window.contains(p.year_month))
        .filter_map(|p| {
            irradiance
                .get(&p.year_month)
                .map(|irr| (p.year_month, p.power_kwh, *irr))
        })
        .collect();

    with_irradiance
        .into_iter()
        .filter_map(|(year_month, power_kwh, irradiance)| {
            temperature.get(&year_month).map(|temp_c| MergedRow {
                year_month,
                power_kwh,
                irradiance,
                temp_c: *temp_c,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn default_window() -> DateWindow {
        DateWindow::new(date!(2018 - 01 - 01), date!(2024 - 12 - 31))
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let w = default_window();
        assert!(w.contains(ym(2018, 1)));
        assert!(w.contains(ym(2024, 12)));
        assert!(!w.contains(ym(2017, 12)));
        assert!(!w.contains(ym(2025, 1)));
    }

    #[test]
    fn window_start_mid_month_excludes_that_month() {
        let w = DateWindow::new(date!(2020 - 01 - 15), date!(2020 - 12 - 31));
        assert!(!w.contains(ym(2020, 1)));
        assert!(w.contains(ym(2020, 2)));
    }

    #[test]
    fn window_mean_averages_locations_and_drops_out_of_window() {
        let points = vec![
            (ym(2019, 5), 4.0),
            (ym(2019, 5), 6.0),
            (ym(2017, 5), 100.0),
            (ym(2019, 6), 3.0),
        ];
        let means = window_mean(points, &default_window());

        assert_eq!(means.len(), 2);
        assert_eq!(means[&ym(2019, 5)], 5.0);
        assert_eq!(means[&ym(2019, 6)], 3.0);
    }

    #[test]
    fn window_mean_skips_nan_locations() {
        let points = vec![
            (ym(2019, 5), f64::NAN),
            (ym(2019, 5), 6.0),
            (ym(2019, 6), f64::NAN),
        ];
        let means = window_mean(points, &default_window());

        assert_eq!(means[&ym(2019, 5)], 6.0);
        assert!(means[&ym(2019, 6)].is_nan());
    }

    #[test]
    fn merge_keeps_only_months_present_everywhere() {
        let power = vec![
            PowerRecord { year_month: ym(2020, 1), power_kwh: 100 },
            PowerRecord { year_month: ym(2020, 2), power_kwh: 200 },
            PowerRecord { year_month: ym(2020, 3), power_kwh: 300 },
            PowerRecord { year_month: ym(2020, 4), power_kwh: 400 },
        ];
        let irradiance = BTreeMap::from([(ym(2020, 1), 1.0), (ym(2020, 2), 2.0), (ym(2020, 4), 4.0)]);
        let temperature = BTreeMap::from([(ym(2020, 1), 10.0), (ym(2020, 3), 30.0), (ym(2020, 4), 40.0)]);

        let merged = merge_series(&power, &irradiance, &temperature, &default_window());
        let months: Vec<YearMonth> = merged.iter().map(|r| r.year_month).collect();

        assert_eq!(months, vec![ym(2020, 1), ym(2020, 4)]);
        assert_eq!(
            merged[1],
            MergedRow { year_month: ym(2020, 4), power_kwh: 400, irradiance: 4.0, temp_c: 40.0 }
        );
    }

    #[test]
    fn merge_drops_power_outside_window() {
        let power = vec![PowerRecord { year_month: ym(2025, 1), power_kwh: 1 }];
        let irradiance = BTreeMap::from([(ym(2025, 1), 1.0)]);
        let temperature = BTreeMap::from([(ym(2025, 1), 1.0)]);

        assert!(merge_series(&power, &irradiance, &temperature, &default_window()).is_empty());
    }
}
