use std::collections::BTreeMap;

use solar_domain::domain::{DailyRecord, MonthlyLocationRecord, NationwideRecord, YearMonth};

/// Running mean that ignores NaN readings. A group with no real values
/// averages to NaN.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    pub(crate) fn add(&mut self, value: f64) {
        if !value.is_nan() {
            self.sum += value;
            self.count += 1;
        }
    }

    pub(crate) fn value(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        self.sum / self.count as f64
    }
}

#[derive(Default)]
struct PairMean {
    irradiance: Mean,
    temp_c: Mean,
}

impl PairMean {
    fn add(&mut self, irradiance: f64, temp_c: f64) {
        self.irradiance.add(irradiance);
        self.temp_c.add(temp_c);
    }

    fn values(&self) -> (f64, f64) {
        (self.irradiance.value(), self.temp_c.value())
    }
}

/// Monthly mean irradiance and temperature per location.
///
/// Missing (NaN) readings are left out of each column's mean on their own.
/// Output is ordered by month, then location name.
pub fn monthly_means(daily: &[DailyRecord]) -> Vec<MonthlyLocationRecord> {
    let mut groups: BTreeMap<(YearMonth, &str), PairMean> = BTreeMap::new();

    for d in daily {
        groups
            .entry((d.year_month(), d.location.as_str()))
            .or_default()
            .add(d.irradiance, d.temp_c);
    }

    groups
        .into_iter()
        .map(|((year_month, location), mean)| {
            let (irradiance, temp_c) = mean.values();
            MonthlyLocationRecord::new(year_month, location, irradiance, temp_c)
        })
        .collect()
}

/// Nationwide series: for each month, the unweighted mean of the
/// per-location monthly means.
///
/// Every location counts once per month regardless of how many days it
/// reported, so this differs from a flat mean over the daily records.
pub fn nationwide_means(monthly: &[MonthlyLocationRecord]) -> Vec<NationwideRecord> {
    let mut groups: BTreeMap<YearMonth, PairMean> = BTreeMap::new();

    for m in monthly {
        groups.entry(m.year_month).or_default().add(m.irradiance, m.temp_c);
    }

    groups
        .into_iter()
        .map(|(year_month, mean)| {
            let (irradiance, temp_c) = mean.values();
            NationwideRecord {
                year_month,
                irradiance,
                temp_c,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::date, Date};

    fn day(date: Date, location: &str, irradiance: f64, temp_c: f64) -> DailyRecord {
        DailyRecord {
            date,
            irradiance,
            temp_c,
            location: location.to_string(),
        }
    }

    #[test]
    fn groups_by_month_and_location() {
        let daily = vec![
            day(date!(2020 - 01 - 01), "Tainan", 4.0, 20.0),
            day(date!(2020 - 01 - 02), "Tainan", 6.0, 22.0),
            day(date!(2020 - 02 - 01), "Tainan", 5.0, 21.0),
            day(date!(2020 - 01 - 01), "Hualien", 3.0, 18.0),
        ];

        let monthly = monthly_means(&daily);
        let jan = YearMonth::new(2020, 1).unwrap();

        assert_eq!(monthly.len(), 3);
        assert_eq!(monthly[0], MonthlyLocationRecord::new(jan, "Hualien", 3.0, 18.0));
        assert_eq!(monthly[1], MonthlyLocationRecord::new(jan, "Tainan", 5.0, 21.0));
        assert_eq!(monthly[1].year, 2020);
        assert_eq!(monthly[1].month, 1);
        assert_eq!(monthly[2].year_month, YearMonth::new(2020, 2).unwrap());
    }

    #[test]
    fn nationwide_is_mean_of_monthly_means_not_flat_mean() {
        // Taipei reports three days, Kaohsiung only one.
        let daily = vec![
            day(date!(2021 - 06 - 01), "Taipei", 2.0, 10.0),
            day(date!(2021 - 06 - 02), "Taipei", 2.0, 10.0),
            day(date!(2021 - 06 - 03), "Taipei", 2.0, 10.0),
            day(date!(2021 - 06 - 01), "Kaohsiung", 6.0, 30.0),
        ];

        let nationwide = nationwide_means(&monthly_means(&daily));
        assert_eq!(nationwide.len(), 1);

        let flat_irradiance = daily.iter().map(|d| d.irradiance).sum::<f64>() / daily.len() as f64;
        assert_eq!(flat_irradiance, 3.0);

        assert_eq!(nationwide[0].irradiance, 4.0);
        assert_eq!(nationwide[0].temp_c, 20.0);
        assert_ne!(nationwide[0].irradiance, flat_irradiance);
    }

    #[test]
    fn missing_readings_are_skipped_per_column() {
        let daily = vec![
            day(date!(2020 - 01 - 01), "Tainan", 4.0, 20.0),
            day(date!(2020 - 01 - 02), "Tainan", f64::NAN, 24.0),
            day(date!(2020 - 01 - 03), "Tainan", 6.0, f64::NAN),
            day(date!(2020 - 01 - 01), "Hualien", 3.0, 18.0),
        ];

        let monthly = monthly_means(&daily);
        let tainan = monthly.iter().find(|m| m.location == "Tainan").unwrap();
        assert_eq!(tainan.irradiance, 5.0);
        assert_eq!(tainan.temp_c, 22.0);

        let nationwide = nationwide_means(&monthly);
        assert_eq!(nationwide[0].irradiance, 4.0);
        assert_eq!(nationwide[0].temp_c, 20.0);
    }

    #[test]
    fn month_without_any_reading_is_nan() {
        let daily = vec![
            day(date!(2020 - 02 - 01), "Taipei", f64::NAN, 15.0),
            day(date!(2020 - 02 - 02), "Taipei", f64::NAN, 17.0),
        ];

        let monthly = monthly_means(&daily);
        assert_eq!(monthly.len(), 1);
        assert!(monthly[0].irradiance.is_nan());
        assert_eq!(monthly[0].temp_c, 16.0);

        // A NaN location mean does not drag the nationwide value with it.
        let mut with_other = monthly.clone();
        with_other.push(MonthlyLocationRecord::new(YearMonth::new(2020, 2).unwrap(), "Tainan", 5.0, 21.0));
        let nationwide = nationwide_means(&with_other);
        assert_eq!(nationwide[0].irradiance, 5.0);
        assert_eq!(nationwide[0].temp_c, 18.5);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        assert!(monthly_means(&[]).is_empty());
        assert!(nationwide_means(&[]).is_empty());
    }
}
