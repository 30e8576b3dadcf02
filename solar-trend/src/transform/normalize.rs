use solar_domain::domain::ComparisonRecord;

use super::MergedRow;

/// Min-max scales a column to [0, 1].
///
/// A constant column divides by zero and yields NaN for every entry.
pub fn min_max(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values.iter().map(|v| (v - min) / range).collect()
}

/// Adds the three normalized columns to the merged table.
pub fn normalize(merged: &[MergedRow]) -> Vec<ComparisonRecord> {
    let power: Vec<f64> = merged.iter().map(|r| r.power_kwh as f64).collect();
    let irradiance: Vec<f64> = merged.iter().map(|r| r.irradiance).collect();
    let temp_c: Vec<f64> = merged.iter().map(|r| r.temp_c).collect();

    let power_norm = min_max(&power);
    let irradiance_norm = min_max(&irradiance);
    let temp_c_norm = min_max(&temp_c);

    merged
        .iter()
        .enumerate()
        .map(|(i, r)| ComparisonRecord {
            year_month: r.year_month,
            power_kwh: r.power_kwh,
            irradiance: r.irradiance,
            temp_c: r.temp_c,
            power_kwh_norm: power_norm[i],
            irradiance_norm: irradiance_norm[i],
            temp_c_norm: temp_c_norm[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_domain::domain::YearMonth;

    #[test]
    fn min_maps_to_zero_and_max_to_one() {
        let scaled = min_max(&[3.0, 9.0, 5.0, 1.0]);
        assert_eq!(scaled, vec![0.25, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn scaling_preserves_order() {
        let raw = [12.5, -3.0, 7.25, 40.0, 0.0];
        let scaled = min_max(&raw);
        for i in 0..raw.len() {
            for j in 0..raw.len() {
                if raw[i] < raw[j] {
                    assert!(scaled[i] < scaled[j]);
                }
            }
        }
    }

    #[test]
    fn constant_column_is_nan() {
        assert!(min_max(&[2.0, 2.0]).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn empty_column_stays_empty() {
        assert!(min_max(&[]).is_empty());
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn normalize_fills_all_three_columns() {
        let merged: Vec<MergedRow> = (1..=3)
            .map(|m| MergedRow {
                year_month: YearMonth::new(2020, m).unwrap(),
                power_kwh: 100 * m as i64,
                irradiance: m as f64,
                temp_c: 10.0 * m as f64,
            })
            .collect();

        let table = normalize(&merged);
        let power: Vec<f64> = table.iter().map(|r| r.power_kwh_norm).collect();
        let irradiance: Vec<f64> = table.iter().map(|r| r.irradiance_norm).collect();
        let temp: Vec<f64> = table.iter().map(|r| r.temp_c_norm).collect();

        assert_eq!(power, vec![0.0, 0.5, 1.0]);
        assert_eq!(irradiance, vec![0.0, 0.5, 1.0]);
        assert_eq!(temp, vec![0.0, 0.5, 1.0]);
        assert_eq!(table[2].power_kwh, 300);
    }
}
