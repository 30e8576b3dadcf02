use std::{
    fs::{self, File},
    io::Write,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use futures::StreamExt;
use serde::Serialize;
use solar_domain::domain::TableColumns;

use crate::pipeline::{PipelineError, Sink};

/// UTF-8 byte order mark. Spreadsheet tools need it to read the CJK year
/// labels correctly.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes `rows` to `path` as BOM-prefixed UTF-8 CSV, replacing any existing
/// file. The header row is written even when `rows` is empty.
pub fn write_csv<T: Serialize + TableColumns>(path: &Path, rows: &[T]) -> Result<usize, PipelineError> {
    let sink_err = |what: &str, e: &dyn std::fmt::Display| {
        PipelineError::Sink(format!("failed to {what} '{}': {e}", path.display()))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| sink_err("create directory for", &e))?;
    }

    let mut file = File::create(path).map_err(|e| sink_err("create", &e))?;
    file.write_all(UTF8_BOM).map_err(|e| sink_err("write", &e))?;

    let mut wtr = csv::Writer::from_writer(file);
    if rows.is_empty() {
        wtr.write_record(T::COLUMNS).map_err(|e| sink_err("write header into", &e))?;
    }
    for row in rows {
        wtr.serialize(row).map_err(|e| sink_err("serialize row into", &e))?;
    }
    wtr.flush().map_err(|e| sink_err("flush", &e))?;

    metrics::counter!("csv_rows_written_total").increment(rows.len() as u64);
    tracing::info!(path = %path.display(), rows = rows.len(), "csv exported");

    Ok(rows.len())
}

/// Stream sink that exports everything it receives to one CSV file.
///
/// The whole stream is buffered first so an upstream failure never leaves a
/// partial file behind.
pub struct CsvFileSink<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CsvFileSink<T> {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<T> Sink<T> for CsvFileSink<T>
where
    T: Serialize + TableColumns + Send + 'static,
{
    async fn run<S>(&self, mut input: S) -> Result<usize, PipelineError>
    where
        S: futures::Stream<Item = Result<T, PipelineError>> + Send + Unpin + 'static,
    {
        let mut buffer: Vec<T> = Vec::new();

        while let Some(item) = input.next().await {
            match item {
                Ok(record) => buffer.push(record),
                Err(e) => {
                    tracing::error!(error = %e, path = %self.path.display(), "upstream failed, nothing exported");
                    return Err(e);
                }
            }
        }

        write_csv(&self.path, &buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_domain::domain::{ComparisonRecord, NationwideRecord, RawPowerRecord, YearMonth};

    #[derive(Serialize)]
    struct Row {
        year_month: YearMonth,
        location: &'static str,
        value: f64,
    }

    impl TableColumns for Row {
        const COLUMNS: &'static [&'static str] = &["year_month", "location", "value"];
    }

    fn header_line(path: &Path) -> String {
        let bytes = fs::read(path).unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        text.lines().next().unwrap_or_default().to_string()
    }

    #[test]
    fn writes_bom_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let rows = vec![
            Row { year_month: YearMonth::new(2020, 1).unwrap(), location: "臺南", value: 1.5 },
            Row { year_month: YearMonth::new(2020, 2).unwrap(), location: "臺南", value: f64::NAN },
        ];

        let written = write_csv(&path, &rows).unwrap();
        assert_eq!(written, 2);

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "year_month,location,value\n2020-01,臺南,1.5\n2020-02,臺南,NaN\n");
    }

    #[test]
    fn empty_table_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comparison.csv");

        assert_eq!(write_csv::<ComparisonRecord>(&path, &[]).unwrap(), 0);

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        assert_eq!(
            header_line(&path),
            "year_month,power_kwh,irradiance,temp_c,power_kwh_norm,irradiance_norm,temp_c_norm"
        );
    }

    #[test]
    fn empty_and_filled_tables_share_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.csv");
        let filled = dir.path().join("filled.csv");
        let row = NationwideRecord { year_month: YearMonth::new(2020, 1).unwrap(), irradiance: 4.0, temp_c: 18.0 };

        write_csv::<NationwideRecord>(&empty, &[]).unwrap();
        write_csv(&filled, &[row]).unwrap();

        assert_eq!(header_line(&empty), header_line(&filled));
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "stale contents that are longer than the new file\n").unwrap();

        let rows = vec![Row { year_month: YearMonth::new(2019, 12).unwrap(), location: "Yunlin", value: 2.0 }];
        write_csv(&path, &rows).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert!(text.ends_with("2019-12,Yunlin,2.0\n"));
    }

    #[tokio::test]
    async fn sink_exports_stream_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("power.csv");
        let sink = CsvFileSink::new(&path);

        let record = RawPowerRecord { year: "113年".to_string(), month: "11301".to_string(), power_kwh: 1234 };
        let input = futures::stream::iter(vec![Ok(record)]);

        assert_eq!(sink.run(input).await.unwrap(), 1);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("year,month,power_kwh\n113年,11301,1234\n"));
    }

    #[tokio::test]
    async fn sink_writes_nothing_when_upstream_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("power.csv");
        let sink: CsvFileSink<RawPowerRecord> = CsvFileSink::new(&path);

        let input = futures::stream::iter(vec![Err::<RawPowerRecord, _>(PipelineError::Source(
            "session timed out".to_string(),
        ))]);

        assert!(sink.run(input).await.is_err());
        assert!(!path.exists());
    }
}
