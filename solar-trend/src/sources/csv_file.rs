use std::{fs, marker::PhantomData, path::PathBuf};

use serde::de::DeserializeOwned;

use crate::{
    pipeline::{PipelineError, RecordStream, Source},
    sinks::csv_file::UTF8_BOM,
};

/// Reads a table previously exported by `sinks::csv_file` (or any CSV with
/// matching column names).
///
/// A leading UTF-8 BOM is ignored. Rows that fail to deserialize end the
/// stream with an error.
pub struct CsvFileSource<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CsvFileSource<T> {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<T> Source<T> for CsvFileSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn stream(&self) -> RecordStream<T> {
        // Blocking reads; the exported tables are small.
        let path = self.path.clone();
        let s = async_stream::try_stream! {
            let bytes = fs::read(&path).map_err(|e| {
                PipelineError::Source(format!("failed to open CSV file '{}': {e}", path.display()))
            })?;
            let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

            let mut rdr = csv::Reader::from_reader(body);
            for (line, result) in rdr.deserialize::<T>().enumerate() {
                let record = result.map_err(|e| {
                    metrics::counter!("csv_parse_errors_total").increment(1);
                    PipelineError::Source(format!(
                        "failed to parse record {} of '{}': {e}",
                        line + 1,
                        path.display()
                    ))
                })?;
                yield record;
            }
        };

        Box::pin(s)
    }
}
