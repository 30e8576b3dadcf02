use std::pin::Pin;

use futures::{Stream, StreamExt};
use solar_domain::domain::{
    ComparisonRecord, DailyRecord, MonthlyLocationRecord, NationwideRecord, RawPowerRecord,
};

use crate::{
    config::{ComparisonConfig, OutputConfig},
    sinks::csv_file::write_csv,
    transform::{aggregate, calendar, merge, normalize, DateWindow},
};

pub type RecordStream<T> = Pin<Box<dyn Stream<Item = Result<T, PipelineError>> + Send>>;

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("source error: {0}")]
    Source(String),
    #[error("sink error: {0}")]
    Sink(String),
    #[error("no location returned irradiance data")]
    NoIrradianceData,
}

#[async_trait::async_trait]
pub trait Source<T>: Send + Sync {
    async fn stream(&self) -> RecordStream<T>;
}

#[async_trait::async_trait]
pub trait Sink<T>: Send + Sync {
    /// Consumes the stream and returns the number of records written.
    async fn run<S>(&self, input: S) -> Result<usize, PipelineError>
    where
        S: Stream<Item = Result<T, PipelineError>> + Send + Unpin + 'static;
}

/// Drains a stream into memory, stopping at the first error.
pub async fn collect<T>(mut input: RecordStream<T>) -> Result<Vec<T>, PipelineError> {
    let mut out = Vec::new();
    while let Some(item) = input.next().await {
        out.push(item?);
    }
    Ok(out)
}

pub struct IrradianceTables {
    pub daily: Vec<DailyRecord>,
    pub monthly: Vec<MonthlyLocationRecord>,
    pub nationwide: Vec<NationwideRecord>,
}

/// Fetches daily readings, aggregates them and exports the three tables.
pub async fn run_irradiance_stage<S>(source: &S, output: &OutputConfig) -> Result<IrradianceTables, PipelineError>
where
    S: Source<DailyRecord>,
{
    let daily = collect(source.stream().await).await?;
    let monthly = aggregate::monthly_means(&daily);
    let nationwide = aggregate::nationwide_means(&monthly);

    write_csv(&output.daily_path(), &daily)?;
    write_csv(&output.monthly_path(), &monthly)?;
    write_csv(&output.nationwide_path(), &nationwide)?;

    tracing::info!(
        daily = daily.len(),
        monthly = monthly.len(),
        nationwide = nationwide.len(),
        "irradiance stage complete"
    );

    Ok(IrradianceTables {
        daily,
        monthly,
        nationwide,
    })
}

/// Scrapes the raw generation labels and exports them unconverted.
pub async fn run_power_stage<S>(source: &S, output: &OutputConfig) -> Result<Vec<RawPowerRecord>, PipelineError>
where
    S: Source<RawPowerRecord>,
{
    let raw = collect(source.stream().await).await?;
    write_csv(&output.power_path(), &raw)?;

    tracing::info!(records = raw.len(), "power stage complete");
    Ok(raw)
}

/// Aligns generation with the monthly weather series, normalizes and exports.
///
/// `monthly` may be per-location or already nationwide.
pub fn run_comparison_stage(
    raw_power: &[RawPowerRecord],
    monthly: &[MonthlyLocationRecord],
    comparison: &ComparisonConfig,
    output: &OutputConfig,
) -> Result<Vec<ComparisonRecord>, PipelineError> {
    let window = DateWindow::new(comparison.window_start, comparison.window_end);

    let power = calendar::normalize_power_records(raw_power);
    let irradiance = merge::window_mean(monthly.iter().map(|m| (m.year_month, m.irradiance)), &window);
    let temperature = merge::window_mean(monthly.iter().map(|m| (m.year_month, m.temp_c)), &window);

    let merged = merge::merge_series(&power, &irradiance, &temperature, &window);
    let table = normalize::normalize(&merged);

    write_csv(&output.comparison_path(), &table)?;

    tracing::info!(
        power_months = power.len(),
        weather_months = irradiance.len(),
        merged = table.len(),
        "comparison stage complete"
    );
    Ok(table)
}
