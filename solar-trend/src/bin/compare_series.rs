use anyhow::{bail, Result};
use solar_domain::domain::{MonthlyLocationRecord, RawPowerRecord};
use solar_trend::{
    config::AppConfig,
    observability,
    pipeline::{self, collect},
    sources::CsvFileSource,
    Source,
};

/// Rebuilds the comparison table from the CSVs left by `fetch_irradiance`
/// and `scrape_power`.
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    let power_source: CsvFileSource<RawPowerRecord> = CsvFileSource::new(cfg.output.power_path());
    let monthly_source: CsvFileSource<MonthlyLocationRecord> = CsvFileSource::new(cfg.output.monthly_path());

    let raw_power = collect(power_source.stream().await).await?;
    let monthly = collect(monthly_source.stream().await).await?;

    let comparison = pipeline::run_comparison_stage(&raw_power, &monthly, &cfg.comparison, &cfg.output)?;
    if comparison.is_empty() {
        bail!("no month is covered by both the power and the weather series");
    }

    tracing::info!(months = comparison.len(), "comparison table exported");
    Ok(())
}
