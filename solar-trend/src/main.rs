use anyhow::Result;
use solar_trend::{
    config::AppConfig,
    metrics_server,
    observability,
    pipeline,
    sources::{NasaPowerSource, PowerChartSource, WebDriverSession},
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    // Daily irradiance and temperature, aggregated per month.
    let irradiance_source = NasaPowerSource::new(cfg.irradiance.clone())?;
    let tables = pipeline::run_irradiance_stage(&irradiance_source, &cfg.output).await?;

    // Monthly generation from the chart page.
    let session = WebDriverSession::connect(&cfg.power_chart).await?;
    let power_source = PowerChartSource::new(session, &cfg.power_chart.excluded_value);
    let raw_power = pipeline::run_power_stage(&power_source, &cfg.output).await?;

    let comparison = pipeline::run_comparison_stage(&raw_power, &tables.monthly, &cfg.comparison, &cfg.output)?;

    tracing::info!(
        locations = cfg.irradiance.locations.len(),
        months = comparison.len(),
        output = %cfg.output.comparison_path().display(),
        "all stages finished"
    );

    Ok(())
}
