use anyhow::Result;
use solar_domain::domain::RawPowerRecord;
use solar_trend::{
    config::AppConfig,
    observability,
    sinks::CsvFileSink,
    sources::{PowerChartSource, WebDriverSession},
    Sink, Source,
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    let session = WebDriverSession::connect(&cfg.power_chart).await?;
    let source = PowerChartSource::new(session, &cfg.power_chart.excluded_value);
    let sink: CsvFileSink<RawPowerRecord> = CsvFileSink::new(cfg.output.power_path());

    let written = sink.run(source.stream().await).await?;
    tracing::info!(records = written, "power labels exported");

    Ok(())
}
