use anyhow::Result;
use solar_trend::{config::AppConfig, observability, pipeline, sources::NasaPowerSource};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    let source = NasaPowerSource::new(cfg.irradiance.clone())?;
    let tables = pipeline::run_irradiance_stage(&source, &cfg.output).await?;

    for row in tables.nationwide.iter().take(5) {
        tracing::info!(
            year_month = %row.year_month,
            irradiance = row.irradiance,
            temp_c = row.temp_c,
            "nationwide monthly mean"
        );
    }

    Ok(())
}
