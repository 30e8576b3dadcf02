use futures::{stream, StreamExt};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use solar_domain::domain::{DailyRecord, Location};
use time::{macros::format_description, Date};

use crate::{
    config::IrradianceConfig,
    pipeline::{PipelineError, RecordStream, Source},
};

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request for {location} failed")]
    Request {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("response has no 'properties.parameter.{0}' map")]
    MissingParameter(String),
}

/// Daily irradiance and temperature from the NASA POWER point API.
///
/// Each configured location costs one request. A location whose request
/// fails is logged and left out; the stream only fails when no location
/// produced any data.
#[derive(Clone)]
pub struct NasaPowerSource {
    client: Client,
    config: IrradianceConfig,
}

impl NasaPowerSource {
    pub fn new(config: IrradianceConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| PipelineError::Source(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn query(&self, location: &Location) -> Vec<(&'static str, String)> {
        let ymd = format_description!("[year][month][day]");
        let format_date = |d: Date| d.format(ymd).unwrap_or_default();

        vec![
            ("parameters", self.config.parameters()),
            ("community", self.config.community.clone()),
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("start", format_date(self.config.start)),
            ("end", format_date(self.config.end)),
            ("format", "JSON".to_string()),
        ]
    }

    /// Fetches the daily series of a single location. No retries.
    pub async fn fetch_location(&self, location: &Location) -> Result<Vec<DailyRecord>, FetchError> {
        tracing::info!(
            location = %location.name,
            latitude = location.latitude,
            longitude = location.longitude,
            "fetching daily irradiance"
        );

        let request_err = |source| FetchError::Request {
            location: location.name.clone(),
            source,
        };

        let resp = self
            .client
            .get(&self.config.base_url)
            .query(&self.query(location))
            .send()
            .await
            .map_err(request_err)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: resp.url().to_string(),
                status,
            });
        }

        let body: Value = resp.json().await.map_err(request_err)?;
        parse_daily_records(
            &body,
            &self.config.irradiance_parameter,
            &self.config.temperature_parameter,
            &location.name,
        )
    }
}

/// Turns a POWER response body into one record per date key of the
/// irradiance map.
///
/// Both maps are assumed to share their date keys; a temperature missing for
/// a date becomes NaN. Keys that are not `YYYYMMDD` are skipped.
pub fn parse_daily_records(
    body: &Value,
    irradiance_parameter: &str,
    temperature_parameter: &str,
    location: &str,
) -> Result<Vec<DailyRecord>, FetchError> {
    let parameters = body.pointer("/properties/parameter");
    let series = |name: &str| {
        parameters
            .and_then(|p| p.get(name))
            .and_then(Value::as_object)
            .ok_or_else(|| FetchError::MissingParameter(name.to_string()))
    };

    let irradiance = series(irradiance_parameter)?;
    let temperature = series(temperature_parameter)?;

    let ymd = format_description!("[year][month][day]");
    let mut records = Vec::with_capacity(irradiance.len());

    for (key, value) in irradiance {
        let date = match Date::parse(key, ymd) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(location, key = %key, error = %e, "skipping unparseable date key");
                continue;
            }
        };

        records.push(DailyRecord {
            date,
            irradiance: value.as_f64().unwrap_or(f64::NAN),
            temp_c: temperature.get(key).and_then(Value::as_f64).unwrap_or(f64::NAN),
            location: location.to_string(),
        });
    }

    Ok(records)
}

#[async_trait::async_trait]
impl Source<DailyRecord> for NasaPowerSource {
    async fn stream(&self) -> RecordStream<DailyRecord> {
        let this = self.clone();

        let s = async_stream::try_stream! {
            let concurrency = this.config.fetch_concurrency.max(1);
            let locations = this.config.locations.clone();

            // `buffered` keeps the configured location order.
            let mut results = stream::iter(locations)
                .map(|location| {
                    let fetcher = this.clone();
                    async move {
                        let result = fetcher.fetch_location(&location).await;
                        (location, result)
                    }
                })
                .buffered(concurrency);

            let mut succeeded = 0usize;
            while let Some((location, result)) = results.next().await {
                let records = match result {
                    Ok(records) if records.is_empty() => {
                        tracing::warn!(location = %location.name, "no daily records returned, skipping location");
                        metrics::counter!("irradiance_locations_failed_total").increment(1);
                        continue;
                    }
                    Ok(records) => records,
                    Err(e) => {
                        tracing::warn!(location = %location.name, error = %e, "irradiance fetch failed, skipping location");
                        metrics::counter!("irradiance_locations_failed_total").increment(1);
                        continue;
                    }
                };

                succeeded += 1;
                metrics::counter!("irradiance_records_total").increment(records.len() as u64);
                for record in records {
                    yield record;
                }
            }

            if succeeded == 0 {
                Err(PipelineError::NoIrradianceData)?;
            }
        };

        Box::pin(s)
    }
}
