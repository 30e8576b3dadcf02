use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use solar_domain::domain::RawPowerRecord;

use crate::pipeline::{PipelineError, RecordStream, Source};

/// Label wire format: `{5-digit ROC month code} {thousands-grouped kWh}`.
static LABEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{5})\s([\d,]+)").expect("valid chart label pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearOption {
    pub value: String,
    pub text: String,
}

/// The parts of an interactive chart page the scraper needs.
#[async_trait::async_trait]
pub trait ChartSession: Send + Sync {
    /// Entries of the year selector, in page order.
    async fn year_options(&self) -> Result<Vec<YearOption>, PipelineError>;

    /// Selects a year and returns once the chart has had time to redraw.
    async fn select_year(&self, value: &str) -> Result<(), PipelineError>;

    /// Accessible labels of the currently rendered series.
    async fn read_labels(&self) -> Result<Vec<String>, PipelineError>;

    async fn close(&self) -> Result<(), PipelineError>;
}

/// Extracts `(month code, kWh)` from a chart label.
pub fn parse_label(label: &str) -> Option<(String, i64)> {
    let caps = LABEL_PATTERN.captures(label)?;
    let code = caps.get(1)?.as_str().to_string();
    let digits: String = caps.get(2)?.as_str().chars().filter(|c| *c != ',').collect();
    let power_kwh = digits.parse().ok()?;
    Some((code, power_kwh))
}

/// Walks every year of the selector except `excluded_value` and collects
/// the parsed labels. Stops at the first session error.
pub async fn scrape_years<C>(session: &C, excluded_value: &str) -> Result<Vec<RawPowerRecord>, PipelineError>
where
    C: ChartSession + ?Sized,
{
    let options = session.year_options().await?;
    let mut records = Vec::new();

    for option in options {
        if option.value == excluded_value {
            continue;
        }

        tracing::info!(year = %option.text, value = %option.value, "scraping chart year");
        session.select_year(&option.value).await?;
        let labels = session.read_labels().await?;

        let before = records.len();
        for label in &labels {
            match parse_label(label) {
                Some((month, power_kwh)) => records.push(RawPowerRecord {
                    year: option.text.clone(),
                    month,
                    power_kwh,
                }),
                None => {
                    metrics::counter!("power_labels_unmatched_total").increment(1);
                }
            }
        }

        let parsed = records.len() - before;
        metrics::counter!("power_labels_parsed_total").increment(parsed as u64);
        tracing::debug!(year = %option.text, labels = labels.len(), parsed, "year scraped");
    }

    Ok(records)
}

/// Source of raw generation figures backed by a single chart session.
///
/// The session is consumed by the first call to `stream` and closed once the
/// year loop ends, whether or not it succeeded.
pub struct PowerChartSource<C> {
    session: Arc<tokio::sync::Mutex<Option<C>>>,
    excluded_value: String,
}

impl<C> PowerChartSource<C> {
    pub fn new(session: C, excluded_value: &str) -> Self {
        Self {
            session: Arc::new(tokio::sync::Mutex::new(Some(session))),
            excluded_value: excluded_value.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl<C> Source<RawPowerRecord> for PowerChartSource<C>
where
    C: ChartSession + 'static,
{
    async fn stream(&self) -> RecordStream<RawPowerRecord> {
        let session = self.session.lock().await.take();
        let excluded_value = self.excluded_value.clone();

        let s = async_stream::try_stream! {
            let session = session
                .ok_or_else(|| PipelineError::Source("chart session already consumed".to_string()))?;

            let scraped = scrape_years(&session, &excluded_value).await;
            if let Err(e) = session.close().await {
                tracing::warn!(error = %e, "failed to close chart session");
            }

            for record in scraped? {
                yield record;
            }
        };

        Box::pin(s)
    }
}
