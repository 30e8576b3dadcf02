use fantoccini::{elements::Element, error::CmdError, Client, ClientBuilder, Locator};
use serde_json::json;

use crate::{
    config::PowerChartConfig,
    pipeline::PipelineError,
    sources::power_chart::{ChartSession, YearOption},
};

fn webdriver_error(action: &str) -> impl FnOnce(CmdError) -> PipelineError + '_ {
    move |e| PipelineError::Source(format!("webdriver failed to {action}: {e}"))
}

/// Chart session driven through a WebDriver server (chromedriver, geckodriver).
pub struct WebDriverSession {
    client: Client,
    config: PowerChartConfig,
}

impl WebDriverSession {
    /// Starts a browser session and opens the chart page.
    pub async fn connect(config: &PowerChartConfig) -> Result<Self, PipelineError> {
        let mut caps = serde_json::Map::new();
        if config.headless {
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless", "--disable-gpu"] }),
            );
            caps.insert("moz:firefoxOptions".to_string(), json!({ "args": ["-headless"] }));
        }

        let mut builder = ClientBuilder::native();
        builder.capabilities(caps);
        let client = builder
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| {
                PipelineError::Source(format!("failed to start session at {}: {e}", config.webdriver_url))
            })?;

        if let Err(e) = client.goto(&config.url).await {
            let _ = client.close().await;
            return Err(webdriver_error("open chart page")(e));
        }

        tracing::info!(url = %config.url, "chart page opened");
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn year_selector(&self) -> Result<Element, PipelineError> {
        self.client
            .wait()
            .at_most(self.config.wait_timeout())
            .for_element(Locator::Id(&self.config.selector_id))
            .await
            .map_err(webdriver_error("find the year selector"))
    }
}

#[async_trait::async_trait]
impl ChartSession for WebDriverSession {
    async fn year_options(&self) -> Result<Vec<YearOption>, PipelineError> {
        let select = self.year_selector().await?;
        let options = select
            .find_all(Locator::Css("option"))
            .await
            .map_err(webdriver_error("list year options"))?;

        let mut out = Vec::with_capacity(options.len());
        for option in options {
            let value = option
                .attr("value")
                .await
                .map_err(webdriver_error("read option value"))?
                .unwrap_or_default();
            let text = option.text().await.map_err(webdriver_error("read option text"))?;
            out.push(YearOption {
                value,
                text: text.trim().to_string(),
            });
        }
        Ok(out)
    }

    async fn select_year(&self, value: &str) -> Result<(), PipelineError> {
        let select = self.year_selector().await?;
        select
            .select_by_value(value)
            .await
            .map_err(webdriver_error("select year"))?;

        // The chart redraws asynchronously after the change event.
        tokio::time::sleep(self.config.settle_delay()).await;
        Ok(())
    }

    async fn read_labels(&self) -> Result<Vec<String>, PipelineError> {
        let selector = self.config.label_selector.as_str();
        self.client
            .wait()
            .at_most(self.config.wait_timeout())
            .for_element(Locator::Css(selector))
            .await
            .map_err(webdriver_error("wait for chart labels"))?;

        let elements = self
            .client
            .find_all(Locator::Css(selector))
            .await
            .map_err(webdriver_error("collect chart labels"))?;

        let mut labels = Vec::with_capacity(elements.len());
        for element in elements {
            if let Some(label) = element
                .attr("aria-label")
                .await
                .map_err(webdriver_error("read aria-label"))?
            {
                labels.push(label);
            }
        }
        Ok(labels)
    }

    async fn close(&self) -> Result<(), PipelineError> {
        self.client
            .clone()
            .close()
            .await
            .map_err(webdriver_error("close session"))
    }
}
