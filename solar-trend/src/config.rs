use serde::Deserialize;
use solar_domain::domain::Location;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use time::{macros::date, Date};

const CONFIG_ENV: &str = "SOLAR_TREND_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "solar-trend.toml";

const TAIPOWER_SOLAR_CHART_URL: &str = "https://www.taipower.com.tw/chart/b20_%E7%99%BC%E9%9B%BB%E8%B3%87%E8%A8%8A_%E5%86%8D%E7%94%9F%E8%83%BD%E6%BA%90%E7%99%BC%E9%9B%BB%E6%A6%82%E6%B3%81_%E6%9C%AC%E5%85%AC%E5%8F%B8%E8%BF%9112%E5%80%8B%E6%9C%88%E5%A4%AA%E9%99%BD%E5%85%89%E9%9B%BB%E7%99%BC%E9%9B%BB%E9%87%8F_.html?251022";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IrradianceConfig {
    pub base_url: String,
    pub irradiance_parameter: String,
    pub temperature_parameter: String,
    pub community: String,
    pub start: Date,
    pub end: Date,
    pub timeout_secs: u64,
    /// Number of locations fetched at once. 1 keeps the run strictly sequential.
    pub fetch_concurrency: usize,
    pub locations: Vec<Location>,
}

impl IrradianceConfig {
    /// Comma-joined parameter list for the `parameters` query field.
    pub fn parameters(&self) -> String {
        format!("{},{}", self.irradiance_parameter, self.temperature_parameter)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for IrradianceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://power.larc.nasa.gov/api/temporal/daily/point".to_string(),
            irradiance_parameter: "ALLSKY_SFC_SW_DWN".to_string(),
            temperature_parameter: "T2M".to_string(),
            community: "RE".to_string(),
            start: date!(2018 - 01 - 01),
            end: date!(2024 - 12 - 31),
            timeout_secs: 60,
            fetch_concurrency: 1,
            locations: default_locations(),
        }
    }
}

fn default_locations() -> Vec<Location> {
    [
        ("Taipei", 25.05, 121.52),
        ("Taoyuan", 24.99, 121.31),
        ("Hsinchu", 24.81, 120.97),
        ("Miaoli", 24.56, 120.82),
        ("Taichung", 24.15, 120.67),
        ("Changhua", 24.08, 120.54),
        ("Yunlin", 23.71, 120.54),
        ("Chiayi", 23.48, 120.44),
        ("Tainan", 23.0, 120.2),
        ("Kaohsiung", 22.63, 120.3),
        ("Pingtung", 22.67, 120.48),
        ("Taitung", 22.76, 121.14),
        ("Hualien", 23.98, 121.61),
    ]
    .into_iter()
    .map(|(name, lat, lon)| Location::new(name, lat, lon))
    .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PowerChartConfig {
    pub url: String,
    pub webdriver_url: String,
    pub headless: bool,
    /// `id` of the year `<select>` element.
    pub selector_id: String,
    /// CSS selector of the rendered elements carrying `aria-label`s.
    pub label_selector: String,
    /// Option value skipped during the year loop ("last 12 months").
    pub excluded_value: String,
    pub wait_timeout_secs: u64,
    pub settle_delay_ms: u64,
}

impl PowerChartConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for PowerChartConfig {
    fn default() -> Self {
        Self {
            url: TAIPOWER_SOLAR_CHART_URL.to_string(),
            webdriver_url: "http://localhost:4444".to_string(),
            headless: true,
            selector_id: "selectPeriod".to_string(),
            label_selector: "g[aria-label]".to_string(),
            excluded_value: "0".to_string(),
            wait_timeout_secs: 10,
            settle_delay_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub window_start: Date,
    pub window_end: Date,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            window_start: date!(2018 - 01 - 01),
            window_end: date!(2024 - 12 - 31),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub daily_file: String,
    pub monthly_file: String,
    pub nationwide_file: String,
    pub power_file: String,
    pub comparison_file: String,
}

impl OutputConfig {
    pub fn daily_path(&self) -> PathBuf {
        self.dir.join(&self.daily_file)
    }

    pub fn monthly_path(&self) -> PathBuf {
        self.dir.join(&self.monthly_file)
    }

    pub fn nationwide_path(&self) -> PathBuf {
        self.dir.join(&self.nationwide_file)
    }

    pub fn power_path(&self) -> PathBuf {
        self.dir.join(&self.power_file)
    }

    pub fn comparison_path(&self) -> PathBuf {
        self.dir.join(&self.comparison_file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            daily_file: "taiwan_solar_temp_daily_2018_2024.csv".to_string(),
            monthly_file: "taiwan_solar_temp_monthly_2018_2024.csv".to_string(),
            nationwide_file: "taiwan_avg_solar_temp_2018_2024.csv".to_string(),
            power_file: "taiwan_solar_power_2018_2024.csv".to_string(),
            comparison_file: "taiwan_normalized_comparison_2018_2024.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub irradiance: IrradianceConfig,
    pub power_chart: PowerChartConfig,
    pub comparison: ComparisonConfig,
    pub output: OutputConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Loads the file named by `SOLAR_TREND_CONFIG`, else `solar-trend.toml`
    /// when present, else the built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::from_file(&path);
        }
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Self::from_file(DEFAULT_CONFIG_PATH);
        }

        tracing::info!("no config file found, using built-in defaults");
        Ok(Self::default())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let cfg: AppConfig = toml::from_str(&contents)?;
        Ok(cfg)
    }
}
