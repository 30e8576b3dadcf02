pub mod csv_file;
pub mod nasa_power;
pub mod power_chart;
pub mod webdriver;

pub use csv_file::CsvFileSource;
pub use nasa_power::NasaPowerSource;
pub use power_chart::{ChartSession, PowerChartSource};
pub use webdriver::WebDriverSession;
