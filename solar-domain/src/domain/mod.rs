mod columns;
mod comparison;
mod daily_record;
mod location;
mod monthly;
mod power_record;
mod year_month;

pub use columns::TableColumns;
pub use comparison::ComparisonRecord;
pub use daily_record::DailyRecord;
pub use location::Location;
pub use monthly::{MonthlyLocationRecord, NationwideRecord};
pub use power_record::{PowerRecord, RawPowerRecord};
pub use year_month::{YearMonth, YearMonthParseError};
