pub mod aggregate;
pub mod calendar;
pub mod merge;
pub mod normalize;

pub use merge::{DateWindow, MergedRow};
