pub mod builder;
pub mod row;

pub use builder::{build_report, sort_rows};
pub use row::ReportRow;
