// src/lib.rs
pub mod aggregation;
pub mod config;
pub mod entry_source;
pub mod error;
pub mod html_report;
pub mod pie_chart;
pub mod report;
pub mod time_entries;

mod config_tests;
mod pie_chart_tests;

pub use aggregation::{aggregate, EmployeeTotal, RankedSummary, UNNAMED_EMPLOYEE};
pub use config::ReportConfig;
pub use error::ReportError;
pub use report::{build_report, run, ReportArtifacts, ReportOptions, WrittenReport};
pub use time_entries::{parse_time_entries, TimeEntry};
