//! Data models for geosales-ingest
//!
//! - Raw spreadsheet rows as received from uploads or JSON
//! - Stored sales records and their insertable form
//! - Derived analytics and per-ingest reports

pub mod analytics_summary;
pub mod ingest_report;
pub mod raw_row;
pub mod sales_record;

pub use analytics_summary::AnalyticsSummary;
pub use ingest_report::IngestReport;
pub use raw_row::RawRow;
pub use sales_record::{
    Coordinates, MonthlyValues, SalesData, SalesRecord, SalesYear, YearlyTotals, MONTH_CODES,
};
