//! Pipeline stages and analytics
//!
//! Each stage owns its own row-level failure handling; only
//! [`ingest_pipeline`] wires them together.

pub mod analytics;
pub mod batch_writer;
pub mod geocode_pool;
pub mod geocoder;
pub mod ingest_pipeline;
pub mod row_normalizer;
pub mod schema_validator;
pub mod spreadsheet_reader;

pub use batch_writer::BatchWriter;
pub use geocode_pool::{EnrichedDraft, GeocodePool};
pub use geocoder::{DisabledGeocoder, GeocodeError, GeocodeProvider, GoogleGeocoder};
pub use ingest_pipeline::IngestPipeline;
pub use row_normalizer::{normalize_row, RecordDraft, SkipReason};
pub use schema_validator::{validate, ValidationError};
pub use spreadsheet_reader::{read_first_sheet, SpreadsheetError};
