// Report listing: field mapping, query parameters, and the query engine
pub mod engine;
pub mod error;
pub mod params;
pub mod schema;

pub use engine::{ReportEngine, ReportResponse};
pub use error::ReportError;
pub use params::ReportParams;
pub use schema::{mapping_for, FieldMapping, RecordSchema, Reportable, SchemaError};
