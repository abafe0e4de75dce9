use thiserror::Error;

use crate::database::manager::DatabaseError;
use crate::database::record::RecordError;
use crate::report::schema::SchemaError;

/// Errors surfaced by report listing and the per-record operations
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid {name} parameter: {value} ({expected})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("storage error: {0}")]
    Storage(#[from] DatabaseError),

    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Record(#[from] RecordError),
}

impl ReportError {
    pub fn invalid_parameter(name: &'static str, value: impl Into<String>, expected: &'static str) -> Self {
        ReportError::InvalidParameter { name, value: value.into(), expected }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ReportError::Validation(message.into())
    }
}

impl From<crate::filter::error::FilterError> for ReportError {
    fn from(err: crate::filter::error::FilterError) -> Self {
        ReportError::Storage(DatabaseError::from(err))
    }
}
