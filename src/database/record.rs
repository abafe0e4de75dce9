use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::store::Row;
use crate::report::schema::{FieldDef, FieldType, RecordSchema, CREATED_AT, ID, UPDATED_AT};

/// External keys the server manages itself; ignored on input
const SERVER_MANAGED: &[&str] = &["createdAt", "updatedAt"];

/// Operation type for payload conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
}

/// Errors that can occur while converting an API payload into a storage row
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),
    #[error("Field '{0}' cannot be null")]
    NullNotAllowed(String),
    #[error("Field '{field}' must be {expected}")]
    InvalidType { field: String, expected: &'static str },
    #[error("Invalid UUID format for field '{field}': {value}")]
    InvalidUuid { field: String, value: String },
    #[error("Invalid timestamp format for field '{field}': {value}")]
    InvalidTimestamp { field: String, value: String },
}

/// A validated report row, keyed by storage column
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: &'static RecordSchema,
    fields: Row,
    operation: Operation,
}

impl Record {
    /// Convert an external-name JSON object into a storage row.
    ///
    /// Unknown keys are dropped. On create a missing `id` is generated and every
    /// required field other than the submitter fields must be present and non-null.
    pub fn from_api_input(
        schema: &'static RecordSchema,
        json: Value,
        operation: Operation,
    ) -> Result<Self, RecordError> {
        let Value::Object(input) = json else {
            return Err(RecordError::InvalidJson("Expected JSON object".to_string()));
        };

        let mut fields = Map::new();
        for (key, value) in input {
            if SERVER_MANAGED.contains(&key.as_str()) {
                continue;
            }
            let Some(field) = schema.field_by_external(&key) else {
                tracing::trace!("Ignoring unknown field '{}' for {}", key, schema.kind);
                continue;
            };
            if field.column == ID && operation == Operation::Update {
                continue;
            }
            let value = coerce(field, value)?;
            let stamped = operation == Operation::Create && schema.is_submitter_field(field.external);
            if value.is_null() && field.required && !stamped {
                return Err(RecordError::NullNotAllowed(field.external.to_string()));
            }
            fields.insert(field.column.to_string(), value);
        }

        let mut record = Self { schema, fields, operation };
        let now = Value::String(now_rfc3339());

        match operation {
            Operation::Create => {
                if !record.fields.get(ID).is_some_and(|v| !v.is_null()) {
                    record.fields.insert(ID.to_string(), Value::String(Uuid::new_v4().to_string()));
                }
                record.check_required()?;
                if schema.has_column(CREATED_AT) {
                    record.fields.insert(CREATED_AT.to_string(), now.clone());
                }
                if schema.has_column(UPDATED_AT) {
                    record.fields.insert(UPDATED_AT.to_string(), now);
                }
            }
            Operation::Update => {
                if schema.has_column(UPDATED_AT) {
                    record.fields.insert(UPDATED_AT.to_string(), now);
                }
            }
        }

        Ok(record)
    }

    /// Overwrite the submitter fields with the caller's identity
    pub fn stamp_submitter(&mut self, name: &str, phone: &str) -> &mut Self {
        for (external, value) in [(self.schema.submitter.name, name), (self.schema.submitter.phone, phone)] {
            if let Some(field) = self.schema.field_by_external(external) {
                self.fields.insert(field.column.to_string(), Value::String(value.to_string()));
            }
        }
        self
    }

    pub fn id(&self) -> Option<Uuid> {
        self.fields.get(ID).and_then(Value::as_str).and_then(|s| Uuid::parse_str(s).ok())
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn into_row(self) -> Row {
        self.fields
    }

    fn check_required(&self) -> Result<(), RecordError> {
        for field in self.schema.fields {
            if !field.required || field.is_internal() || self.schema.is_submitter_field(field.external) {
                continue;
            }
            if !self.fields.get(field.column).is_some_and(|v| !v.is_null()) {
                return Err(RecordError::MissingRequiredField(field.external.to_string()));
            }
        }
        Ok(())
    }
}

/// Type-check one value against its field, normalising timestamps and uuids
fn coerce(field: &FieldDef, value: Value) -> Result<Value, RecordError> {
    if value.is_null() {
        return Ok(value);
    }
    let invalid = |expected| RecordError::InvalidType { field: field.external.to_string(), expected };

    match field.ty {
        FieldType::Text => match value {
            Value::String(_) => Ok(value),
            _ => Err(invalid("a string")),
        },
        FieldType::Number => match value {
            Value::Number(_) => Ok(value),
            _ => Err(invalid("a number")),
        },
        FieldType::Integer => match value.as_i64() {
            Some(_) => Ok(value),
            None => Err(invalid("an integer")),
        },
        FieldType::Uuid => {
            let s = value.as_str().ok_or_else(|| invalid("a UUID string"))?;
            let id = Uuid::parse_str(s).map_err(|_| RecordError::InvalidUuid {
                field: field.external.to_string(),
                value: s.to_string(),
            })?;
            Ok(Value::String(id.to_string()))
        }
        FieldType::Timestamp => {
            let s = value.as_str().ok_or_else(|| invalid("a timestamp string"))?;
            let ts = parse_timestamp(s).ok_or_else(|| RecordError::InvalidTimestamp {
                field: field.external.to_string(),
                value: s.to_string(),
            })?;
            Ok(Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
        }
        FieldType::TextArray => {
            if value.as_array().is_some_and(|items| items.iter().all(Value::is_string)) {
                Ok(value)
            } else {
                Err(invalid("an array of strings"))
            }
        }
        FieldType::Json => Ok(value),
    }
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]` (UTC) or a bare `YYYY-MM-DD`
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
