use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::record::{Operation, Record, RecordError};
use crate::database::store::{RecordStore, Row};
use crate::report::error::ReportError;
use crate::report::schema::{mapping_for, RecordSchema};

/// Caller identity stamped onto submitter fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub received: usize,
    pub inserted: u64,
}

/// Single-record operations shared by every report kind.
///
/// Payloads and responses use external field names; storage rows never leave this type.
#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn RecordStore>,
}

impl RecordService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        schema: &'static RecordSchema,
        payload: Value,
        identity: &Identity,
    ) -> Result<Row, ReportError> {
        let mut record = Record::from_api_input(schema, payload, Operation::Create)?;
        record.stamp_submitter(&identity.name, &identity.phone);

        let row = self.store.insert(schema, record.into_row()).await?;
        tracing::info!("Created {} record {}", schema.slug, describe_id(&row));
        external(schema, row)
    }

    pub async fn get(&self, schema: &'static RecordSchema, id: &str) -> Result<Row, ReportError> {
        let id = parse_id(id)?;
        match self.store.find_by_id(schema, id).await? {
            Some(row) => external(schema, row),
            None => Err(not_found(schema, id)),
        }
    }

    /// Partial update: only the supplied fields change
    pub async fn update(
        &self,
        schema: &'static RecordSchema,
        id: &str,
        payload: Value,
    ) -> Result<Row, ReportError> {
        let id = parse_id(id)?;
        let record = Record::from_api_input(schema, payload, Operation::Update)?;

        match self.store.update_by_id(schema, id, record.into_row()).await? {
            Some(row) => {
                tracing::info!("Updated {} record {}", schema.slug, id);
                external(schema, row)
            }
            None => Err(not_found(schema, id)),
        }
    }

    pub async fn delete(&self, schema: &'static RecordSchema, id: &str) -> Result<(), ReportError> {
        let id = parse_id(id)?;
        if self.store.delete_by_id(schema, id).await? {
            tracing::info!("Deleted {} record {}", schema.slug, id);
            Ok(())
        } else {
            Err(not_found(schema, id))
        }
    }

    /// Insert every entry, skipping ids that already exist. Nothing is written
    /// unless every entry validates.
    pub async fn batch_create(
        &self,
        schema: &'static RecordSchema,
        payload: Value,
        identity: &Identity,
    ) -> Result<BatchOutcome, ReportError> {
        let Value::Array(entries) = payload else {
            return Err(RecordError::InvalidJson("Expected JSON array".to_string()).into());
        };

        let received = entries.len();
        let mut rows = Vec::with_capacity(received);
        for entry in entries {
            let mut record = Record::from_api_input(schema, entry, Operation::Create)?;
            record.stamp_submitter(&identity.name, &identity.phone);
            rows.push(record.into_row());
        }

        let inserted = self.store.insert_ignore(schema, rows).await?;
        tracing::info!(
            "Batch {}: {} received, {} inserted, {} skipped",
            schema.slug,
            received,
            inserted,
            received as u64 - inserted.min(received as u64)
        );
        Ok(BatchOutcome { received, inserted })
    }
}

pub fn parse_id(raw: &str) -> Result<Uuid, ReportError> {
    Uuid::parse_str(raw).map_err(|_| ReportError::invalid_parameter("id", raw, "must be a UUID"))
}

fn not_found(schema: &RecordSchema, id: Uuid) -> ReportError {
    ReportError::NotFound(format!("{} {}", schema.kind, id))
}

fn external(schema: &'static RecordSchema, row: Row) -> Result<Row, ReportError> {
    Ok(mapping_for(schema)?.to_external(row))
}

fn describe_id(row: &Row) -> &str {
    row.get("id").and_then(Value::as_str).unwrap_or("?")
}
