use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::filter::Filter;
use crate::report::schema::RecordSchema;

/// A stored row keyed by storage column name
pub type Row = Map<String, Value>;

/// Storage seam consumed by the report engine and the record service.
///
/// `select` and `count` must honour the same predicates from one `Filter`;
/// `count` ignores its order, limit and offset.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn select(&self, filter: &Filter) -> Result<Vec<Row>, DatabaseError>;

    async fn count(&self, filter: &Filter) -> Result<i64, DatabaseError>;

    /// Live (not soft-deleted) row by primary key
    async fn find_by_id(&self, schema: &'static RecordSchema, id: Uuid) -> Result<Option<Row>, DatabaseError>;

    async fn insert(&self, schema: &'static RecordSchema, row: Row) -> Result<Row, DatabaseError>;

    /// Insert every row whose id is not already present; returns how many were inserted
    async fn insert_ignore(&self, schema: &'static RecordSchema, rows: Vec<Row>) -> Result<u64, DatabaseError>;

    /// Apply the given columns to a live row; `None` when no such row
    async fn update_by_id(
        &self,
        schema: &'static RecordSchema,
        id: Uuid,
        row: Row,
    ) -> Result<Option<Row>, DatabaseError>;

    /// Soft-delete (or delete) a live row; false when no such row
    async fn delete_by_id(&self, schema: &'static RecordSchema, id: Uuid) -> Result<bool, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}
