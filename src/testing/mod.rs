//! In-memory `RecordStore` for unit tests.
//!
//! Evaluates the same `Filter` predicates the Postgres repository renders to SQL,
//! including casts, soft-delete guards, ordering and pagination.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::record::parse_timestamp;
use crate::database::store::{RecordStore, Row};
use crate::filter::types::{Cast, FilterOp, FilterWhereInfo, SortDirection};
use crate::filter::Filter;
use crate::report::schema::{RecordSchema, DELETED_AT, ID};

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    calls: AtomicUsize,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails, as if the database were down
    pub fn unavailable() -> Self {
        Self { unavailable: true, ..Self::default() }
    }

    /// Number of store operations issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    /// Seed rows directly, bypassing validation
    pub async fn seed(&self, table: &str, rows: Vec<Row>) {
        self.tables.write().await.entry(table.to_string()).or_default().extend(rows);
    }

    /// Every stored row of a table, including soft-deleted ones
    pub async fn raw_rows(&self, table: &str) -> Vec<Row> {
        self.tables.read().await.get(table).cloned().unwrap_or_default()
    }

    fn enter(&self) -> Result<(), DatabaseError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        if self.unavailable {
            return Err(DatabaseError::QueryError("connection refused".to_string()));
        }
        Ok(())
    }

    fn matching(rows: &[Row], filter: &Filter) -> Vec<Row> {
        rows.iter()
            .filter(|row| !filter.excludes_deleted() || is_live(row))
            .filter(|row| filter.conditions().iter().all(|c| matches(row, c)))
            .cloned()
            .collect()
    }

    fn full_row(schema: &RecordSchema, mut row: Row) -> Row {
        for column in schema.columns() {
            row.entry(column.to_string()).or_insert(Value::Null);
        }
        row
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select(&self, filter: &Filter) -> Result<Vec<Row>, DatabaseError> {
        self.enter()?;
        let tables = self.tables.read().await;
        let rows = tables.get(filter.table_name()).map(Vec::as_slice).unwrap_or_default();
        let mut found = Self::matching(rows, filter);

        found.sort_by(|a, b| {
            for order in filter.order_data() {
                let ord = compare_values(
                    a.get(&order.column).unwrap_or(&Value::Null),
                    b.get(&order.column).unwrap_or(&Value::Null),
                );
                let ord = match order.sort {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        let offset = filter.offset_value().unwrap_or(0).max(0) as usize;
        let limit = filter.limit_value().map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        let columns = filter.select_columns();

        Ok(found
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| {
                if columns.is_empty() {
                    row
                } else {
                    columns
                        .iter()
                        .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(Value::Null)))
                        .collect()
                }
            })
            .collect())
    }

    async fn count(&self, filter: &Filter) -> Result<i64, DatabaseError> {
        self.enter()?;
        let tables = self.tables.read().await;
        let rows = tables.get(filter.table_name()).map(Vec::as_slice).unwrap_or_default();
        Ok(Self::matching(rows, filter).len() as i64)
    }

    async fn find_by_id(&self, schema: &'static RecordSchema, id: Uuid) -> Result<Option<Row>, DatabaseError> {
        self.enter()?;
        let tables = self.tables.read().await;
        Ok(tables
            .get(schema.table)
            .and_then(|rows| rows.iter().find(|r| has_id(r, id) && (!schema.soft_delete() || is_live(r))))
            .cloned())
    }

    async fn insert(&self, schema: &'static RecordSchema, row: Row) -> Result<Row, DatabaseError> {
        self.enter()?;
        let mut tables = self.tables.write().await;
        let rows = tables.entry(schema.table.to_string()).or_default();
        let id = row.get(ID).cloned().unwrap_or(Value::Null);
        if rows.iter().any(|r| r.get(ID) == Some(&id)) {
            return Err(DatabaseError::Conflict(format!("{} {} already exists", schema.kind, id.as_str().unwrap_or("?"))));
        }
        let row = Self::full_row(schema, row);
        rows.push(row.clone());
        Ok(row)
    }

    async fn insert_ignore(&self, schema: &'static RecordSchema, batch: Vec<Row>) -> Result<u64, DatabaseError> {
        self.enter()?;
        let mut tables = self.tables.write().await;
        let rows = tables.entry(schema.table.to_string()).or_default();
        let mut seen: HashSet<String> = rows.iter().filter_map(|r| r.get(ID).map(Value::to_string)).collect();

        let mut inserted = 0;
        for row in batch {
            let key = row.get(ID).map(Value::to_string).unwrap_or_default();
            if !seen.insert(key) {
                continue;
            }
            rows.push(Self::full_row(schema, row));
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn update_by_id(
        &self,
        schema: &'static RecordSchema,
        id: Uuid,
        changes: Row,
    ) -> Result<Option<Row>, DatabaseError> {
        self.enter()?;
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(schema.table) else {
            return Ok(None);
        };
        let Some(row) = rows
            .iter_mut()
            .find(|r| has_id(r, id) && (!schema.soft_delete() || is_live(r)))
        else {
            return Ok(None);
        };
        row.extend(changes);
        Ok(Some(row.clone()))
    }

    async fn delete_by_id(&self, schema: &'static RecordSchema, id: Uuid) -> Result<bool, DatabaseError> {
        self.enter()?;
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(schema.table) else {
            return Ok(false);
        };

        if schema.soft_delete() {
            match rows.iter_mut().find(|r| has_id(r, id) && is_live(r)) {
                Some(row) => {
                    let now = Utc::now().to_rfc3339_opts(SecondsFormat::AutoSi, true);
                    row.insert(DELETED_AT.to_string(), Value::String(now));
                    Ok(true)
                }
                None => Ok(false),
            }
        } else {
            let before = rows.len();
            rows.retain(|r| !has_id(r, id));
            Ok(rows.len() < before)
        }
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.enter()
    }
}

fn has_id(row: &Row, id: Uuid) -> bool {
    row.get(ID).and_then(Value::as_str) == Some(id.to_string().as_str())
}

fn is_live(row: &Row) -> bool {
    row.get(DELETED_AT).map_or(true, Value::is_null)
}

fn matches(row: &Row, condition: &FilterWhereInfo) -> bool {
    let value = row.get(&condition.column).unwrap_or(&Value::Null);
    match condition.operator {
        FilterOp::Null => value.is_null(),
        _ if value.is_null() => false,
        FilterOp::Eq => compare_cast(value, &condition.data, condition.cast) == Some(Ordering::Equal),
        FilterOp::Gte => matches!(
            compare_cast(value, &condition.data, condition.cast),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOp::Lte => matches!(
            compare_cast(value, &condition.data, condition.cast),
            Some(Ordering::Less | Ordering::Equal)
        ),
        FilterOp::Between => match condition.data.as_array().map(Vec::as_slice) {
            Some([from, to]) => {
                matches!(compare_cast(value, from, condition.cast), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(compare_cast(value, to, condition.cast), Some(Ordering::Less | Ordering::Equal))
            }
            _ => false,
        },
    }
}

/// Compare a stored value against a bound parameter the way Postgres would after casting
fn compare_cast(stored: &Value, param: &Value, cast: Cast) -> Option<Ordering> {
    match cast {
        Cast::Param("double precision") | Cast::Param("bigint") => {
            let a = as_text(stored).parse::<f64>().ok()?;
            let b = as_text(param).parse::<f64>().ok()?;
            a.partial_cmp(&b)
        }
        Cast::Param("timestamptz") => {
            let a = parse_timestamp(&as_text(stored))?;
            let b = parse_timestamp(&as_text(param))?;
            Some(a.cmp(&b))
        }
        Cast::Param("uuid") => {
            let a = Uuid::parse_str(&as_text(stored)).ok()?;
            let b = Uuid::parse_str(&as_text(param)).ok()?;
            Some(a.cmp(&b))
        }
        Cast::Param("jsonb") => {
            let b: Value = serde_json::from_str(&as_text(param)).ok()?;
            (stored == &b).then_some(Ordering::Equal)
        }
        _ => Some(as_text(stored).cmp(&as_text(param))),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        // NULLS LAST
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => {
            x.as_f64().partial_cmp(&y.as_f64()).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => match (parse_timestamp(x), parse_timestamp(y)) {
            (Some(tx), Some(ty)) => tx.cmp(&ty),
            _ => x.cmp(y),
        },
        _ => as_text(a).cmp(&as_text(b)),
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
