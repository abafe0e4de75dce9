use serde_json::Value;
use sqlx::{self, postgres::PgArguments, postgres::PgRow, PgPool, Row as _};
use std::time::{Duration, Instant};

use crate::config::DatabaseConfig;
use crate::database::manager::DatabaseError;
use crate::database::store::Row;
use crate::filter::types::SqlResult;

/// Statement logging and slow-query thresholds, taken from `DatabaseConfig`
#[derive(Debug, Clone, Copy)]
pub struct QueryLogging {
    pub log_statements: bool,
    pub slow_threshold: Duration,
}

impl From<&DatabaseConfig> for QueryLogging {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            log_statements: config.enable_query_logging,
            slow_threshold: Duration::from_millis(config.slow_query_threshold_ms),
        }
    }
}

/// Executes one rendered statement against a pool, binding its parameters in order
pub struct QueryBuilder {
    sql: SqlResult,
    logging: QueryLogging,
}

impl QueryBuilder {
    pub fn new(sql: SqlResult, logging: QueryLogging) -> Self {
        Self { sql, logging }
    }

    /// Rows from a statement projecting a single JSON `row` column
    pub async fn fetch_rows(&self, pool: &PgPool) -> Result<Vec<Row>, DatabaseError> {
        let started = self.start();
        let rows = self.query().fetch_all(pool).await?;
        self.finish(started);
        rows.iter().map(row_object).collect()
    }

    pub async fn fetch_optional_row(&self, pool: &PgPool) -> Result<Option<Row>, DatabaseError> {
        let started = self.start();
        let row = self.query().fetch_optional(pool).await?;
        self.finish(started);
        row.as_ref().map(row_object).transpose()
    }

    /// Value of the `count` column of a single-row result
    pub async fn fetch_count(&self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let started = self.start();
        let row = self.query().fetch_one(pool).await?;
        self.finish(started);
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    /// Rows affected
    pub async fn execute(&self, pool: &PgPool) -> Result<u64, DatabaseError> {
        let started = self.start();
        let result = self.query().execute(pool).await?;
        self.finish(started);
        Ok(result.rows_affected())
    }

    fn query(&self) -> sqlx::query::Query<'_, sqlx::Postgres, PgArguments> {
        let mut q = sqlx::query(&self.sql.query);
        for p in self.sql.params.iter() {
            q = bind_param_query(q, p);
        }
        q
    }

    fn start(&self) -> Instant {
        if self.logging.log_statements {
            tracing::debug!(params = self.sql.params.len(), "SQL: {}", self.sql.query);
        }
        Instant::now()
    }

    fn finish(&self, started: Instant) {
        let elapsed = started.elapsed();
        if elapsed > self.logging.slow_threshold {
            tracing::warn!(elapsed_ms = elapsed.as_millis() as u64, "Slow query: {}", self.sql.query);
        }
    }
}

fn row_object(row: &PgRow) -> Result<Row, DatabaseError> {
    match row.try_get::<Value, _>("row")? {
        Value::Object(map) => Ok(map),
        other => Err(DatabaseError::QueryError(format!("expected a JSON object row, got {}", other))),
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        // Rows for jsonb_populate_record(set) travel as JSONB
        Value::Array(_) | Value::Object(_) => q.bind(v),
    }
}
