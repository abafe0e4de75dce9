use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::query_builder::{QueryBuilder, QueryLogging};
use crate::database::store::{RecordStore, Row};
use crate::filter::types::{Cast, FilterWhereInfo, SqlResult};
use crate::filter::{quote_identifier, Filter};
use crate::report::schema::{RecordSchema, DELETED_AT, ID};

/// Postgres-backed `RecordStore`.
///
/// Rows are read with `row_to_json` and written through `jsonb_populate_record(set)`,
/// so column typing stays with the table definition.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
    logging: QueryLogging,
}

impl PgRepository {
    pub fn new(pool: PgPool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            logging: QueryLogging::from(config),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn builder(&self, sql: SqlResult) -> QueryBuilder {
        QueryBuilder::new(sql, self.logging)
    }

    fn id_filter(schema: &RecordSchema, id: Uuid) -> Result<Filter, DatabaseError> {
        let mut filter = Filter::new(schema.table)?;
        filter
            .exclude_deleted(schema.soft_delete())
            .where_condition(FilterWhereInfo::eq(ID, id.to_string(), Cast::Param("uuid")));
        filter.limit(1, None)?;
        Ok(filter)
    }

    /// `AND "deleted_at" IS NULL` for soft-delete tables, empty otherwise
    fn live_guard(schema: &RecordSchema) -> String {
        if schema.soft_delete() {
            format!(" AND {} IS NULL", quote_identifier(DELETED_AT))
        } else {
            String::new()
        }
    }
}

#[async_trait]
impl RecordStore for PgRepository {
    async fn select(&self, filter: &Filter) -> Result<Vec<Row>, DatabaseError> {
        let sql = filter.to_json_sql()?;
        self.builder(sql).fetch_rows(&self.pool).await
    }

    async fn count(&self, filter: &Filter) -> Result<i64, DatabaseError> {
        let sql = filter.to_count_sql()?;
        self.builder(sql).fetch_count(&self.pool).await
    }

    async fn find_by_id(&self, schema: &'static RecordSchema, id: Uuid) -> Result<Option<Row>, DatabaseError> {
        let sql = Self::id_filter(schema, id)?.to_json_sql()?;
        self.builder(sql).fetch_optional_row(&self.pool).await
    }

    async fn insert(&self, schema: &'static RecordSchema, row: Row) -> Result<Row, DatabaseError> {
        let columns = column_list(row.keys());
        let table = quote_identifier(schema.table);
        let query = format!(
            "WITH inserted AS (\
             INSERT INTO {table} ({columns}) \
             SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1) \
             RETURNING *) \
             SELECT row_to_json(inserted) AS row FROM inserted"
        );
        let sql = SqlResult { query, params: vec![Value::Object(row)] };

        self.builder(sql)
            .fetch_optional_row(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::QueryError(format!("insert into {} returned no row", schema.table)))
    }

    async fn insert_ignore(&self, schema: &'static RecordSchema, rows: Vec<Row>) -> Result<u64, DatabaseError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let keys: BTreeSet<&String> = rows.iter().flat_map(|r| r.keys()).collect();
        let columns = column_list(keys.into_iter());
        let table = quote_identifier(schema.table);
        let query = format!(
            "WITH inserted AS (\
             INSERT INTO {table} ({columns}) \
             SELECT {columns} FROM jsonb_populate_recordset(NULL::{table}, $1) \
             ON CONFLICT ({id}) DO NOTHING \
             RETURNING {id}) \
             SELECT COUNT(*) AS count FROM inserted",
            id = quote_identifier(ID),
        );
        let payload = Value::Array(rows.into_iter().map(Value::Object).collect());
        let sql = SqlResult { query, params: vec![payload] };

        let inserted = self.builder(sql).fetch_count(&self.pool).await?;
        Ok(inserted.max(0) as u64)
    }

    async fn update_by_id(
        &self,
        schema: &'static RecordSchema,
        id: Uuid,
        row: Row,
    ) -> Result<Option<Row>, DatabaseError> {
        if row.is_empty() {
            return self.find_by_id(schema, id).await;
        }

        let columns = column_list(row.keys());
        let table = quote_identifier(schema.table);
        // A single-column SET cannot use the row-constructor form
        let target = if row.len() == 1 { columns.clone() } else { format!("({})", columns) };
        let query = format!(
            "WITH updated AS (\
             UPDATE {table} SET {target} = (SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1)) \
             WHERE {id} = $2::uuid{guard} \
             RETURNING *) \
             SELECT row_to_json(updated) AS row FROM updated",
            id = quote_identifier(ID),
            guard = Self::live_guard(schema),
        );
        let sql = SqlResult {
            query,
            params: vec![Value::Object(row), Value::String(id.to_string())],
        };

        self.builder(sql).fetch_optional_row(&self.pool).await
    }

    async fn delete_by_id(&self, schema: &'static RecordSchema, id: Uuid) -> Result<bool, DatabaseError> {
        let table = quote_identifier(schema.table);
        let id_column = quote_identifier(ID);
        let query = if schema.soft_delete() {
            format!(
                "UPDATE {table} SET {deleted} = NOW() WHERE {id_column} = $1::uuid{guard}",
                deleted = quote_identifier(DELETED_AT),
                guard = Self::live_guard(schema),
            )
        } else {
            format!("DELETE FROM {table} WHERE {id_column} = $1::uuid")
        };
        let sql = SqlResult { query, params: vec![Value::String(id.to_string())] };

        let affected = self.builder(sql).execute(&self.pool).await?;
        Ok(affected > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

fn column_list<'a>(columns: impl Iterator<Item = &'a String>) -> String {
    columns.map(|c| quote_identifier(c)).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Contractor, DairySite};
    use crate::report::schema::Reportable;

    #[test]
    fn test_id_filter_guards_soft_deleted_rows() {
        let filter = PgRepository::id_filter(Contractor::SCHEMA, Uuid::nil()).unwrap();
        let sql = filter.to_json_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT row_to_json(t) AS row FROM \"contractors\" AS t \
             WHERE \"deleted_at\" IS NULL AND \"id\" = $1::uuid LIMIT 1"
        );
        assert_eq!(sql.params, vec![Value::String(Uuid::nil().to_string())]);
    }

    #[test]
    fn test_live_guard() {
        assert_eq!(PgRepository::live_guard(DairySite::SCHEMA), " AND \"deleted_at\" IS NULL");
    }

    #[test]
    fn test_column_list_quotes_each_column() {
        let cols = vec!["id".to_string(), "site_name".to_string()];
        assert_eq!(column_list(cols.iter()), "\"id\", \"site_name\"");
    }
}
