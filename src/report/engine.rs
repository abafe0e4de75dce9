use serde::Serialize;
use std::sync::Arc;

use super::error::ReportError;
use super::params::{ReportParams, MAX_LIMIT};
use super::schema::{mapping_for, FieldMapping, FieldType, RecordSchema, Reportable, CREATED_AT, ID};
use crate::database::store::{RecordStore, Row};
use crate::filter::types::{Cast, FilterWhereInfo, SortDirection};
use crate::filter::Filter;

/// One page of a report listing, rows keyed by external field name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportResponse {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub data: Vec<Row>,
}

/// Executes report listings against any `Reportable` kind.
///
/// Stateless apart from the injected store; each call issues one data query and
/// one count query built from the same `Filter`.
#[derive(Clone)]
pub struct ReportEngine {
    store: Arc<dyn RecordStore>,
}

impl ReportEngine {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn run<R: Reportable>(&self, params: &ReportParams) -> Result<ReportResponse, ReportError> {
        self.run_schema(R::SCHEMA, params).await
    }

    pub async fn run_schema(
        &self,
        schema: &'static RecordSchema,
        params: &ReportParams,
    ) -> Result<ReportResponse, ReportError> {
        let mapping = mapping_for(schema)?;
        let filter = Self::build_filter(schema, &mapping, params)?;

        tracing::debug!(
            "Report {} page={} limit={} conditions={}",
            schema.slug,
            params.page,
            filter.limit_value().unwrap_or_default(),
            filter.conditions().len()
        );

        let (rows, total) = futures::try_join!(self.store.select(&filter), self.store.count(&filter))?;

        Ok(ReportResponse {
            total,
            page: params.page.max(1),
            limit: filter.limit_value().unwrap_or(MAX_LIMIT),
            data: rows.into_iter().map(|row| mapping.to_external(row)).collect(),
        })
    }

    /// Translate a descriptor into the shared data/count `Filter`. Pure; touches no storage.
    pub fn build_filter(
        schema: &'static RecordSchema,
        mapping: &FieldMapping,
        params: &ReportParams,
    ) -> Result<Filter, ReportError> {
        let mut filter = Filter::new(schema.table)?;

        // Unknown projected names are dropped
        let columns: Vec<String> = params
            .fields
            .iter()
            .filter_map(|external| mapping.column_for(external))
            .map(str::to_string)
            .collect();
        filter.select(columns)?;
        filter.exclude_deleted(schema.soft_delete());

        if let Some(condition) = date_condition(schema, mapping, params) {
            filter.where_condition(condition);
        }

        for (external, value) in &params.filters {
            let condition = match mapping.field(external) {
                Some(field) => FilterWhereInfo::eq(field.column, value.as_str(), cast_for(field.ty)),
                None => FilterWhereInfo::eq(external.as_str(), value.as_str(), Cast::ColumnText),
            };
            filter.where_condition(condition);
        }

        if schema.has_column(CREATED_AT) {
            filter.order(CREATED_AT, SortDirection::Asc);
        }
        filter.order(ID, SortDirection::Asc);

        let limit = params.limit.clamp(1, MAX_LIMIT);
        if limit != params.limit {
            tracing::debug!("Clamping report limit {} to {}", params.limit, limit);
        }
        let page = params.page.max(1);
        filter.limit(limit, Some((page - 1).saturating_mul(limit)))?;

        Ok(filter)
    }
}

fn cast_for(ty: FieldType) -> Cast {
    ty.sql_cast().map(Cast::Param).unwrap_or(Cast::None)
}

/// Date-range predicate on the configured column, if either bound is present.
///
/// The column resolves through the mapping first, then as a storage column of the
/// schema, and finally verbatim; unknown columns compare as `timestamptz`.
fn date_condition(
    schema: &'static RecordSchema,
    mapping: &FieldMapping,
    params: &ReportParams,
) -> Option<FilterWhereInfo> {
    let (column, cast) = match mapping
        .field(&params.date_column)
        .or_else(|| schema.field_by_column(&params.date_column))
    {
        Some(field) => (field.column.to_string(), cast_for(field.ty)),
        None => (params.date_column.clone(), Cast::Param("timestamptz")),
    };

    match (&params.from_date, &params.to_date) {
        (Some(from), Some(to)) => Some(FilterWhereInfo::between(column, from.as_str(), to.as_str(), cast)),
        (Some(from), None) => Some(FilterWhereInfo::gte(column, from.as_str(), cast)),
        (None, Some(to)) => Some(FilterWhereInfo::lte(column, to.as_str(), cast)),
        (None, None) => None,
    }
}
