use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
    Between,
    Null,
}

/// How a predicate reconciles a text parameter with the column type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cast {
    /// `"col" = $1`
    None,
    /// `"col" = $1::<type>`
    Param(&'static str),
    /// `"col"::text = $1`, for columns outside the mapping
    ColumnText,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: Value,
    pub cast: Cast,
}

impl FilterWhereInfo {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>, cast: Cast) -> Self {
        Self { column: column.into(), operator: FilterOp::Eq, data: value.into(), cast }
    }

    pub fn gte(column: impl Into<String>, value: impl Into<Value>, cast: Cast) -> Self {
        Self { column: column.into(), operator: FilterOp::Gte, data: value.into(), cast }
    }

    pub fn lte(column: impl Into<String>, value: impl Into<Value>, cast: Cast) -> Self {
        Self { column: column.into(), operator: FilterOp::Lte, data: value.into(), cast }
    }

    pub fn between(column: impl Into<String>, from: impl Into<Value>, to: impl Into<Value>, cast: Cast) -> Self {
        Self {
            column: column.into(),
            operator: FilterOp::Between,
            data: Value::Array(vec![from.into(), to.into()]),
            cast,
        }
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self { column: column.into(), operator: FilterOp::Null, data: Value::Null, cast: Cast::None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterWhereOptions {
    /// When false, `"deleted_at" IS NULL` leads every WHERE clause
    pub include_deleted: bool,
}

impl Default for FilterWhereOptions {
    fn default() -> Self {
        Self { include_deleted: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}
