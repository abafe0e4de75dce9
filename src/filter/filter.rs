use super::error::FilterError;
use super::filter_where::{quote_identifier, FilterWhere};
use super::types::{FilterOrderInfo, FilterWhereInfo, FilterWhereOptions, SortDirection, SqlResult};

/// Single-table query description. Data and count statements share one WHERE renderer.
#[derive(Debug, Clone)]
pub struct Filter {
    table_name: String,
    select_columns: Vec<String>,
    conditions: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i64>,
    offset: Option<i64>,
    options: FilterWhereOptions,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            select_columns: vec![],
            conditions: vec![],
            order_data: vec![],
            limit: None,
            offset: None,
            options: FilterWhereOptions::default(),
        })
    }

    /// Restrict the projection. An empty list selects every column.
    pub fn select(&mut self, columns: Vec<String>) -> Result<&mut Self, FilterError> {
        if let Some(empty) = columns.iter().find(|c| c.is_empty()) {
            return Err(FilterError::InvalidColumn(format!("Column name cannot be empty: {:?}", empty)));
        }
        self.select_columns = columns;
        Ok(self)
    }

    pub fn where_condition(&mut self, condition: FilterWhereInfo) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    pub fn exclude_deleted(&mut self, exclude: bool) -> &mut Self {
        self.options.include_deleted = !exclude;
        self
    }

    pub fn order(&mut self, column: impl Into<String>, sort: SortDirection) -> &mut Self {
        self.order_data.push(FilterOrderInfo { column: column.into(), sort });
        self
    }

    pub fn limit(&mut self, limit: i64, offset: Option<i64>) -> Result<&mut Self, FilterError> {
        if limit < 0 {
            return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string()));
        }
        if offset.is_some_and(|o| o < 0) {
            return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string()));
        }
        self.limit = Some(limit);
        self.offset = offset;
        Ok(self)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn select_columns(&self) -> &[String] {
        &self.select_columns
    }

    pub fn conditions(&self) -> &[FilterWhereInfo] {
        &self.conditions
    }

    pub fn order_data(&self) -> &[FilterOrderInfo] {
        &self.order_data
    }

    pub fn excludes_deleted(&self) -> bool {
        !self.options.include_deleted
    }

    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<i64> {
        self.offset
    }

    /// Plain column select: `SELECT "a", "b" FROM "t" WHERE ...`
    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let select_clause = if self.select_columns.is_empty() {
            "*".to_string()
        } else {
            self.select_columns.iter().map(|c| quote_identifier(c)).collect::<Vec<_>>().join(", ")
        };
        self.build_select(&select_clause, "")
    }

    /// One JSON object per row in a `row` column, keyed by storage column
    pub fn to_json_sql(&self) -> Result<SqlResult, FilterError> {
        let select_clause = if self.select_columns.is_empty() {
            "row_to_json(t) AS row".to_string()
        } else {
            let pairs = self
                .select_columns
                .iter()
                .map(|c| format!("'{}', t.{}", c.replace('\'', "''"), quote_identifier(c)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("json_build_object({}) AS row", pairs)
        };
        self.build_select(&select_clause, " AS t")
    }

    pub fn to_where_sql(&self) -> Result<SqlResult, FilterError> {
        let (query, params) = FilterWhere::generate(&self.conditions, 0, &self.options)?;
        Ok(SqlResult { query, params })
    }

    /// Count over the same predicates, ignoring order and pagination
    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql()?;
        let query = format!(
            "SELECT COUNT(*) AS count FROM {} WHERE {}",
            quote_identifier(&self.table_name),
            where_result.query
        );
        Ok(SqlResult { query, params: where_result.params })
    }

    fn build_select(&self, select_clause: &str, alias: &str) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql()?;
        let query = [
            format!("SELECT {}", select_clause),
            format!("FROM {}{}", quote_identifier(&self.table_name), alias),
            format!("WHERE {}", where_result.query),
            self.build_order_clause(),
            self.build_limit_clause(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params: where_result.params })
    }

    fn build_order_clause(&self) -> String {
        if self.order_data.is_empty() {
            return String::new();
        }
        let parts = self
            .order_data
            .iter()
            .map(|o| format!("{} {}", quote_identifier(&o.column), o.sort.to_sql()))
            .collect::<Vec<_>>();
        format!("ORDER BY {}", parts.join(", "))
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, Some(o)) => format!("OFFSET {}", o),
            (None, None) => String::new(),
        }
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        let mut chars = name.chars();
        let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {:?}", name)));
        }
        Ok(())
    }
}
