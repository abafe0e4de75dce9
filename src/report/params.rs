use serde::Serialize;
use std::collections::BTreeMap;

use super::error::ReportError;
use super::schema::CREATED_AT;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 1000;
pub const DEFAULT_DATE_COLUMN: &str = CREATED_AT;

/// Query keys consumed by the parser; every other key becomes an equality filter
pub const RESERVED_PARAMS: [&str; 6] = ["page", "limit", "fields", "fromDate", "toDate", "dateColumn"];

/// Parsed report listing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportParams {
    pub page: i64,
    pub limit: i64,
    pub fields: Vec<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub date_column: String,
    pub filters: BTreeMap<String, String>,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            fields: Vec::new(),
            from_date: None,
            to_date: None,
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            filters: BTreeMap::new(),
        }
    }
}

impl ReportParams {
    /// Parse raw query pairs. Repeated keys keep their first value.
    pub fn parse<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, ReportError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut first: BTreeMap<String, String> = BTreeMap::new();
        for (key, value) in pairs {
            first
                .entry(key.as_ref().to_string())
                .or_insert_with(|| value.as_ref().to_string());
        }

        let mut params = Self::default();

        if let Some(raw) = first.get("page").filter(|s| !s.is_empty()) {
            params.page = parse_positive("page", raw)?;
        }

        if let Some(raw) = first.get("limit").filter(|s| !s.is_empty()) {
            let limit = parse_positive("limit", raw)?;
            if limit > MAX_LIMIT {
                tracing::debug!("Limit {} exceeds max {}, capping", limit, MAX_LIMIT);
            }
            params.limit = limit.min(MAX_LIMIT);
        }

        if let Some(raw) = first.get("fields") {
            params.fields = raw
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect();
        }

        params.from_date = first.get("fromDate").map(|s| s.trim()).filter(|s| !s.is_empty()).map(str::to_string);
        params.to_date = first.get("toDate").map(|s| s.trim()).filter(|s| !s.is_empty()).map(str::to_string);

        if let Some(raw) = first.get("dateColumn").filter(|s| !s.is_empty()) {
            params.date_column = raw.trim().to_string();
        }

        for (key, value) in first {
            if RESERVED_PARAMS.contains(&key.as_str()) {
                continue;
            }
            let value = value.trim();
            if !value.is_empty() {
                params.filters.insert(key, value.to_string());
            }
        }

        Ok(params)
    }

    /// Parse then validate in one step
    pub fn from_query<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, ReportError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::parse(pairs)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&mut self) -> Result<(), ReportError> {
        if self.page < 1 {
            return Err(ReportError::validation("page must be greater than 0"));
        }
        if self.limit < 1 {
            return Err(ReportError::validation("limit must be greater than 0"));
        }
        if self.limit > MAX_LIMIT {
            return Err(ReportError::validation(format!("limit cannot exceed {}", MAX_LIMIT)));
        }
        if self.from_date.as_deref().is_some_and(|d| d.len() < 10) {
            return Err(ReportError::validation("fromDate must be in YYYY-MM-DD format"));
        }
        if self.to_date.as_deref().is_some_and(|d| d.len() < 10) {
            return Err(ReportError::validation("toDate must be in YYYY-MM-DD format"));
        }
        if self.date_column.is_empty() {
            self.date_column = DEFAULT_DATE_COLUMN.to_string();
        }
        Ok(())
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit.max(0))
    }

    pub fn has_date_filter(&self) -> bool {
        self.from_date.is_some() || self.to_date.is_some()
    }

    pub fn has_filters(&self) -> bool {
        self.has_date_filter() || !self.filters.is_empty()
    }
}

fn parse_positive(name: &'static str, raw: &str) -> Result<i64, ReportError> {
    let value: i64 = raw
        .parse()
        .map_err(|_| ReportError::invalid_parameter(name, raw, "must be a number"))?;
    if value < 1 {
        return Err(ReportError::invalid_parameter(name, value.to_string(), "must be greater than 0"));
    }
    Ok(value)
}
