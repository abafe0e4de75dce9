use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// External name marking a column as internal-only (never mapped, never addressable)
pub const INTERNAL: &str = "-";

pub const ID: &str = "id";
pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";
pub const DELETED_AT: &str = "deleted_at";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Schema '{schema}': duplicate external name '{name}'")]
    DuplicateExternal { schema: &'static str, name: &'static str },

    #[error("Schema '{schema}': duplicate storage column '{column}'")]
    DuplicateColumn { schema: &'static str, column: &'static str },

    #[error("Schema '{schema}': invalid identifier '{name}'")]
    InvalidIdentifier { schema: &'static str, name: &'static str },

    #[error("Schema '{schema}': missing primary key column 'id'")]
    MissingPrimaryKey { schema: &'static str },
}

/// Semantic type of a report field, used for payload validation and predicate casts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Integer,
    Timestamp,
    Uuid,
    TextArray,
    Json,
}

impl FieldType {
    /// Postgres type a bound text parameter is cast to before comparison.
    /// `None` compares as text.
    pub fn sql_cast(self) -> Option<&'static str> {
        match self {
            FieldType::Text => None,
            FieldType::Number => Some("double precision"),
            FieldType::Integer => Some("bigint"),
            FieldType::Timestamp => Some("timestamptz"),
            FieldType::Uuid => Some("uuid"),
            FieldType::TextArray => Some("text[]"),
            FieldType::Json => Some("jsonb"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Timestamp => "timestamp",
            FieldType::Uuid => "uuid",
            FieldType::TextArray => "text[]",
            FieldType::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub external: &'static str,
    pub column: &'static str,
    #[serde(rename = "type")]
    pub ty: FieldType,
    pub required: bool,
}

impl FieldDef {
    pub const fn new(external: &'static str, column: &'static str, ty: FieldType) -> Self {
        Self { external, column, ty, required: false }
    }

    pub const fn text(external: &'static str, column: &'static str) -> Self {
        Self::new(external, column, FieldType::Text)
    }

    pub const fn number(external: &'static str, column: &'static str) -> Self {
        Self::new(external, column, FieldType::Number)
    }

    pub const fn integer(external: &'static str, column: &'static str) -> Self {
        Self::new(external, column, FieldType::Integer)
    }

    pub const fn timestamp(external: &'static str, column: &'static str) -> Self {
        Self::new(external, column, FieldType::Timestamp)
    }

    pub const fn uuid(external: &'static str, column: &'static str) -> Self {
        Self::new(external, column, FieldType::Uuid)
    }

    pub const fn text_array(external: &'static str, column: &'static str) -> Self {
        Self::new(external, column, FieldType::TextArray)
    }

    pub const fn json(external: &'static str, column: &'static str) -> Self {
        Self::new(external, column, FieldType::Json)
    }

    /// Column kept in storage but hidden from the API
    pub const fn internal(column: &'static str, ty: FieldType) -> Self {
        Self::new(INTERNAL, column, ty)
    }

    pub const fn required(self) -> Self {
        Self { required: true, ..self }
    }

    pub fn is_internal(&self) -> bool {
        self.external.is_empty() || self.external == INTERNAL
    }
}

/// Payload fields overwritten with the caller's identity on create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitterFields {
    pub name: &'static str,
    pub phone: &'static str,
}

/// Compile-time description of one report kind
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct RecordSchema {
    pub kind: &'static str,
    pub slug: &'static str,
    pub table: &'static str,
    pub fields: &'static [FieldDef],
    pub submitter: SubmitterFields,
}

impl RecordSchema {
    pub fn field_by_external(&self, external: &str) -> Option<&'static FieldDef> {
        self.fields
            .iter()
            .find(|f| !f.is_internal() && f.external == external)
    }

    pub fn field_by_column(&self, column: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.column == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.field_by_column(column).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.column)
    }

    /// Rows are hidden instead of removed when the table carries `deleted_at`
    pub fn soft_delete(&self) -> bool {
        self.has_column(DELETED_AT)
    }

    pub fn is_submitter_field(&self, external: &str) -> bool {
        external == self.submitter.name || external == self.submitter.phone
    }
}

/// Capability implemented by every report kind: exposes its field table
pub trait Reportable: Send + Sync + 'static {
    const SCHEMA: &'static RecordSchema;
}

/// Bidirectional external-name <-> storage-column mapping for one schema.
///
/// Internal-only fields are excluded. Built once per schema and shared.
#[derive(Debug)]
pub struct FieldMapping {
    schema: &'static RecordSchema,
    by_external: HashMap<&'static str, &'static FieldDef>,
    by_column: HashMap<&'static str, &'static FieldDef>,
}

impl FieldMapping {
    pub fn build(schema: &'static RecordSchema) -> Result<Self, SchemaError> {
        if !is_identifier(schema.table) {
            return Err(SchemaError::InvalidIdentifier { schema: schema.kind, name: schema.table });
        }
        if !schema.has_column(ID) {
            return Err(SchemaError::MissingPrimaryKey { schema: schema.kind });
        }

        let mut by_external = HashMap::new();
        let mut by_column = HashMap::new();
        let mut seen_columns = Vec::with_capacity(schema.fields.len());

        for field in schema.fields {
            if !is_identifier(field.column) {
                return Err(SchemaError::InvalidIdentifier { schema: schema.kind, name: field.column });
            }
            if seen_columns.contains(&field.column) {
                return Err(SchemaError::DuplicateColumn { schema: schema.kind, column: field.column });
            }
            seen_columns.push(field.column);

            if field.is_internal() {
                continue;
            }
            if field.external.chars().any(char::is_whitespace) {
                return Err(SchemaError::InvalidIdentifier { schema: schema.kind, name: field.external });
            }
            if by_external.insert(field.external, field).is_some() {
                return Err(SchemaError::DuplicateExternal { schema: schema.kind, name: field.external });
            }
            by_column.insert(field.column, field);
        }

        Ok(Self { schema, by_external, by_column })
    }

    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    pub fn field(&self, external: &str) -> Option<&'static FieldDef> {
        self.by_external.get(external).copied()
    }

    pub fn column_for(&self, external: &str) -> Option<&'static str> {
        self.field(external).map(|f| f.column)
    }

    pub fn external_for(&self, column: &str) -> Option<&'static str> {
        self.by_column.get(column).map(|f| f.external)
    }

    pub fn len(&self) -> usize {
        self.by_external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_external.is_empty()
    }

    /// Mapped fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        self.schema.fields.iter().filter(|f| !f.is_internal())
    }

    /// Re-key a storage row by external names. Unmapped columns pass through.
    pub fn to_external(&self, row: Map<String, Value>) -> Map<String, Value> {
        row.into_iter()
            .map(|(column, value)| match self.external_for(&column) {
                Some(external) => (external.to_string(), value),
                None => (column, value),
            })
            .collect()
    }
}

static MAPPINGS: Lazy<RwLock<HashMap<&'static str, Arc<FieldMapping>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Cached mapping for a schema, built at most once per process
pub fn mapping_for(schema: &'static RecordSchema) -> Result<Arc<FieldMapping>, SchemaError> {
    // Fast path: read lock
    {
        let cache = MAPPINGS.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(mapping) = cache.get(schema.table) {
            return Ok(mapping.clone());
        }
    }

    let mut cache = MAPPINGS.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(mapping) = cache.get(schema.table) {
        return Ok(mapping.clone());
    }

    let mapping = Arc::new(FieldMapping::build(schema)?);
    tracing::debug!("Built field mapping for {} ({} fields)", schema.table, mapping.len());
    cache.insert(schema.table, mapping.clone());
    Ok(mapping)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
