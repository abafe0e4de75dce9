use serde_json::Value;

use super::error::FilterError;
use super::types::{Cast, FilterOp, FilterWhereInfo, FilterWhereOptions};
use crate::report::schema::DELETED_AT;

/// Renders a list of predicates into one WHERE clause with `$n` placeholders
pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Returns the clause (without the `WHERE` keyword, `1=1` when empty) and its bound values
    pub fn generate(
        conditions: &[FilterWhereInfo],
        starting_param_index: usize,
        options: &FilterWhereOptions,
    ) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(conditions, options)
    }

    fn build(
        &mut self,
        conditions: &[FilterWhereInfo],
        options: &FilterWhereOptions,
    ) -> Result<(String, Vec<Value>), FilterError> {
        let mut sql_conditions = vec![];
        if !options.include_deleted {
            sql_conditions.push(format!("{} IS NULL", quote_identifier(DELETED_AT)));
        }
        for condition in conditions {
            sql_conditions.push(self.build_sql_condition(condition)?);
        }

        let where_clause = if sql_conditions.is_empty() {
            "1=1".to_string()
        } else {
            sql_conditions.join(" AND ")
        };
        Ok((where_clause, std::mem::take(&mut self.param_values)))
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let column = match condition.cast {
            Cast::ColumnText => format!("{}::text", quote_identifier(&condition.column)),
            _ => quote_identifier(&condition.column),
        };

        match condition.operator {
            FilterOp::Null => Ok(format!("{} IS NULL", column)),
            FilterOp::Eq => {
                if condition.data.is_null() {
                    Ok(format!("{} IS NULL", column))
                } else {
                    Ok(format!("{} = {}", column, self.param(condition.data.clone(), condition.cast)))
                }
            }
            FilterOp::Gte => Ok(format!("{} >= {}", column, self.param(condition.data.clone(), condition.cast))),
            FilterOp::Lte => Ok(format!("{} <= {}", column, self.param(condition.data.clone(), condition.cast))),
            FilterOp::Between => match &condition.data {
                Value::Array(values) if values.len() == 2 => {
                    let from = self.param(values[0].clone(), condition.cast);
                    let to = self.param(values[1].clone(), condition.cast);
                    Ok(format!("{} BETWEEN {} AND {}", column, from, to))
                }
                _ => Err(FilterError::InvalidOperatorData(format!(
                    "BETWEEN on {} requires exactly 2 values",
                    condition.column
                ))),
            },
        }
    }

    fn param(&mut self, value: Value, cast: Cast) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        match cast {
            Cast::Param(ty) => format!("${}::{}", self.param_index, ty),
            Cast::None | Cast::ColumnText => format!("${}", self.param_index),
        }
    }
}

/// Double-quote an identifier, doubling embedded quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
