//! Selector evaluation for the stores' rich-query cursor.
//!
//! Only the subset the query pipeline emits is understood: a
//! `{"selector": {...}}` object whose fields are scalars matched by exact
//! equality. All fields must match.

use super::error::StoreError;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    fields: Vec<(String, Value)>,
}

impl Selector {
    pub fn parse(query: &str) -> Result<Self, StoreError> {
        let query: Value = serde_json::from_str(query)
            .map_err(|e| StoreError::MalformedQuery(format!("query is not JSON: {e}")))?;

        let Value::Object(mut clauses) = query else {
            return Err(malformed("query must be a JSON object"));
        };
        let selector = clauses
            .remove("selector")
            .ok_or_else(|| malformed("query has no selector clause"))?;
        if let Some(clause) = clauses.keys().next() {
            return Err(StoreError::MalformedQuery(format!(
                "unsupported query clause {clause:?}"
            )));
        }
        let Value::Object(selector) = selector else {
            return Err(malformed("selector must be a JSON object"));
        };

        let mut fields = Vec::with_capacity(selector.len());
        for (field, expected) in selector {
            if field.starts_with('$') {
                return Err(StoreError::MalformedQuery(format!(
                    "combination operator {field:?} is not supported"
                )));
            }
            fields.push((field, equality_operand(expected)?));
        }
        Ok(Self { fields })
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn equality_operand(expected: Value) -> Result<Value, StoreError> {
    match expected {
        Value::Object(_) => Err(malformed("operator objects are not supported in a selector")),
        Value::Array(_) => Err(malformed("array values are not supported in a selector")),
        scalar => Ok(scalar),
    }
}

fn malformed(reason: &str) -> StoreError {
    StoreError::MalformedQuery(reason.to_string())
}
