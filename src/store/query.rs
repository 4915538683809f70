use serde_json::Value;
use std::cmp::Ordering;

use crate::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Query over a single collection: equality filters plus ordering
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    /// Field must equal the value
    pub filters: Vec<(String, Value)>,
    /// Applied in sequence; later entries break ties of earlier ones
    pub order_by: Vec<(String, Direction)>,
}

impl Query {
    pub fn collection(name: &str) -> Self {
        Self {
            collection: name.to_string(),
            filters: Vec::new(),
            order_by: Vec::new(),
        }
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by.push((field.to_string(), direction));
        self
    }

    /// Whether a document is part of the result set.
    ///
    /// Like the hosted store, documents missing an ordered field are
    /// excluded.
    pub fn matches(&self, doc: &Document) -> bool {
        let filters_hold = self
            .filters
            .iter()
            .all(|(field, expected)| doc.fields.get(field) == Some(expected));
        let ordered_present = self
            .order_by
            .iter()
            .all(|(field, _)| doc.fields.contains_key(field));

        filters_hold && ordered_present
    }

    /// Result ordering between two matching documents
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        for (field, direction) in &self.order_by {
            let ordering = compare_values(
                a.fields.get(field).unwrap_or(&Value::Null),
                b.fields.get(field).unwrap_or(&Value::Null),
            );
            let ordering = match direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: null < bool < number < string < array < map
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (left, right) in x.iter().zip(y) {
                let ordering = compare_values(left, right);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
