//! List queries: paging, equality criteria and ordering.
//!
//! Criteria and sort keys address the array form of a record with dotted
//! paths, e.g. `billing.lastName` or `shop.id`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Direction of one sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Parameters of a list operation.
///
/// ```rust
/// use customer_resource::resource::{ListQuery, SortDirection};
///
/// let query = ListQuery::new()
///     .filter("active", true)
///     .order_by("billing.lastName", SortDirection::Asc)
///     .offset(10)
///     .limit(5);
/// assert_eq!(query.limit, Some(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub offset: usize,
    /// Page size; the configured list limit applies when unset
    pub limit: Option<usize>,
    /// Path/value pairs that must all match
    pub criteria: Vec<(String, Value)>,
    /// Sort keys, most significant first
    pub order_by: Vec<(String, SortDirection)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filter(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.criteria.push((path.into(), value.into()));
        self
    }

    pub fn order_by(mut self, path: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push((path.into(), direction));
        self
    }

    /// Check whether an array-form record satisfies every criterion.
    pub(crate) fn matches(&self, record: &Value) -> bool {
        self.criteria.iter().all(|(path, expected)| {
            let actual = scalar_at(record, path);
            match expected {
                Value::Null => actual.is_none(),
                Value::String(s) => actual.as_deref() == Some(s.as_str()),
                Value::Number(_) | Value::Bool(_) => actual == Some(expected.to_string()),
                // Arrays and objects never equal a scalar
                _ => false,
            }
        })
    }

    /// Compare two array-form records by the sort keys.
    ///
    /// Records that tie on every key compare equal, so a stable sort keeps
    /// their incoming (id) order.
    pub(crate) fn compare(&self, a: &Value, b: &Value) -> Ordering {
        for (path, direction) in &self.order_by {
            let ordering = compare_at(a, b, path);
            let ordering = match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for part in path.split('.') {
        current = match part.parse::<usize>() {
            Ok(index) => current.get(index)?,
            Err(_) => current.get(part)?,
        };
    }
    (!current.is_null()).then_some(current)
}

/// Render the scalar at `path` the way criteria compare it.
fn scalar_at(record: &Value, path: &str) -> Option<String> {
    match lookup(record, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// Missing values sort first, numbers compare numerically, everything else by
// its string rendering.
fn compare_at(a: &Value, b: &Value, path: &str) -> Ordering {
    match (lookup(a, path), lookup(b, path)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
