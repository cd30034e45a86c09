//! Collection-scoped queries
//!
//! A query selects documents of one collection whose fields satisfy every
//! filter, optionally ordered by a field and truncated to a limit. Filters
//! follow document-database semantics: a document that lacks the filtered
//! field never matches, and values of different kinds never compare.

use crate::document::Document;
use crate::{StoreError, StoreResult};
use serde_json::Value;
use std::cmp::Ordering;

/// Pseudo-field addressing the document id in filters and ordering
pub const DOCUMENT_ID: &str = "__name__";

/// Smallest string greater than every string that starts with `prefix`.
///
/// Together with `>= prefix` this selects exactly the strings having `prefix`
/// as a literal prefix, including ones that continue with `char::MAX` (which a
/// `prefix + char::MAX` bound would miss). `None` means no upper bound exists:
/// the prefix is empty or made only of `char::MAX`.
pub fn prefix_upper_bound(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = next_char(last) {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }
    None
}

fn next_char(c: char) -> Option<char> {
    match c {
        char::MAX => None,
        // Skip the surrogate range, which has no scalar values
        '\u{D7FF}' => Some('\u{E000}'),
        _ => char::from_u32(c as u32 + 1),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    fn new(field: impl Into<String>, op: FilterOp, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Eq, value.into())
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Lt, value.into())
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Lte, value.into())
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Gt, value.into())
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Gte, value.into())
    }

    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: Vec<V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(field, FilterOp::In, Value::Array(values))
    }

    pub fn not_in<V: Into<Value>>(field: impl Into<String>, values: Vec<V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(field, FilterOp::NotIn, Value::Array(values))
    }

    fn is_membership(&self) -> bool {
        matches!(self.op, FilterOp::In | FilterOp::NotIn)
    }

    /// Evaluate the filter against a document
    pub fn matches(&self, doc: &Document) -> bool {
        let Some(actual) = field_value(doc, &self.field) else {
            return false;
        };
        match self.op {
            FilterOp::Eq => values_equal(&actual, &self.value),
            FilterOp::Lt => compare_values(&actual, &self.value) == Some(Ordering::Less),
            FilterOp::Lte => matches!(
                compare_values(&actual, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FilterOp::Gt => compare_values(&actual, &self.value) == Some(Ordering::Greater),
            FilterOp::Gte => matches!(
                compare_values(&actual, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOp::In => membership(&self.value).any(|v| values_equal(&actual, v)),
            FilterOp::NotIn => !membership(&self.value).any(|v| values_equal(&actual, v)),
        }
    }
}

fn membership(value: &Value) -> impl Iterator<Item = &Value> {
    value.as_array().into_iter().flatten()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Query over a single collection
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Reject queries the store cannot serve.
    ///
    /// Membership filters must carry between 1 and `max_in_values` values.
    pub fn validate(&self, max_in_values: usize) -> StoreResult<()> {
        for filter in self.filters.iter().filter(|f| f.is_membership()) {
            let Some(values) = filter.value.as_array() else {
                return Err(StoreError::InvalidQuery(format!(
                    "membership filter on '{}' needs an array value",
                    filter.field
                )));
            };
            if values.is_empty() {
                return Err(StoreError::InvalidQuery(format!(
                    "membership filter on '{}' has no values",
                    filter.field
                )));
            }
            if values.len() > max_in_values {
                return Err(StoreError::InvalidQuery(format!(
                    "membership filter on '{}' has {} values, limit is {}",
                    filter.field,
                    values.len(),
                    max_in_values
                )));
            }
        }
        Ok(())
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.filters.iter().all(|f| f.matches(doc))
    }

    /// Order and truncate an already-filtered result set
    pub fn finish(&self, mut docs: Vec<Document>) -> Vec<Document> {
        if let Some(order) = &self.order_by {
            // Documents without the ordering field are not part of the result
            docs.retain(|d| field_value(d, &order.field).is_some());
            docs.sort_by(|a, b| {
                let ordering = match (field_value(a, &order.field), field_value(b, &order.field)) {
                    (Some(x), Some(y)) => compare_values(&x, &y).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                };
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = self.limit {
            docs.truncate(limit);
        }
        docs
    }
}

fn field_value(doc: &Document, field: &str) -> Option<Value> {
    if field == DOCUMENT_ID {
        return Some(Value::String(doc.id.clone()));
    }
    doc.fields.get(field).cloned()
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match compare_values(a, b) {
        Some(ordering) => ordering == Ordering::Equal,
        None => a == b,
    }
}

/// Compare two values of the same kind; values of different kinds are unordered
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}
