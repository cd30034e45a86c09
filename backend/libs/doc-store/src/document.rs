//! Documents and typed record conversion

use crate::{StoreError, StoreResult};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Field map of a document
pub type Fields = Map<String, Value>;

/// A stored document: an id unique within its collection plus a field map
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Serialize a record into document fields.
    ///
    /// The record must serialize to a JSON object.
    pub fn from_record<T: Serialize>(id: impl Into<String>, record: &T) -> StoreResult<Self> {
        let id = id.into();
        match serde_json::to_value(record)? {
            Value::Object(fields) => Ok(Self { id, fields }),
            other => Err(StoreError::InvalidDocument(format!(
                "document {} must be an object, got {}",
                id,
                value_kind(&other)
            ))),
        }
    }

    /// Deserialize the field map into a record type
    pub fn to_record<T: DeserializeOwned>(&self) -> StoreResult<T> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
