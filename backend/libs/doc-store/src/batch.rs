//! Atomic multi-document writes

use crate::document::{Document, Fields};

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or overwrite a document
    Set {
        collection: String,
        id: String,
        fields: Fields,
    },
    /// Remove a document; a missing document is not an error
    Delete { collection: String, id: String },
}

impl WriteOp {
    pub fn collection(&self) -> &str {
        match self {
            WriteOp::Set { collection, .. } | WriteOp::Delete { collection, .. } => collection,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            WriteOp::Set { id, .. } | WriteOp::Delete { id, .. } => id,
        }
    }
}

/// A group of writes committed as one unit: all of them become visible or none do
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, collection: impl Into<String>, doc: Document) -> Self {
        self.ops.push(WriteOp::Set {
            collection: collection.into(),
            id: doc.id,
            fields: doc.fields,
        });
        self
    }

    pub fn delete(mut self, collection: impl Into<String>, id: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Delete {
            collection: collection.into(),
            id: id.into(),
        });
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}
