//! Document database abstraction
//!
//! Every service persists through the [`DocumentStore`] trait:
//! - Keyed document get / set / create / delete
//! - Collection-scoped queries with equality, range and membership filters
//! - Atomic multi-document write batches
//! - A documented cap on membership filter size (see [`StoreConfig`])
//!
//! Sub-collections are addressed by path, e.g. `users/{uid}/following`.

mod batch;
mod config;
mod document;
mod error;
mod memory;
mod query;

pub use batch::{WriteBatch, WriteOp};
pub use config::{StoreConfig, DEFAULT_MAX_IN_VALUES};
pub use document::{Document, Fields};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryDocumentStore;
pub use query::{
    compare_values, prefix_upper_bound, Direction, Filter, FilterOp, OrderBy, Query, DOCUMENT_ID,
};

/// Core document store operations
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Create or overwrite a document
    async fn set(&self, collection: &str, doc: Document) -> StoreResult<()>;

    /// Create a document, failing with `AlreadyExists` if the id is taken
    async fn create(&self, collection: &str, doc: Document) -> StoreResult<()>;

    /// Create a document under a store-generated id and return that id
    async fn add(&self, collection: &str, fields: Fields) -> StoreResult<String>;

    /// Remove a document; removing a missing document is a no-op
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Run a collection-scoped query
    async fn query(&self, query: &Query) -> StoreResult<Vec<Document>>;

    /// Apply every operation of the batch atomically
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()>;

    /// Largest value list accepted by one `in` / `not-in` filter
    fn max_in_values(&self) -> usize {
        DEFAULT_MAX_IN_VALUES
    }

    /// Health check (optional)
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
