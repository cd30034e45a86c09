//! In-process document store
//!
//! Collections are kept in id order, which is the "natural" order queries
//! return when no ordering is requested. All state sits behind one async
//! `RwLock`, so a batch applied under a single write guard is atomic with
//! respect to every reader.

use crate::batch::{WriteBatch, WriteOp};
use crate::config::StoreConfig;
use crate::document::{Document, Fields};
use crate::query::Query;
use crate::{DocumentStore, StoreError, StoreResult};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

type Collection = BTreeMap<String, Fields>;

#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
    config: StoreConfig,
}

impl InMemoryDocumentStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Number of documents currently stored in a collection
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }
}

fn apply(collections: &mut HashMap<String, Collection>, op: WriteOp) {
    match op {
        WriteOp::Set {
            collection,
            id,
            fields,
        } => {
            collections.entry(collection).or_default().insert(id, fields);
        }
        WriteOp::Delete { collection, id } => {
            if let Some(docs) = collections.get_mut(&collection) {
                docs.remove(&id);
                if docs.is_empty() {
                    collections.remove(&collection);
                }
            }
        }
    }
}

fn check_id(collection: &str, id: &str) -> StoreResult<()> {
    if collection.is_empty() || id.is_empty() {
        return Err(StoreError::InvalidDocument(format!(
            "empty collection or id: '{}/{}'",
            collection, id
        )));
    }
    Ok(())
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn set(&self, collection: &str, doc: Document) -> StoreResult<()> {
        check_id(collection, &doc.id)?;
        let mut collections = self.collections.write().await;
        debug!(collection = %collection, id = %doc.id, "Set document");
        apply(
            &mut collections,
            WriteOp::Set {
                collection: collection.to_string(),
                id: doc.id,
                fields: doc.fields,
            },
        );
        Ok(())
    }

    async fn create(&self, collection: &str, doc: Document) -> StoreResult<()> {
        check_id(collection, &doc.id)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(&doc.id) {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: doc.id,
            });
        }
        debug!(collection = %collection, id = %doc.id, "Created document");
        docs.insert(doc.id, doc.fields);
        Ok(())
    }

    async fn add(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        self.create(collection, Document::new(id.clone(), fields))
            .await?;
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        apply(
            &mut collections,
            WriteOp::Delete {
                collection: collection.to_string(),
                id: id.to_string(),
            },
        );
        debug!(collection = %collection, id = %id, "Deleted document");
        Ok(())
    }

    async fn query(&self, query: &Query) -> StoreResult<Vec<Document>> {
        query.validate(self.config.max_in_values)?;

        let collections = self.collections.read().await;
        let matched: Vec<Document> = collections
            .get(&query.collection)
            .into_iter()
            .flatten()
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
            .filter(|doc| query.matches(doc))
            .collect();

        Ok(query.finish(matched))
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        for op in batch.ops() {
            check_id(op.collection(), op.id())?;
        }

        let op_count = batch.len();
        let mut collections = self.collections.write().await;
        for op in batch.into_ops() {
            apply(&mut collections, op);
        }
        debug!(ops = op_count, "Committed write batch");
        Ok(())
    }

    fn max_in_values(&self) -> usize {
        self.config.max_in_values
    }
}
