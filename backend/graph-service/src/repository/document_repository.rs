use super::GraphRepositoryTrait;
use crate::domain::edge::{followers_collection, following_collection, FollowEdge};
use crate::error::{GraphError, Result};
use doc_store::{Document, DocumentStore, Query, WriteBatch};
use id_types::UserId;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Repository for graph operations on the document store
#[derive(Clone)]
pub struct DocumentGraphRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentGraphRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Ids of every document in a relation sub-collection
    async fn list_edges(&self, collection: &str) -> Result<BTreeSet<UserId>> {
        let docs = self
            .store
            .query(&Query::collection(collection))
            .await
            .map_err(GraphError::from_read)?;

        let mut ids = BTreeSet::new();
        for doc in docs {
            match UserId::parse(&doc.id, "user_id") {
                Ok(id) => {
                    ids.insert(id);
                }
                Err(e) => warn!(collection = %collection, error = %e, "Skipping malformed edge"),
            }
        }
        Ok(ids)
    }
}

#[async_trait::async_trait]
impl GraphRepositoryTrait for DocumentGraphRepository {
    async fn follow(&self, follower_id: &UserId, followee_id: &UserId) -> Result<()> {
        let edge = FollowEdge::new(follower_id.clone(), followee_id.clone());
        if edge.is_self_edge() {
            return Err(GraphError::SelfFollow);
        }

        let record = edge.record();
        let follower_doc =
            Document::from_record(follower_id.as_str(), &record).map_err(GraphError::from_write)?;
        let following_doc =
            Document::from_record(followee_id.as_str(), &record).map_err(GraphError::from_write)?;

        let batch = WriteBatch::new()
            .set(followers_collection(followee_id), follower_doc)
            .set(following_collection(follower_id), following_doc);

        self.store
            .commit(batch)
            .await
            .map_err(GraphError::from_write)?;

        debug!(follower = %follower_id, followee = %followee_id, "Created follow edge");
        Ok(())
    }

    async fn unfollow(&self, follower_id: &UserId, followee_id: &UserId) -> Result<()> {
        let batch = WriteBatch::new()
            .delete(followers_collection(followee_id), follower_id.as_str())
            .delete(following_collection(follower_id), followee_id.as_str());

        self.store
            .commit(batch)
            .await
            .map_err(GraphError::from_write)?;

        debug!(follower = %follower_id, followee = %followee_id, "Deleted follow edge");
        Ok(())
    }

    async fn is_following(&self, follower_id: &UserId, followee_id: &UserId) -> Result<bool> {
        let doc = self
            .store
            .get(&following_collection(follower_id), followee_id.as_str())
            .await
            .map_err(GraphError::from_read)?;
        Ok(doc.is_some())
    }

    async fn list_followers(&self, user_id: &UserId) -> Result<BTreeSet<UserId>> {
        self.list_edges(&followers_collection(user_id)).await
    }

    async fn list_following(&self, user_id: &UserId) -> Result<BTreeSet<UserId>> {
        self.list_edges(&following_collection(user_id)).await
    }

    async fn health_check(&self) -> Result<()> {
        self.store.health_check().await.map_err(GraphError::from_read)
    }
}
