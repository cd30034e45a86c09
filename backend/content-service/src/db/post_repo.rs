use crate::error::{ContentError, Result};
use crate::models::{NewPost, Post, PostRecord};
use chrono::{DateTime, Utc};
use doc_store::{Direction, Document, DocumentStore, Filter, Query, StoreError};
use id_types::{PostId, UserId};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub const POSTS_COLLECTION: &str = "posts";

#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    /// Create a post stamped with the current instant
    async fn create_post(&self, author_id: &UserId, caption: &str, photo_url: &str)
        -> Result<PostId>;

    /// Create a post with an explicit timestamp
    async fn create_post_at(
        &self,
        author_id: &UserId,
        caption: &str,
        photo_url: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<PostId>;

    async fn get_post(&self, post_id: &PostId) -> Result<Option<Post>>;

    /// Posts by one author, newest first
    async fn list_by_author(&self, author_id: &UserId) -> Result<Vec<Post>>;

    /// Posts by any of the given authors, newest first.
    /// An empty set yields no posts without touching the store.
    async fn list_by_authors(&self, author_ids: &BTreeSet<UserId>) -> Result<Vec<Post>>;

    /// Every post, newest first
    async fn list_all(&self) -> Result<Vec<Post>>;
}

#[derive(Clone)]
pub struct DocumentPostStore {
    store: Arc<dyn DocumentStore>,
}

impl DocumentPostStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn run(&self, query: Query) -> Result<Vec<Post>> {
        let docs = self
            .store
            .query(&query)
            .await
            .map_err(ContentError::from_read)?;
        Ok(docs.into_iter().filter_map(post_from_document).collect())
    }
}

/// Malformed documents are skipped rather than failing the whole read
fn post_from_document(doc: Document) -> Option<Post> {
    let id = match PostId::parse(&doc.id, "post_id") {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "Skipping post with invalid id");
            return None;
        }
    };
    match doc.to_record::<PostRecord>() {
        Ok(record) => Some(Post::from_record(id, record)),
        Err(e) => {
            warn!(post_id = %id, error = %e, "Skipping malformed post");
            None
        }
    }
}

#[async_trait::async_trait]
impl PostStore for DocumentPostStore {
    async fn create_post(
        &self,
        author_id: &UserId,
        caption: &str,
        photo_url: &str,
    ) -> Result<PostId> {
        self.create_post_at(author_id, caption, photo_url, Utc::now())
            .await
    }

    async fn create_post_at(
        &self,
        author_id: &UserId,
        caption: &str,
        photo_url: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<PostId> {
        let new_post = NewPost::new(author_id.clone(), caption, photo_url);
        new_post.check()?;

        let doc = Document::from_record(String::new(), &new_post.into_record(timestamp))
            .map_err(ContentError::from_write)?;
        let id = self
            .store
            .add(POSTS_COLLECTION, doc.fields)
            .await
            .map_err(ContentError::from_write)?;
        let post_id = PostId::parse(&id, "post_id")
            .map_err(|e| ContentError::Write(StoreError::InvalidDocument(e.to_string())))?;

        debug!(post_id = %post_id, author_id = %author_id, "Created post");
        Ok(post_id)
    }

    async fn get_post(&self, post_id: &PostId) -> Result<Option<Post>> {
        let doc = self
            .store
            .get(POSTS_COLLECTION, post_id.as_str())
            .await
            .map_err(ContentError::from_read)?;
        Ok(doc.and_then(post_from_document))
    }

    async fn list_by_author(&self, author_id: &UserId) -> Result<Vec<Post>> {
        let query = Query::collection(POSTS_COLLECTION)
            .filter(Filter::eq("authorId", author_id.as_str()))
            .order_by("timestamp", Direction::Descending);
        let mut posts = self.run(query).await?;
        posts.sort_by(Post::newest_first);
        Ok(posts)
    }

    async fn list_by_authors(&self, author_ids: &BTreeSet<UserId>) -> Result<Vec<Post>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<&UserId> = author_ids.iter().collect();
        let chunk_size = self.store.max_in_values().max(1);
        let mut posts = Vec::new();

        for chunk in ids.chunks(chunk_size) {
            let values: Vec<Value> = chunk
                .iter()
                .map(|id| Value::String(id.as_str().to_string()))
                .collect();
            let query = Query::collection(POSTS_COLLECTION).filter(Filter::is_in("authorId", values));
            posts.extend(self.run(query).await?);
        }

        posts.sort_by(Post::newest_first);
        debug!(
            authors = author_ids.len(),
            chunks = ids.len().div_ceil(chunk_size),
            posts = posts.len(),
            "Listed posts by authors"
        );
        Ok(posts)
    }

    async fn list_all(&self) -> Result<Vec<Post>> {
        let mut posts = self.run(Query::collection(POSTS_COLLECTION)).await?;
        posts.sort_by(Post::newest_first);
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use doc_store::{InMemoryDocumentStore, StoreConfig};

    fn uid(id: &str) -> UserId {
        UserId::parse(id, "user_id").unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn posts_store() -> DocumentPostStore {
        DocumentPostStore::new(Arc::new(InMemoryDocumentStore::new(StoreConfig::default())))
    }

    #[tokio::test]
    async fn test_create_and_get_post() {
        let posts = posts_store();
        let id = posts.create_post(&uid("b"), " hi ", "x").await.unwrap();

        let post = posts.get_post(&id).await.unwrap().unwrap();
        assert_eq!(post.author_id, uid("b"));
        assert_eq!(post.caption, " hi ");
        assert_eq!(post.photo_url, "x");
    }

    #[tokio::test]
    async fn test_create_post_rejects_missing_fields() {
        let posts = posts_store();
        let err = posts.create_post(&uid("b"), "", "x").await.unwrap_err();
        assert!(err.is_validation());
        let err = posts.create_post(&uid("b"), "hi", "  ").await.unwrap_err();
        assert!(err.is_validation());
        assert!(posts.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_author_newest_first() {
        let posts = posts_store();
        posts.create_post_at(&uid("a"), "old", "x", at(10)).await.unwrap();
        posts.create_post_at(&uid("a"), "new", "x", at(30)).await.unwrap();
        posts.create_post_at(&uid("b"), "other", "x", at(20)).await.unwrap();

        let captions: Vec<_> = posts
            .list_by_author(&uid("a"))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.caption)
            .collect();
        assert_eq!(captions, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_list_by_authors_empty_set() {
        let posts = posts_store();
        posts.create_post(&uid("a"), "hi", "x").await.unwrap();
        assert!(posts.list_by_authors(&BTreeSet::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_authors_chunks_past_membership_cap() {
        // The store rejects membership filters over 30 values
        let posts = posts_store();
        let mut authors = BTreeSet::new();
        for i in 0..35 {
            let author = uid(&format!("author{:02}", i));
            posts
                .create_post_at(&author, &format!("post {}", i), "x", at(i))
                .await
                .unwrap();
            authors.insert(author);
        }
        posts.create_post(&uid("outsider"), "skip", "x").await.unwrap();

        let listed = posts.list_by_authors(&authors).await.unwrap();
        assert_eq!(listed.len(), 35);
        assert_eq!(listed[0].caption, "post 34");
        assert_eq!(listed[34].caption, "post 0");
    }

    #[tokio::test]
    async fn test_list_all_includes_every_author() {
        let posts = posts_store();
        posts.create_post_at(&uid("a"), "one", "x", at(1)).await.unwrap();
        posts.create_post_at(&uid("b"), "two", "x", at(2)).await.unwrap();
        let all = posts.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].caption, "two");
    }

    mockall::mock! {
        pub Store {}

        #[async_trait::async_trait]
        impl DocumentStore for Store {
            async fn get(&self, collection: &str, id: &str) -> doc_store::StoreResult<Option<Document>>;
            async fn set(&self, collection: &str, doc: Document) -> doc_store::StoreResult<()>;
            async fn create(&self, collection: &str, doc: Document) -> doc_store::StoreResult<()>;
            async fn add(&self, collection: &str, fields: doc_store::Fields) -> doc_store::StoreResult<String>;
            async fn delete(&self, collection: &str, id: &str) -> doc_store::StoreResult<()>;
            async fn query(&self, query: &Query) -> doc_store::StoreResult<Vec<Document>>;
            async fn commit(&self, batch: doc_store::WriteBatch) -> doc_store::StoreResult<()>;
            fn max_in_values(&self) -> usize;
            async fn health_check(&self) -> doc_store::StoreResult<()>;
        }
    }

    #[tokio::test]
    async fn test_list_by_authors_respects_store_cap() {
        let mut store = MockStore::new();
        store.expect_max_in_values().return_const(2usize);
        store
            .expect_query()
            .times(3)
            .withf(|query| query.validate(2).is_ok())
            .returning(|_| Ok(Vec::new()));

        let posts = DocumentPostStore::new(Arc::new(store));
        let authors: BTreeSet<UserId> = ["a", "b", "c", "d", "e"].iter().map(|id| uid(id)).collect();
        assert!(posts.list_by_authors(&authors).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_surfaces_as_network_error() {
        let mut store = MockStore::new();
        store
            .expect_query()
            .returning(|_| Err(StoreError::Unavailable("offline".into())));

        let posts = DocumentPostStore::new(Arc::new(store));
        let err = posts.list_all().await.unwrap_err();
        assert!(matches!(err, ContentError::Network(_)));
    }
}
