//! Document-store gateway for Eddy & Ink.
//!
//! The gateway exposes two operations over named collections of schema-less
//! JSON documents, `create_document` and `get_documents`, plus the
//! introspection calls used by the diagnostics endpoint. A process-wide
//! [`Gateway`] is built once at startup; when the store cannot be reached or
//! is not configured it is still constructed, and every call fails with
//! [`DbError::Unavailable`] instead of taking the process down.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

pub mod error;
pub mod memory;
pub mod mongo;

pub use error::DbError;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// A raw stored document.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Field holding the storage-internal identifier of a document.
pub const ID_FIELD: &str = "_id";

const MEMORY_SCHEME: &str = "memory://";

/// Binds a record type to the collection it is stored in.
pub trait Collection {
    const COLLECTION: &'static str;
}

/// Backend operations a document store must provide.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name of the database this store is bound to
    fn name(&self) -> &str;

    /// Insert one document into `collection`
    async fn insert(&self, collection: &str, document: Document) -> Result<(), DbError>;

    /// Fetch documents whose fields equal every entry of `filter`, at most `limit` of them
    async fn find(
        &self,
        collection: &str,
        filter: Option<Document>,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, DbError>;

    /// List the collections present in the database
    async fn list_collection_names(&self) -> Result<Vec<String>, DbError>;
}

/// Shared handle to the configured document store, if any.
#[derive(Clone, Default)]
pub struct Gateway {
    store: Option<Arc<dyn DocumentStore>>,
}

impl Gateway {
    /// Build a gateway from connection parameters.
    ///
    /// Never fails: a missing url or name, or a client that cannot be built,
    /// yields an unavailable gateway and a warning.
    pub async fn connect(url: Option<&str>, name: Option<&str>) -> Self {
        let (Some(url), Some(name)) = (url, name) else {
            tracing::warn!(
                target: "eddy-db",
                "database url or name not configured; gateway unavailable"
            );
            return Self::unavailable();
        };

        if url.starts_with(MEMORY_SCHEME) {
            tracing::info!(target: "eddy-db", database = name, "using in-memory document store");
            return Self::from_store(MemoryStore::new(name));
        }

        match MongoStore::connect(url, name).await {
            Ok(store) => {
                tracing::info!(target: "eddy-db", database = name, "document store client ready");
                Self::from_store(store)
            }
            Err(error) => {
                tracing::warn!(
                    target: "eddy-db",
                    %error,
                    "failed to initialize document store; gateway unavailable"
                );
                Self::unavailable()
            }
        }
    }

    /// Gateway with no backing store
    pub fn unavailable() -> Self {
        Self { store: None }
    }

    /// Gateway over an already constructed store
    pub fn from_store(store: impl DocumentStore + 'static) -> Self {
        Self {
            store: Some(Arc::new(store)),
        }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Name of the bound database, `None` when unavailable
    pub fn database_name(&self) -> Option<&str> {
        self.store.as_deref().map(|store| store.name())
    }

    fn store(&self) -> Result<&dyn DocumentStore, DbError> {
        self.store.as_deref().ok_or(DbError::Unavailable)
    }

    /// Serialize `record` and insert it into `collection`.
    pub async fn create_document<T>(&self, collection: &str, record: &T) -> Result<(), DbError>
    where
        T: Serialize + ?Sized,
    {
        let store = self.store()?;
        let document = match serde_json::to_value(record)? {
            serde_json::Value::Object(document) => document,
            _ => {
                return Err(DbError::NotADocument {
                    collection: collection.to_string(),
                })
            }
        };

        tracing::debug!(target: "eddy-db", collection, "inserting document");
        store.insert(collection, document).await
    }

    /// Fetch raw documents from `collection`, optionally filtered by exact
    /// field equality and capped at `limit`.
    pub async fn get_documents(
        &self,
        collection: &str,
        filter: Option<Document>,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, DbError> {
        let store = self.store()?;
        tracing::debug!(target: "eddy-db", collection, ?limit, "fetching documents");
        store.find(collection, filter, limit).await
    }

    /// Collection names of the bound database
    pub async fn list_collection_names(&self) -> Result<Vec<String>, DbError> {
        self.store()?.list_collection_names().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn unavailable_gateway_fails_every_call() {
        let gateway = Gateway::unavailable();
        assert!(!gateway.is_available());
        assert!(gateway.database_name().is_none());

        let err = gateway
            .create_document("subscriber", &json!({"email": "a@b.com"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Unavailable));

        let err = gateway.get_documents("book", None, Some(5)).await.unwrap_err();
        assert!(matches!(err, DbError::Unavailable));

        let err = gateway.list_collection_names().await.unwrap_err();
        assert!(err.to_string().starts_with("Database not available"));
    }

    #[tokio::test]
    async fn connect_without_parameters_is_unavailable() {
        assert!(!Gateway::connect(None, Some("eddy")).await.is_available());
        assert!(!Gateway::connect(Some("mongodb://localhost"), None).await.is_available());
    }

    #[tokio::test]
    async fn memory_scheme_selects_in_process_store() {
        let gateway = Gateway::connect(Some("memory://"), Some("eddy")).await;
        assert!(gateway.is_available());
        assert_eq!(gateway.database_name(), Some("eddy"));
    }

    #[tokio::test]
    async fn non_object_records_are_rejected() {
        let gateway = Gateway::from_store(MemoryStore::new("eddy"));
        let err = gateway
            .create_document("subscriber", &json!(["not", "a", "map"]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotADocument { .. }));
        assert!(gateway.list_collection_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_then_get_round_trips_through_the_store() {
        let gateway = Gateway::from_store(MemoryStore::new("eddy"));
        gateway
            .create_document("book", &json!({"title": "Soup", "category": "cookbook"}))
            .await
            .unwrap();

        let docs = gateway.get_documents("book", None, None).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["title"], "Soup");
        assert!(docs[0].contains_key(ID_FIELD));
    }
}
