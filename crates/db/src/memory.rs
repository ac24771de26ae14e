//! In-process document store used for local runs (`memory://` urls) and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::{Timestamp, Uuid};

use crate::{DbError, Document, DocumentStore, ID_FIELD};

/// Collections of documents kept in insertion order.
pub struct MemoryStore {
    name: String,
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: RwLock::new(HashMap::new()),
        }
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(field, expected)| document.get(field) == Some(expected))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert(&self, collection: &str, mut document: Document) -> Result<(), DbError> {
        if !document.contains_key(ID_FIELD) {
            let id = Uuid::new_v7(Timestamp::now(uuid::NoContext));
            document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        }

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        filter: Option<Document>,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, DbError> {
        // Non-positive limits mean "no limit", as in MongoDB.
        let cap = match limit {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            _ => usize::MAX,
        };

        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(documents
            .iter()
            .filter(|document| filter.as_ref().map_or(true, |f| matches(document, f)))
            .take(cap)
            .cloned()
            .collect())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, DbError> {
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn find_applies_equality_filter_and_limit() {
        let store = MemoryStore::new("test");
        for (title, category) in [
            ("A", "cookbook"),
            ("B", "poetry"),
            ("C", "cookbook"),
            ("D", "cookbook"),
        ] {
            store
                .insert("book", doc(json!({"title": title, "category": category})))
                .await
                .unwrap();
        }

        let cookbooks = store
            .find("book", Some(doc(json!({"category": "cookbook"}))), Some(2))
            .await
            .unwrap();
        let titles: Vec<_> = cookbooks.iter().map(|d| d["title"].clone()).collect();
        assert_eq!(titles, vec![json!("A"), json!("C")]);

        let all = store.find("book", None, Some(0)).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn missing_collection_yields_nothing() {
        let store = MemoryStore::new("test");
        assert!(store.find("book", None, None).await.unwrap().is_empty());
        assert!(store.list_collection_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_assigns_identifier_and_keeps_duplicates() {
        let store = MemoryStore::new("test");
        let record = doc(json!({"email": "a@b.com"}));
        store.insert("subscriber", record.clone()).await.unwrap();
        store.insert("subscriber", record).await.unwrap();

        let stored = store.find("subscriber", None, None).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_ne!(stored[0][ID_FIELD], stored[1][ID_FIELD]);
        assert_eq!(
            store.list_collection_names().await.unwrap(),
            vec!["subscriber".to_string()]
        );
    }
}
