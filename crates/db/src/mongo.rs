//! MongoDB-backed document store.

use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{self, Bson};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

use crate::{DbError, Document, DocumentStore};

/// Applied when the url does not set `serverSelectionTimeoutMS`; keeps an
/// unreachable server from outliving the HTTP request timeout.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Parse `url` and bind to database `name`. Server selection is lazy, so
    /// an unreachable server surfaces on the first operation rather than here.
    pub async fn connect(url: &str, name: &str) -> Result<Self, DbError> {
        let mut options = ClientOptions::parse(url).await?;
        options
            .server_selection_timeout
            .get_or_insert(SERVER_SELECTION_TIMEOUT);
        let client = Client::with_options(options)?;
        Ok(Self {
            database: client.database(name),
        })
    }

    fn collection(&self, name: &str) -> mongodb::Collection<bson::Document> {
        self.database.collection(name)
    }
}

fn to_json(document: bson::Document) -> Document {
    match Bson::Document(document).into_relaxed_extjson() {
        serde_json::Value::Object(map) => map,
        _ => Document::new(),
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn name(&self) -> &str {
        self.database.name()
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<(), DbError> {
        let document = bson::to_document(&document)?;
        self.collection(collection).insert_one(document).await?;
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        filter: Option<Document>,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, DbError> {
        let filter = match filter {
            Some(filter) => bson::to_document(&filter)?,
            None => bson::Document::new(),
        };

        let target = self.collection(collection);
        let mut query = target.find(filter);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let mut cursor = query.await?;
        let mut documents = Vec::new();
        while cursor.advance().await? {
            documents.push(to_json(cursor.deserialize_current()?));
        }
        Ok(documents)
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, DbError> {
        Ok(self.database.list_collection_names().await?)
    }
}
