//! Errors raised by the document-store gateway.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database not available. Check DATABASE_URL and DATABASE_NAME environment variables.")]
    Unavailable,

    #[error("record for collection '{collection}' is not a JSON object")]
    NotADocument { collection: String },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to convert document: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}
