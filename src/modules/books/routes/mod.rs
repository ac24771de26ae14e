use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use eddy_db::{Collection, Document, Gateway, ID_FIELD};
use eddy_http::error::AppError;
use serde_json::Value;

use super::models::{Book, ListBooksQuery};
use crate::utils::{self, Source};

/// Routes of the books module, relative to `/api`.
pub fn router(gateway: Gateway) -> Router {
    Router::new()
        .route("/books", get(list_books))
        .with_state(gateway)
}

/// Turn a stored document into a public `Book`: the internal identifier is
/// dropped and an integral price is widened to a float.
pub fn book_from_document(mut document: Document) -> Result<Book, utils::SchemaError> {
    document.remove(ID_FIELD);

    if let Some(price) = document.get_mut("price") {
        if let Some(float) = price.as_f64() {
            *price = Value::from(float);
        }
    }

    utils::parse(Source::Document, Value::Object(document))
}

/// `GET /api/books`
async fn list_books(
    State(gateway): State<Gateway>,
    query: Result<Query<ListBooksQuery>, QueryRejection>,
) -> Result<Json<Vec<Book>>, AppError> {
    let Query(query) = query?;
    utils::check(Source::Query, &query)?;

    let documents = gateway
        .get_documents(Book::COLLECTION, query.category_filter(), Some(query.limit))
        .await?;

    // A stored document that no longer fits the schema fails the whole listing.
    let books = documents
        .into_iter()
        .map(book_from_document)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| AppError::Internal(error.into()))?;

    tracing::debug!(count = books.len(), category = ?query.category, "books listed");
    Ok(Json(books))
}
