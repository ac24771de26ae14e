use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};
use eddy_db::{Collection, Gateway};
use eddy_http::error::{issue, AppError};
use serde_json::{json, Value};

use super::models::Subscriber;
use crate::utils::{self, Source};

const CONTENT_TYPE_MESSAGE: &str = "Expected request with `Content-Type: application/json`";

/// Routes of the newsletter module, relative to `/api`.
pub fn router(gateway: Gateway) -> Router {
    Router::new()
        .route("/subscribe", post(subscribe))
        .with_state(gateway)
}

// A missing Content-Type is read as JSON; a declared non-JSON one is refused.
fn declares_other_media(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return false;
    };
    let Ok(value) = value.to_str() else {
        return true;
    };
    let essence = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    !(essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json")))
}

/// `POST /api/subscribe`
async fn subscribe(
    State(gateway): State<Gateway>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    if declares_other_media(&headers) {
        return Err(AppError::validation(
            vec![issue(&["body"], CONTENT_TYPE_MESSAGE, "content_type")],
            CONTENT_TYPE_MESSAGE,
        ));
    }

    let Json(body) = Json::<Value>::from_bytes(&body)?;
    let subscriber: Subscriber = utils::parse(Source::Body, body)?;

    gateway
        .create_document(Subscriber::COLLECTION, &subscriber)
        .await?;

    tracing::info!(source = ?subscriber.source, "subscriber recorded");
    Ok(Json(json!({ "status": "ok" })))
}
