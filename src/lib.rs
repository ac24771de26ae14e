//! Eddy & Ink application library
//!
//! Feature modules (book catalog, newsletter) and the schema validation they share.

pub mod modules;
pub mod utils;

/// Re-export commonly used types
pub use modules::*;

// Every module mounted behind the production router and middleware stack,
// backed by the in-memory store.
#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use eddy_db::{Gateway, MemoryStore};
    use eddy_kernel::{settings::Settings, ModuleRegistry};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::modules;

    fn app(gateway: &Gateway) -> Router {
        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, gateway);
        eddy_http::build_router(&registry, &Settings::default(), gateway.clone())
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn subscribe_then_list_books() {
        let gateway = Gateway::from_store(MemoryStore::new("eddy"));
        gateway
            .create_document("book", &json!({"title": "Tiny Kitchen", "category": "cookbook", "price": 12}))
            .await
            .unwrap();

        let request = Request::post("/api/subscribe")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email": "reader@example.com"}"#))
            .unwrap();
        let (status, body) = send(app(&gateway), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));

        let (status, body) = send(app(&gateway), get("/api/books?category=cookbook&limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{
                "title": "Tiny Kitchen",
                "subtitle": null,
                "description": null,
                "category": "cookbook",
                "price": 12.0,
                "cover_url": null,
                "sample_url": null,
                "download_url": null,
                "featured": false
            }])
        );

        let (status, body) = send(app(&gateway), get("/test")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "✅ Connected & Working");
        assert_eq!(body["collections"], json!(["book", "subscriber"]));
    }

    #[tokio::test]
    async fn service_endpoints_survive_missing_database() {
        let gateway = Gateway::unavailable();

        let (status, body) = send(app(&gateway), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Eddy & Ink Backend is running"}));

        let (status, body) = send(app(&gateway), get("/test")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["connection_status"], "Not Connected");

        let (status, _) = send(app(&gateway), get("/api/books")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn openapi_lists_module_paths() {
        let gateway = Gateway::unavailable();
        let (status, body) = send(app(&gateway), get("/docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/books"]["get"].is_object());
        assert!(body["paths"]["/api/subscribe"]["post"].is_object());
    }
}
