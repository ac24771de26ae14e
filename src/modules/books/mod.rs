pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use eddy_db::Gateway;
use eddy_kernel::{InitCtx, Module};

/// Read-only book catalog
pub struct BooksModule {
    gateway: Gateway,
}

impl BooksModule {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            database_available = self.gateway.is_available(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.gateway.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books",
                        "description": "List books available in the store, optionally filtered by category.",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "category",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "string" }
                            },
                            {
                                "name": "limit",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "integer", "default": 50, "minimum": 1 }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "List of books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/Book"
                                            }
                                        }
                                    }
                                }
                            },
                            "422": {
                                "description": "Invalid query",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ValidationError"
                                        }
                                    }
                                }
                            },
                            "500": {
                                "description": "Internal server error",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/HTTPError"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "description": "Book title" },
                            "subtitle": { "type": "string", "nullable": true },
                            "description": { "type": "string", "nullable": true },
                            "category": {
                                "type": "string",
                                "enum": ["cookbook", "coloring", "children", "story", "guide", "poetry", "other"],
                                "default": "other"
                            },
                            "price": { "type": "number", "minimum": 0, "default": 0.0 },
                            "cover_url": { "type": "string", "nullable": true },
                            "sample_url": { "type": "string", "nullable": true },
                            "download_url": { "type": "string", "nullable": true },
                            "featured": { "type": "boolean", "default": false }
                        },
                        "required": ["title"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(gateway: Gateway) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(gateway))
}
