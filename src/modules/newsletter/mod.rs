pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use eddy_db::Gateway;
use eddy_kernel::{InitCtx, Module};

/// Collects newsletter subscribers interested in new releases and promotions
pub struct NewsletterModule {
    gateway: Gateway,
}

impl NewsletterModule {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Module for NewsletterModule {
    fn name(&self) -> &'static str {
        "newsletter"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "newsletter module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.gateway.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/subscribe": {
                    "post": {
                        "summary": "Subscribe to the newsletter",
                        "tags": ["Newsletter"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Subscriber" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Subscriber recorded",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": { "status": { "type": "string" } }
                                        }
                                    }
                                }
                            },
                            "422": {
                                "description": "Validation error",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ValidationError" }
                                    }
                                }
                            },
                            "500": {
                                "description": "Internal server error",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/HTTPError" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Subscriber": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "nullable": true },
                            "email": { "type": "string", "format": "email" },
                            "source": { "type": "string", "nullable": true, "default": "website" }
                        },
                        "required": ["email"]
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the newsletter module
pub fn create_module(gateway: Gateway) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(NewsletterModule::new(gateway))
}
