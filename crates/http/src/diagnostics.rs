//! Service-level endpoints: liveness message and database diagnostics.
//!
//! Neither endpoint can fail. Diagnostics absorb every gateway error into the
//! report so operators always get an answer, even with the database down.

use axum::{extract::State, Json};
use eddy_db::Gateway;
use eddy_kernel::settings::{non_empty_var, DATABASE_NAME_ENV, DATABASE_URL_ENV};
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};

const RUNNING: &str = "✅ Running";
const AVAILABLE: &str = "✅ Available";
const WORKING: &str = "✅ Connected & Working";
const NOT_INITIALIZED: &str = "⚠️  Available but not initialized";
const SET: &str = "✅ Set";
const NOT_SET: &str = "❌ Not Set";

const MAX_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;

/// Upper bound on the collection listing, below the default request timeout.
pub const LISTING_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixed liveness payload.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Eddy & Ink Backend is running" }))
}

/// Which connection variables are present in the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvPresence {
    pub database_url: bool,
    pub database_name: bool,
}

impl EnvPresence {
    pub fn from_env() -> Self {
        Self {
            database_url: non_empty_var(DATABASE_URL_ENV).is_some(),
            database_name: non_empty_var(DATABASE_NAME_ENV).is_some(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn presence(set: bool) -> String {
    (if set { SET } else { NOT_SET }).to_string()
}

fn truncate(message: &str) -> String {
    message.chars().take(MAX_ERROR_CHARS).collect()
}

/// Query the gateway and assemble the report.
pub async fn collect(gateway: &Gateway, env: EnvPresence) -> DiagnosticReport {
    collect_within(gateway, env, LISTING_TIMEOUT).await
}

async fn collect_within(gateway: &Gateway, env: EnvPresence, limit: Duration) -> DiagnosticReport {
    let mut report = DiagnosticReport {
        backend: RUNNING.to_string(),
        database: NOT_INITIALIZED.to_string(),
        database_url: presence(env.database_url),
        database_name: presence(env.database_name),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    if !gateway.is_available() {
        return report;
    }

    report.database = AVAILABLE.to_string();
    report.connection_status = "Connected".to_string();

    let listing = tokio::time::timeout(limit, gateway.list_collection_names()).await;
    let failure = match listing {
        Ok(Ok(mut collections)) => {
            collections.truncate(MAX_COLLECTIONS);
            report.collections = collections;
            report.database = WORKING.to_string();
            return report;
        }
        Ok(Err(error)) => error.to_string(),
        Err(_) => format!("timed out listing collections after {}ms", limit.as_millis()),
    };

    tracing::warn!(reason = %failure, "diagnostics could not list collections");
    report.database = format!("⚠️  Connected but Error: {}", truncate(&failure));

    report
}

/// `GET /test`
pub async fn test_database(State(gateway): State<Gateway>) -> Json<DiagnosticReport> {
    Json(collect(&gateway, EnvPresence::from_env()).await)
}
