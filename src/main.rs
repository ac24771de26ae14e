use anyhow::Context;
use eddy_app::modules;
use eddy_db::Gateway;
use eddy_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Eddy & Ink settings")?;
    eddy_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        port = settings.server.port,
        "eddy-app bootstrap starting"
    );

    let gateway = Gateway::connect(
        settings.database.url.as_deref(),
        settings.database.name.as_deref(),
    )
    .await;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &gateway);
    registry
        .init_modules(&InitCtx {
            settings: &settings,
        })
        .await?;

    tracing::info!("eddy-app bootstrap complete");

    let served = eddy_http::start_server(&registry, &settings, gateway).await;
    registry.stop_modules().await?;
    served
}
