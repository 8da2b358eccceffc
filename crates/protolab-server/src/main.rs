mod api;
mod auth;
mod config;
mod router;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use config::ServerConfig;
use protolab_core::AppCore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,protolab_server=debug".into()),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting Protolab backend server");

    let config = Arc::new(ServerConfig::load()?);
    let core = Arc::new(AppCore::new(&config.db_path)?);

    let app = router::build_router(core, config.clone());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Protolab listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
