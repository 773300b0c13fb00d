use std::sync::Arc;

use envtrack_environmental::config::AppConfig;
use envtrack_environmental::services::PgStore;
use envtrack_environmental::{build_router, AppState};
use envtrack_shared::clients::db::create_pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    envtrack_shared::middleware::init_tracing("envtrack-environmental");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url, config.db_pool_size)?;
    let metrics_handle = envtrack_shared::middleware::init_metrics()?;

    tracing::info!(
        default_user_id = config.default_user_id,
        api_prefix = %config.route_prefix(),
        "configuration loaded"
    );

    let state = Arc::new(AppState {
        store: Arc::new(PgStore::new(db)),
        config,
        metrics_handle,
    });

    let app = build_router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "envtrack-environmental starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
