//! Environmental tracker service: per-user metric entries, per-category
//! summaries over trailing windows, and impact limits.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;

use config::AppConfig;
use services::EnvironmentalStore;

pub struct AppState {
    pub store: Arc<dyn EnvironmentalStore>,
    pub config: AppConfig,
    pub metrics_handle: PrometheusHandle,
}

/// Assemble the service router. Data routes live under the configured
/// prefix; `/health` and `/metrics` stay at the root.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route(
            "/environmental-data",
            get(routes::environmental_data::list_environmental_data)
                .post(routes::environmental_data::add_environmental_data),
        )
        .route(
            "/environmental-data/summary",
            get(routes::environmental_data::get_summary),
        )
        .route(
            "/impact-limits",
            get(routes::impact_limits::list_impact_limits)
                .post(routes::impact_limits::set_impact_limit),
        );

    let prefix = state.config.route_prefix();
    let app = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(&prefix, api)
    };

    app.route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .layer(axum::middleware::from_fn(
            envtrack_shared::middleware::metrics_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
