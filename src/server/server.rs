use std::sync::Arc;
use anyhow::Result;
use axum::Router;
use tracing::info;
use crate::api::client::OssClient;
use crate::config::settings::SettingsConfig;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::server::api_routes;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub client: Arc<OssClient>,
}

impl AppState {
    pub fn new(metrics: &Metrics, client: Arc<OssClient>) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            client,
        }
    }
}

/// Lookup routes plus the metrics route when enabled.
pub async fn router(settings_config: &SettingsConfig, client: Arc<OssClient>) -> Router {
    let metrics = get_metrics().await;
    let state = AppState::new(metrics, client);

    Router::new()
        .merge(state.metrics_state.router(&settings_config.metrics))
        .merge(api_routes::router())
        .with_state(state)
}

/// Bind the configured address and serve until the listener fails.
pub async fn start(settings_config: &SettingsConfig, client: Arc<OssClient>) -> Result<()> {
    let app = router(settings_config, client).await;

    let bind_addr = &settings_config.server.host;
    let port = &settings_config.server.port;
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;
    info!("listening on {}:{}", bind_addr, port);
    get_metrics().await.up.set(1);
    axum::serve(listener, app).await?;

    Ok(())
}
