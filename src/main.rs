pub mod api;
pub mod config;
pub mod data_structures;

use crate::api::{build_router, AppState};
use crate::data_structures::new_shared_session;
use anyhow::Context;
use powermap::api::PropertyAnalyzer;
use std::{net::SocketAddr, sync::Arc};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::AppConfig::load()?;

    // Initialize tracing with node_name in all logs
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("powermap=info,powermap_server=info,tower_http=info")),
        )
        .with_target(false)
        .init();

    // Set a global span with node_name for all subsequent logs
    let _span = tracing::info_span!("node", name = %app_config.node_name).entered();

    tracing::info!("Starting powermap-server");
    tracing::info!(environment = %app_config.environment, port = app_config.port, "Loaded configuration");

    let analysis_config = app_config.analysis().context("loading analysis config")?;
    tracing::info!(
        datasets = analysis_config.datasets.len(),
        data_dir = %analysis_config.data_dir.display(),
        "Analysis config ready"
    );
    let analyzer = PropertyAnalyzer::new(analysis_config)?;

    let app_state = AppState {
        analyzer: Arc::new(analyzer),
        session: new_shared_session(),
    };

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(app_config.rate_limit_per_second)
            .burst_size(app_config.rate_limit_burst)
            .finish()
            .context("invalid rate limit settings")?,
    );

    let app = build_router(app_state)
        .layer(GovernorLayer::new(governor_conf))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    tracing::info!(%addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
