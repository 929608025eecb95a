//! Astra application binary - composition root.
//!
//! Ties the crates together into a single executable:
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Construct the graph executor, session store, chat pipeline, and
//!    messaging client eagerly (no lazy globals)
//! 3. Spawn the periodic session deep sweep
//! 4. Start the axum HTTP server

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use astra_api::{routes, AppState};
use astra_chat::{ChatPipeline, SessionStore};
use astra_core::AstraConfig;
use astra_graph::{GraphExecutor, HttpGraphExecutor};
use astra_messaging::MessagingClient;

mod cli;

use cli::CliArgs;

/// Periodic deep sweep of long-idle sessions, independent of the lazy
/// per-turn sweep.
async fn deep_sweep_loop(sessions: Arc<SessionStore>) {
    let mut interval = tokio::time::interval(Duration::from_secs(60 * 60));
    loop {
        interval.tick().await;
        let removed = sessions.deep_sweep();
        if removed > 0 {
            tracing::info!(removed, "Deep sweep removed idle sessions");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config, with env overlays for credentials.
    let config_file = args.resolve_config_path();
    let mut config = AstraConfig::load_or_default(&config_file).with_env_overrides();
    config.general.port = args.resolve_port(config.general.port);

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Astra v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Graph executor.
    let executor = HttpGraphExecutor::new(&config.graph)?;
    if executor.ping().await {
        tracing::info!(uri = %config.graph.uri, "Graph store reachable");
    } else {
        tracing::warn!(
            uri = %config.graph.uri,
            "Graph store unreachable at startup; queries will degrade until it comes back"
        );
    }
    let executor: Arc<dyn GraphExecutor> = Arc::new(executor);

    // Sessions and the per-turn pipeline.
    let sessions = Arc::new(SessionStore::new(&config.session));
    let pipeline = Arc::new(ChatPipeline::new(
        Arc::clone(&executor),
        Arc::clone(&sessions),
        &config.general.bot_name,
    ));

    // Outbound messaging.
    let messaging = Arc::new(MessagingClient::new(&config.twilio));
    if messaging.is_configured() {
        tracing::info!("Messaging client configured; outbound delivery enabled");
    } else {
        tracing::warn!("Messaging credentials absent; webhook replies only");
    }

    tokio::spawn(deep_sweep_loop(Arc::clone(&sessions)));

    let state = AppState::new(config, pipeline, executor, messaging);
    routes::start_server(state).await?;

    Ok(())
}
