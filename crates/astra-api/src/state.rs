//! Application state shared across all route handlers.
//!
//! All services are constructed eagerly at startup and injected here; no
//! handler reaches for globals or lazily initializes a collaborator.

use std::sync::Arc;
use std::time::Instant;

use astra_chat::ChatPipeline;
use astra_core::AstraConfig;
use astra_graph::GraphExecutor;
use astra_messaging::MessagingClient;

/// Shared application state, cheap to clone across handler tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AstraConfig>,
    /// Per-turn orchestrator (classify, build, execute, format, record).
    pub pipeline: Arc<ChatPipeline>,
    /// Direct executor handle for the fixed stats/explore queries.
    pub executor: Arc<dyn GraphExecutor>,
    /// Outbound messaging client; unconfigured clients refuse sends.
    pub messaging: Arc<MessagingClient>,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        config: AstraConfig,
        pipeline: Arc<ChatPipeline>,
        executor: Arc<dyn GraphExecutor>,
        messaging: Arc<MessagingClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            pipeline,
            executor,
            messaging,
            start_time: Instant::now(),
        }
    }
}
