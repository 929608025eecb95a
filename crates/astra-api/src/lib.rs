//! Astra API crate - axum HTTP server and route handlers.
//!
//! Serves the web chat endpoint, the messaging webhook, and the read-only
//! health, stats, and explore endpoints.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
