//! Shared foundation for the Astra conversational graph-query assistant.
//!
//! Holds configuration, the cross-crate error type, common domain types,
//! and the bounded-text utility every boundary-crossing formatter uses.

pub mod config;
pub mod error;
pub mod text;
pub mod types;

pub use config::AstraConfig;
pub use error::{AstraError, Result};
