//! Query executor adapter for the external graph store.
//!
//! The store is a black box behind [`GraphExecutor`]: execute a template
//! plus bound parameters, get back ordered rows, and surface transport
//! failures as a typed [`ExecutionError`]. An empty row set is a normal
//! outcome, not an error.

pub mod client;
pub mod error;
pub mod executor;
pub mod mock;

pub use client::HttpGraphExecutor;
pub use error::ExecutionError;
pub use executor::GraphExecutor;
pub use mock::MockGraphExecutor;
