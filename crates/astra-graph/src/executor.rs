//! The executor seam.

use astra_core::types::ResultRow;
use astra_nlu::GraphQuery;
use async_trait::async_trait;

use crate::error::ExecutionError;

/// Executes a parameterized query against the graph store.
///
/// Implementations must be safe to call with the store unreachable; that
/// case surfaces as an [`ExecutionError`], never a panic. A query that
/// matches nothing returns an empty vector.
#[async_trait]
pub trait GraphExecutor: Send + Sync {
    async fn execute(&self, query: &GraphQuery) -> Result<Vec<ResultRow>, ExecutionError>;
}
