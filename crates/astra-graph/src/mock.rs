//! In-memory executor for tests and store-less operation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use astra_core::types::ResultRow;
use astra_nlu::GraphQuery;
use async_trait::async_trait;

use crate::error::ExecutionError;
use crate::executor::GraphExecutor;

/// Failure mode a mock can be armed with.
#[derive(Debug, Clone, Copy)]
enum FailureMode {
    None,
    Timeout,
    Unavailable,
}

/// Executor that returns canned rows without any I/O.
///
/// Records how many times it was called so tests can assert that sentinel
/// plans never reach the store.
pub struct MockGraphExecutor {
    rows: Vec<ResultRow>,
    failure: FailureMode,
    calls: AtomicUsize,
}

impl MockGraphExecutor {
    /// Always returns the given rows.
    pub fn with_rows(rows: Vec<ResultRow>) -> Self {
        Self {
            rows,
            failure: FailureMode::None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always returns zero rows.
    pub fn empty() -> Self {
        Self::with_rows(Vec::new())
    }

    /// Always fails with a timeout.
    pub fn timing_out() -> Self {
        Self {
            rows: Vec::new(),
            failure: FailureMode::Timeout,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails as unreachable.
    pub fn unavailable() -> Self {
        Self {
            rows: Vec::new(),
            failure: FailureMode::Unavailable,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of execute calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GraphExecutor for MockGraphExecutor {
    async fn execute(&self, _query: &GraphQuery) -> Result<Vec<ResultRow>, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure {
            FailureMode::None => Ok(self.rows.clone()),
            FailureMode::Timeout => Err(ExecutionError::Timeout(Duration::from_secs(10))),
            FailureMode::Unavailable => Err(ExecutionError::Query {
                code: "Neo.TransientError.General.ServiceUnavailable".to_string(),
                message: "store unreachable".to_string(),
            }),
        }
    }
}
