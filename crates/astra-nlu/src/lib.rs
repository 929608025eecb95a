//! Intent classification and graph-query construction.
//!
//! Maps raw utterances to a closed intent set via lexical pattern matching,
//! then builds parameterized cypher plans. User text only ever travels as
//! bound parameters; query template text is fixed at compile time.

pub mod builder;
pub mod classifier;

pub use builder::{BuildError, GraphQuery, QueryBuilder, QueryPlan, QueryTemplate};
pub use classifier::{classify, Intent};
