//! Conversation layer: per-turn orchestration, result formatting, canned
//! replies, and the in-memory session store.

pub mod format;
pub mod pipeline;
pub mod replies;
pub mod session;

pub use format::{detect_shape, ResponseFormatter, Shape};
pub use pipeline::{ChatPipeline, TurnOutcome, MAX_UTTERANCE_CHARS};
pub use session::{SessionStore, UserSession};
