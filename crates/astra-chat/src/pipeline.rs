// ============================================================================
// Chat pipeline
// ============================================================================
//
// Orchestrates one conversational turn: clip the inbound utterance, classify
// it, plan a graph query, execute it when the plan calls for one, format the
// reply, and record the exchange. Every turn produces a reply; executor
// failures degrade to a technical-issue message rather than surfacing as
// errors to the channel.

use std::sync::Arc;

use astra_core::text;
use astra_core::types::{Channel, ResultRow};
use astra_graph::GraphExecutor;
use astra_nlu::{classify, Intent, QueryBuilder, QueryPlan};

use crate::format::ResponseFormatter;
use crate::session::SessionStore;

/// Inbound utterances are clipped to this many characters before processing.
pub const MAX_UTTERANCE_CHARS: usize = 1000;

/// Everything a channel needs to know about a completed turn. The web
/// endpoint surfaces the cypher and rows for transparency; the messaging
/// channel only ships the reply.
#[derive(Debug)]
pub struct TurnOutcome {
    pub reply: String,
    pub intent: Intent,
    pub cypher: Option<&'static str>,
    pub rows: Vec<ResultRow>,
    pub error: Option<String>,
}

impl TurnOutcome {
    fn canned(reply: String, intent: Intent) -> Self {
        Self {
            reply,
            intent,
            cypher: None,
            rows: Vec::new(),
            error: None,
        }
    }
}

pub struct ChatPipeline {
    executor: Arc<dyn GraphExecutor>,
    sessions: Arc<SessionStore>,
    formatter: ResponseFormatter,
}

impl ChatPipeline {
    pub fn new(
        executor: Arc<dyn GraphExecutor>,
        sessions: Arc<SessionStore>,
        bot_name: &str,
    ) -> Self {
        Self {
            executor,
            sessions,
            formatter: ResponseFormatter::new(bot_name),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn formatter(&self) -> &ResponseFormatter {
        &self.formatter
    }

    /// Runs one turn for `user_id`. Always returns a reply.
    pub async fn handle_message(
        &self,
        user_id: &str,
        raw_text: &str,
        channel: Channel,
    ) -> TurnOutcome {
        let text = text::clip(raw_text, MAX_UTTERANCE_CHARS);

        self.sessions.sweep();
        let session = self.sessions.touch(user_id);

        let intent = classify(text);
        tracing::debug!(?channel, ?intent, user_id, "classified utterance");

        let outcome = match QueryBuilder::build(intent, text) {
            QueryPlan::Canned(intent) => {
                let reply = match intent {
                    Intent::Greeting => self.formatter.greeting(),
                    Intent::Help => self.formatter.help(),
                    Intent::Capabilities => self.formatter.capabilities(),
                    Intent::Suggestions => self.formatter.suggestions(),
                    // Count includes the turn being answered.
                    Intent::Farewell => self.formatter.farewell(session.interaction_count + 1),
                    _ => self.formatter.greeting(),
                };
                TurnOutcome::canned(reply, intent)
            }
            QueryPlan::Graph(query) => {
                let cypher = query.cypher();
                match self.executor.execute(&query).await {
                    Ok(rows) => TurnOutcome {
                        reply: self.formatter.format_rows(text, &rows),
                        intent,
                        cypher: Some(cypher),
                        rows,
                        error: None,
                    },
                    Err(e) => {
                        tracing::error!(error = %e, user_id, "graph query failed");
                        TurnOutcome {
                            reply: self.formatter.technical_issue(text),
                            intent,
                            cypher: Some(cypher),
                            rows: Vec::new(),
                            error: Some(e.to_string()),
                        }
                    }
                }
            }
        };

        self.sessions.record(user_id, text, &outcome.reply);
        outcome
    }
}

// ============================================================================
// Tests
// ============================================================================
