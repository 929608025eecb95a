// ============================================================================
// Route handlers
// ============================================================================
//
// Each handler extracts request data via axum extractors, drives the chat
// pipeline or the fixed stats/explore queries, and returns JSON (or TwiML
// for the messaging webhook). Endpoints degrade in-band: a broken store
// produces an `error` field, not a 5xx.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use astra_chat::pipeline::MAX_UTTERANCE_CHARS;
use astra_core::text;
use astra_core::types::Channel;
use astra_messaging::{signature, twiml};
use astra_nlu::QueryBuilder;

use crate::error::ApiError;
use crate::state::AppState;

/// Session key for turns arriving over the web channel.
const WEB_USER_ID: &str = "web";

/// Whole-webhook processing budget, including the store call.
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_CYPHER_ECHO_CHARS: usize = 500;
const MAX_RESULT_ITEMS: usize = 50;
const MAX_FORMATTED_CHARS: usize = 2000;
const MAX_ERROR_CHARS: usize = 500;
const MAX_SENDER_CHARS: usize = 50;
const MAX_MESSAGE_SID_CHARS: usize = 100;

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub text: String,
    /// Accepted for forward compatibility; not threaded into the pipeline.
    #[serde(default)]
    pub context: Option<Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    pub cypher: String,
    pub results: Vec<Value>,
    pub formatted_response: String,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub graph_store: String,
    pub messaging: String,
    pub active_sessions: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookStatusResponse {
    pub status: String,
    pub bot_name: String,
    pub active_sessions: usize,
}

// =============================================================================
// Web query endpoint
// =============================================================================

/// POST /query - run one chat turn for the web widget.
///
/// Never fails: pipeline degradation lands in the `error` field with
/// `success: false`. Echoed cypher, results, reply, and error strings are
/// all bounded.
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Json<QueryResponse> {
    let outcome = state
        .pipeline
        .handle_message(WEB_USER_ID, &request.text, Channel::Web)
        .await;

    let cypher = outcome.cypher.unwrap_or_default();
    let results: Vec<Value> = outcome
        .rows
        .into_iter()
        .take(MAX_RESULT_ITEMS)
        .map(Value::Object)
        .collect();

    Json(QueryResponse {
        success: outcome.error.is_none(),
        cypher: text::clip(cypher, MAX_CYPHER_ECHO_CHARS).to_string(),
        results,
        formatted_response: text::clip(&outcome.reply, MAX_FORMATTED_CHARS).to_string(),
        error: outcome
            .error
            .map(|e| text::clip(&e, MAX_ERROR_CHARS).to_string())
            .unwrap_or_default(),
    })
}

// =============================================================================
// Messaging webhook
// =============================================================================

/// POST /webhook/whatsapp - inbound message from the messaging provider.
///
/// The form body is read raw so the provider signature can be checked over
/// the exact parameters sent. A failed signature is the only hard failure;
/// from there on every outcome, including the 30 s processing timeout,
/// answers HTTP 200 with a well-formed TwiML envelope.
pub async fn whatsapp_webhook(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Result<Response, ApiError> {
    let params: Vec<(String, String)> = serde_urlencoded::from_str(&body)
        .map_err(|e| ApiError::BadRequest(format!("unparseable form body: {e}")))?;

    if state.config.twilio.validate_signatures {
        let provided = headers
            .get("X-Twilio-Signature")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let url = signed_url(&state.config.general.public_base_url, &uri);
        if !signature::validate(&state.config.twilio.auth_token, &url, &params, provided) {
            tracing::warn!(%url, "webhook signature validation failed");
            return Err(ApiError::Forbidden("invalid request signature".to_string()));
        }
    }

    let message_body = text::clip(form_field(&params, "Body"), MAX_UTTERANCE_CHARS);
    let sender = text::clip(form_field(&params, "From"), MAX_SENDER_CHARS);
    let message_sid = text::clip(form_field(&params, "MessageSid"), MAX_MESSAGE_SID_CHARS);
    let user_id = sender.strip_prefix("whatsapp:").unwrap_or(sender);

    tracing::info!(from = %sender, sid = %message_sid, "inbound webhook message");

    let turn = async {
        let outcome = state
            .pipeline
            .handle_message(user_id, message_body, Channel::Messaging)
            .await;

        // Outbound delivery is best effort; its failure never alters the
        // envelope committed to the webhook caller.
        if state.messaging.is_configured() {
            if let Err(e) = state.messaging.send(sender, &outcome.reply).await {
                tracing::error!(error = %e, to = %sender, "outbound delivery failed");
            }
        }
        outcome.reply
    };

    let reply = match tokio::time::timeout(WEBHOOK_TIMEOUT, turn).await {
        Ok(reply) => reply,
        Err(_) => {
            tracing::error!(from = %sender, "webhook processing timeout");
            "⏱️ Processing timeout. Please try again in a moment.".to_string()
        }
    };

    Ok(xml_response(twiml::message_response(&reply)))
}

/// GET /webhook/whatsapp/status - liveness info for the messaging channel.
pub async fn webhook_status(State(state): State<AppState>) -> Json<WebhookStatusResponse> {
    Json(WebhookStatusResponse {
        status: "active".to_string(),
        bot_name: state.config.general.bot_name.clone(),
        active_sessions: state.pipeline.sessions().active_count(),
    })
}

// =============================================================================
// Health / stats / explore
// =============================================================================

/// GET /health - never fails, even with every collaborator down.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        graph_store: collaborator_state(!state.config.graph.uri.is_empty()),
        messaging: collaborator_state(state.messaging.is_configured()),
        active_sessions: state.pipeline.sessions().active_count(),
    })
}

/// GET /api/stats - fixed aggregate count query.
pub async fn stats(State(state): State<AppState>) -> Json<Value> {
    match state.executor.execute(&QueryBuilder::statistics()).await {
        Ok(rows) => {
            let statistics = rows
                .into_iter()
                .next()
                .map(Value::Object)
                .unwrap_or_else(|| Value::Object(Default::default()));
            Json(serde_json::json!({
                "success": true,
                "statistics": statistics,
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, "stats query failed");
            Json(serde_json::json!({
                "error": format!("Failed to get statistics: {e}"),
            }))
        }
    }
}

/// GET /api/explore/{category} - fixed listing query per category.
///
/// Only the four listing categories are served here; anything else reports
/// an unknown category in-band.
pub async fn explore(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<Value> {
    let query = match QueryBuilder::listing(&category) {
        Ok(query) => query,
        Err(e) => {
            return Json(serde_json::json!({
                "error": e.to_string(),
            }))
        }
    };

    match state.executor.execute(&query).await {
        Ok(rows) => {
            let results: Vec<Value> = rows.into_iter().map(Value::Object).collect();
            Json(serde_json::json!({
                "success": true,
                "category": category,
                "results": results,
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, category = %category, "explore query failed");
            Json(serde_json::json!({
                "error": format!("Failed to explore category: {e}"),
            }))
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn form_field<'a>(params: &'a [(String, String)], name: &str) -> &'a str {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

/// Reconstructs the URL the provider signed: the configured public base
/// plus the path and query actually requested.
fn signed_url(public_base_url: &str, uri: &Uri) -> String {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    format!("{}{}", public_base_url.trim_end_matches('/'), path_and_query)
}

fn collaborator_state(configured: bool) -> String {
    if configured { "configured" } else { "unconfigured" }.to_string()
}

fn xml_response(xml: String) -> Response {
    ([(header::CONTENT_TYPE, "application/xml")], xml).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_url_joins_base_and_path() {
        let uri: Uri = "/webhook/whatsapp".parse().unwrap();
        assert_eq!(
            signed_url("https://astra.example.com/", &uri),
            "https://astra.example.com/webhook/whatsapp"
        );
    }

    #[test]
    fn test_signed_url_keeps_query_string() {
        let uri: Uri = "/webhook/whatsapp?x=1".parse().unwrap();
        assert_eq!(
            signed_url("https://astra.example.com", &uri),
            "https://astra.example.com/webhook/whatsapp?x=1"
        );
    }

    #[test]
    fn test_form_field_missing_is_empty() {
        let params = vec![("Body".to_string(), "hello".to_string())];
        assert_eq!(form_field(&params, "Body"), "hello");
        assert_eq!(form_field(&params, "From"), "");
    }
}
