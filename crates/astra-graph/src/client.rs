//! HTTP client for the Neo4j transaction API.
//!
//! Speaks the transaction-commit endpoint
//! (`POST {base}/db/{database}/tx/commit`) with basic auth. Each call is a
//! single read-only statement; no multi-statement transactions are needed.

use std::time::Duration;

use astra_core::config::GraphConfig;
use astra_core::types::ResultRow;
use astra_nlu::GraphQuery;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ExecutionError;
use crate::executor::GraphExecutor;

/// Graph executor backed by the Neo4j HTTP API.
pub struct HttpGraphExecutor {
    client: reqwest::Client,
    endpoint: String,
    user: String,
    password: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Deserialize)]
struct TxResult {
    columns: Vec<String>,
    data: Vec<TxRow>,
}

#[derive(Deserialize)]
struct TxRow {
    row: Vec<Value>,
}

#[derive(Deserialize)]
struct TxError {
    code: String,
    message: String,
}

impl HttpGraphExecutor {
    /// Build an executor from the graph section of the config.
    pub fn new(config: &GraphConfig) -> Result<Self, ExecutionError> {
        let timeout = Duration::from_secs(config.query_timeout_secs);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/db/{}/tx/commit",
                config.uri.trim_end_matches('/'),
                config.database
            ),
            user: config.user.clone(),
            password: config.password.clone(),
            timeout,
        })
    }

    /// Run a trivial statement to probe connectivity.
    pub async fn ping(&self) -> bool {
        let body = serde_json::json!({
            "statements": [{ "statement": "RETURN 1", "parameters": {} }]
        });
        match self.post(&body).await {
            Ok(resp) => resp.errors.is_empty(),
            Err(_) => false,
        }
    }

    async fn post(&self, body: &Value) -> Result<TxResponse, ExecutionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.user, Some(&self.password))
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let response = response.error_for_status().map_err(ExecutionError::from)?;
        let parsed: TxResponse = response.json().await.map_err(ExecutionError::from)?;
        Ok(parsed)
    }

    fn classify(&self, err: reqwest::Error) -> ExecutionError {
        if err.is_timeout() {
            ExecutionError::Timeout(self.timeout)
        } else {
            ExecutionError::Transport(err)
        }
    }

    /// Zip result columns with each row into an insertion-ordered mapping.
    fn rows_from(result: TxResult) -> Vec<ResultRow> {
        result
            .data
            .into_iter()
            .map(|tx_row| {
                let mut row = ResultRow::new();
                for (column, value) in result.columns.iter().zip(tx_row.row) {
                    row.insert(column.clone(), value);
                }
                row
            })
            .collect()
    }
}

#[async_trait]
impl GraphExecutor for HttpGraphExecutor {
    async fn execute(&self, query: &GraphQuery) -> Result<Vec<ResultRow>, ExecutionError> {
        tracing::debug!(template = ?query.template, "Executing graph query");

        let body = serde_json::json!({
            "statements": [{
                "statement": query.cypher(),
                "parameters": query.params,
            }]
        });

        let parsed = self.post(&body).await?;

        if let Some(first) = parsed.errors.into_iter().next() {
            return Err(ExecutionError::Query {
                code: first.code,
                message: first.message,
            });
        }

        let result = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ExecutionError::Malformed("empty results array".to_string()))?;

        let rows = Self::rows_from(result);
        tracing::debug!(rows = rows.len(), "Graph query returned");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GraphConfig {
        GraphConfig {
            uri: "http://localhost:7474/".to_string(),
            user: "neo4j".to_string(),
            password: "pw".to_string(),
            database: "neo4j".to_string(),
            query_timeout_secs: 10,
        }
    }

    #[test]
    fn test_endpoint_construction_strips_trailing_slash() {
        let exec = HttpGraphExecutor::new(&config()).unwrap();
        assert_eq!(exec.endpoint, "http://localhost:7474/db/neo4j/tx/commit");
    }

    #[test]
    fn test_rows_from_zips_columns_in_order() {
        let result = TxResult {
            columns: vec!["satellite_name".to_string(), "purpose".to_string()],
            data: vec![
                TxRow {
                    row: vec!["Aryabhata".into(), "Science".into()],
                },
                TxRow {
                    row: vec!["Bhaskara".into(), "Earth observation".into()],
                },
            ],
        };
        let rows = HttpGraphExecutor::rows_from(result);
        assert_eq!(rows.len(), 2);
        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, vec!["satellite_name", "purpose"]);
        assert_eq!(rows[1].get("satellite_name").unwrap(), "Bhaskara");
    }

    #[test]
    fn test_rows_from_empty_data() {
        let result = TxResult {
            columns: vec!["answer".to_string()],
            data: vec![],
        };
        assert!(HttpGraphExecutor::rows_from(result).is_empty());
    }

    #[test]
    fn test_tx_response_parsing() {
        let json = r#"{
            "results": [{
                "columns": ["satellite_count"],
                "data": [{"row": [42], "meta": [null]}]
            }],
            "errors": []
        }"#;
        let parsed: TxResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert!(parsed.errors.is_empty());
        let rows = HttpGraphExecutor::rows_from(parsed.results.into_iter().next().unwrap());
        assert_eq!(rows[0].get("satellite_count").unwrap(), 42);
    }

    #[test]
    fn test_tx_error_parsing() {
        let json = r#"{
            "results": [],
            "errors": [{
                "code": "Neo.ClientError.Security.Unauthorized",
                "message": "Invalid credentials"
            }]
        }"#;
        let parsed: TxResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].code, "Neo.ClientError.Security.Unauthorized");
    }
}
