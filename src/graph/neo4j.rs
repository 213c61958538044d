//! Minimal Neo4j client over the HTTP transactional Cypher endpoint

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;

use crate::config::Neo4jConfig;
use crate::errors::AllycatError;
use crate::errors::Result;

/// A Cypher statement with parameters
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub statement: String,
    pub parameters: Value,
}

impl Statement {
    pub fn new(statement: impl Into<String>, parameters: Value) -> Self {
        Self {
            statement: statement.into(),
            parameters,
        }
    }
}

/// One result row keyed by column name
pub type Row = Map<String, Value>;

#[derive(Serialize)]
struct CommitRequest<'a> {
    statements: &'a [Statement],
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<Neo4jError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<RowData>,
}

#[derive(Debug, Deserialize)]
struct RowData {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Neo4jError {
    code: String,
    message: String,
}

/// Neo4j client
#[derive(Clone)]
pub struct Neo4jClient {
    client: Client,
    commit_url: String,
    user: String,
    password: String,
}

impl Neo4jClient {
    /// Create a client for `{uri}/db/{database}/tx/commit`
    pub fn new(config: &Neo4jConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AllycatError::HttpError(e.to_string()))?;

        let commit_url = format!(
            "{}/db/{}/tx/commit",
            config.uri.trim_end_matches('/'),
            config.database
        );

        Ok(Self {
            client,
            commit_url,
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    /// URL statements are committed to
    pub fn commit_url(&self) -> &str {
        &self.commit_url
    }

    /// Run a single statement in its own transaction
    pub async fn run(&self, statement: &str, parameters: Value) -> Result<Vec<Row>> {
        let mut results = self
            .run_all(&[Statement::new(statement, parameters)])
            .await?;
        Ok(results.pop().unwrap_or_default())
    }

    /// Run several statements in one transaction
    ///
    /// Any error reported by the server rolls the transaction back and is
    /// returned as a `GraphError` carrying the Neo4j status code.
    pub async fn run_all(&self, statements: &[Statement]) -> Result<Vec<Vec<Row>>> {
        debug!("Committing {} statement(s) to {}", statements.len(), self.commit_url);

        let response = self
            .client
            .post(&self.commit_url)
            .basic_auth(&self.user, Some(&self.password))
            .header("Accept", "application/json;charset=UTF-8")
            .json(&CommitRequest { statements })
            .send()
            .await
            .map_err(|e| AllycatError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AllycatError::GraphError(format!(
                "Neo4j HTTP error ({status}): {body}"
            )));
        }

        let body: CommitResponse = response
            .json()
            .await
            .map_err(|e| AllycatError::GraphError(format!("Failed to parse Neo4j response: {e}")))?;

        if let Some(err) = body.errors.first() {
            return Err(AllycatError::GraphError(format!(
                "{}: {}",
                err.code, err.message
            )));
        }

        Ok(body.results.into_iter().map(into_rows).collect())
    }
}

fn into_rows(result: StatementResult) -> Vec<Row> {
    result
        .data
        .into_iter()
        .map(|data| {
            result
                .columns
                .iter()
                .cloned()
                .zip(data.row)
                .collect::<Row>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_url() {
        let config = Neo4jConfig {
            uri: "http://localhost:7474/".to_string(),
            database: "graphrag".to_string(),
            ..Neo4jConfig::default()
        };
        let client = Neo4jClient::new(&config).unwrap();
        assert_eq!(client.commit_url(), "http://localhost:7474/db/graphrag/tx/commit");
    }

    #[test]
    fn test_into_rows_keys_by_column() {
        let response: CommitResponse = serde_json::from_str(
            r#"{"results":[{"columns":["title","score"],"data":[{"row":["About",0.9],"meta":[null,null]}]}],"errors":[]}"#,
        )
        .unwrap();
        let rows: Vec<Vec<Row>> = response.results.into_iter().map(into_rows).collect();
        assert_eq!(rows[0][0]["title"], "About");
        assert_eq!(rows[0][0]["score"], 0.9);
    }

    #[test]
    fn test_statement_serialization() {
        let stmt = Statement::new("RETURN $x AS x", serde_json::json!({"x": 1}));
        let body = serde_json::to_value(CommitRequest {
            statements: std::slice::from_ref(&stmt),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"statements": [{"statement": "RETURN $x AS x", "parameters": {"x": 1}}]})
        );
    }
}
