//! Warehouse session over the Snowflake SQL API (`/api/v2/statements`).
//!
//! The API is stateless on the wire: "opening" a session builds an HTTP
//! client that carries the auth headers, and every statement is a single
//! POST. Large results come back split into partitions; the first one is in
//! the POST response and the rest are fetched by statement handle.

use crate::config::toml_config::ConnectionConfig;
use crate::domain::model::ResultSet;
use crate::domain::ports::Session;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const STATEMENTS_PATH: &str = "/api/v2/statements";
const TOKEN_TYPE_HEADER: &str = "x-snowflake-authorization-token-type";

#[derive(Debug, Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warehouse: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementResponse {
    statement_handle: Option<String>,
    result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    data: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultSetMetaData {
    #[serde(default)]
    row_type: Vec<ColumnType>,
    #[serde(default)]
    partition_info: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ColumnType {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PartitionResponse {
    #[serde(default)]
    data: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// An open warehouse session. Dropping it (or calling [`close`](Self::close))
/// releases the underlying HTTP connection pool.
#[derive(Debug)]
pub struct SqlApiSession {
    client: Client,
    statements_url: String,
    config: ConnectionConfig,
}

impl SqlApiSession {
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.token)).map_err(|_| {
            DashboardError::ConfigValidationError {
                field: "connection.token".to_string(),
                message: "token contains characters not allowed in an HTTP header".to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            TOKEN_TYPE_HEADER,
            HeaderValue::from_static(config.token_type.as_header_value()),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // 大結果集的 partition 以 gzip 傳回
        let client = Client::builder()
            .default_headers(headers)
            .gzip(true)
            .user_agent(concat!("orders-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DashboardError::ConnectivityError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        let statements_url = format!(
            "{}{}",
            config.account_url.trim_end_matches('/'),
            STATEMENTS_PATH
        );
        tracing::info!("🔌 Warehouse session opened: {}", config.account_url);

        Ok(Self {
            client,
            statements_url,
            config: config.clone(),
        })
    }

    pub fn close(self) {
        tracing::debug!("Warehouse session closed: {}", self.config.account_url);
    }

    async fn fetch_partition(&self, handle: &str, partition: usize) -> Result<Vec<Vec<Option<String>>>> {
        let url = format!("{}/{}", self.statements_url, handle);
        tracing::debug!("Fetching partition {} of statement {}", partition, handle);

        let response = self
            .client
            .get(&url)
            .query(&[("partition", partition)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(query_error(status, &body));
        }

        let page: PartitionResponse = serde_json::from_str(&body)?;
        Ok(page.data)
    }
}

#[async_trait]
impl Session for SqlApiSession {
    async fn query(&self, statement: &str) -> Result<ResultSet> {
        let request = StatementRequest {
            statement,
            timeout: self.config.timeout_seconds(),
            database: self.config.database.as_deref(),
            schema: self.config.schema.as_deref(),
            warehouse: self.config.warehouse.as_deref(),
            role: self.config.role.as_deref(),
        };

        tracing::debug!("Submitting statement: {}", statement);
        let response = self
            .client
            .post(&self.statements_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // 202 = 語句仍在執行；不輪詢，直接失敗
        if status == StatusCode::ACCEPTED {
            return Err(DashboardError::QueryError {
                status: status.as_u16(),
                message: format!(
                    "statement did not finish within {}s",
                    self.config.timeout_seconds()
                ),
            });
        }
        if status != StatusCode::OK {
            return Err(query_error(status, &body));
        }

        let parsed: StatementResponse = serde_json::from_str(&body)?;
        let meta = parsed
            .result_set_meta_data
            .ok_or_else(|| DashboardError::DataError {
                table: statement.to_string(),
                message: "response has no resultSetMetaData".to_string(),
            })?;

        let columns = meta.row_type.into_iter().map(|c| c.name).collect();
        let mut rows = parsed.data;

        if meta.partition_info.len() > 1 {
            let handle = parsed
                .statement_handle
                .ok_or_else(|| DashboardError::DataError {
                    table: statement.to_string(),
                    message: "partitioned result without a statement handle".to_string(),
                })?;
            for partition in 1..meta.partition_info.len() {
                rows.extend(self.fetch_partition(&handle, partition).await?);
            }
        }

        tracing::debug!("Statement returned {} rows", rows.len());
        Ok(ResultSet { columns, rows })
    }
}

fn query_error(status: StatusCode, body: &str) -> DashboardError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.trim().to_string());

    DashboardError::QueryError {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_skips_unset_context() {
        let request = StatementRequest {
            statement: "SELECT order_number, order_name FROM orders",
            timeout: 60,
            database: Some("ANALYTICS"),
            schema: None,
            warehouse: None,
            role: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "statement": "SELECT order_number, order_name FROM orders",
                "timeout": 60,
                "database": "ANALYTICS"
            })
        );
    }

    #[test]
    fn test_query_error_prefers_server_message() {
        let err = query_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"code":"002003","message":"Object 'ORDERS' does not exist"}"#,
        );
        match err {
            DashboardError::QueryError { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Object 'ORDERS' does not exist");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = query_error(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert!(matches!(err, DashboardError::QueryError { message, .. } if message == "upstream down"));
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_config() {
        let config = ConnectionConfig::new("not a url", "token");
        assert!(SqlApiSession::connect(&config).await.is_err());
    }
}
