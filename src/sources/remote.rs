//! Client for the hosted feedback endpoint.
//!
//! One GET per report:
//! `GET {base_url}?startDate=..&endDate=..` with a bearer token. The body is
//! either a JSON array of records or an object with a `feedback` array.

use super::adapter::FieldMapping;
use super::RecordSource;
use crate::analysis::window::ReportWindow;
use chrono::SecondsFormat;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Name reported for records fetched remotely.
pub const REMOTE_SOURCE_NAME: &str = "remote";

/// Failures talking to the remote endpoint. All are recoverable.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot connect to feedback endpoint at {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("feedback endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Connection settings for the remote endpoint.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

/// HTTP client for the feedback endpoint.
pub struct RemoteClient {
    config: RemoteConfig,
    http_client: reqwest::Client,
}

impl RemoteClient {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(RemoteError::Client)?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Fetch the raw records for `window`.
    pub async fn fetch(&self, window: &ReportWindow) -> Result<Vec<Value>, RemoteError> {
        let start = window.start().to_rfc3339_opts(SecondsFormat::Millis, true);
        let end = window.end().to_rfc3339_opts(SecondsFormat::Millis, true);
        debug!("GET {} startDate={} endDate={}", self.config.base_url, start, end);

        let response = self
            .http_client
            .get(&self.config.base_url)
            .query(&[("startDate", start.as_str()), ("endDate", end.as_str())])
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::Timeout(self.config.timeout_seconds)
                } else if e.is_connect() {
                    RemoteError::Connect(self.config.base_url.clone())
                } else {
                    RemoteError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status { status, body });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        let records = records_from_body(body)?;
        info!("Fetched {} records from feedback endpoint", records.len());
        Ok(records)
    }

    /// Fetch and wrap as a [`RecordSource`].
    pub async fn fetch_source(&self, window: &ReportWindow) -> Result<RecordSource, RemoteError> {
        let records = self.fetch(window).await?;
        Ok(RecordSource::new(
            REMOTE_SOURCE_NAME,
            FieldMapping::remote(),
            records,
        ))
    }
}

/// Pull the record array out of a response body.
pub fn records_from_body(body: Value) -> Result<Vec<Value>, RemoteError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("feedback") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(RemoteError::Decode(
                "expected a `feedback` array in response object".to_string(),
            )),
        },
        other => Err(RemoteError::Decode(format!(
            "expected an array or object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response on a local port.
    ///
    /// Returns the endpoint URL and a handle yielding the raw request head.
    pub(crate) async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/feedback", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (url, handle)
    }

    fn client_for(base_url: String) -> RemoteClient {
        RemoteClient::new(RemoteConfig {
            base_url,
            api_key: "test-key".to_string(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_records_from_array_body() {
        let records = records_from_body(json!([{"email": "a@x.com"}, {"email": "b@y.com"}]))
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_records_from_wrapped_body() {
        let records = records_from_body(json!({"feedback": [{"email": "a@x.com"}]})).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_records_from_unexpected_body() {
        assert!(matches!(
            records_from_body(json!({"data": []})),
            Err(RemoteError::Decode(_))
        ));
        assert!(matches!(
            records_from_body(json!("oops")),
            Err(RemoteError::Decode(msg)) if msg.contains("string")
        ));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_endpoint_errors() {
        let client = client_for("http://127.0.0.1:9/feedback".to_string());
        let window = ReportWindow::parse(Some("2025-09-01"), Some("2025-09-04")).unwrap();

        assert!(client.fetch(&window).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_sends_window_and_bearer_token() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"feedback":[{"email":"r@x.com","message":"hi","timestamp":"2025-09-02"}]}"#,
        )
        .await;
        let window = ReportWindow::parse(Some("2025-09-01"), Some("2025-09-04")).unwrap();

        let records = client_for(url).fetch(&window).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["email"], "r@x.com");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /feedback?"), "{}", request);
        assert!(request.contains("startdate=2025-09-01t00%3a00%3a00.000z"));
        assert!(request.contains("enddate=2025-09-04t00%3a00%3a00.000z"));
        assert!(request.contains("authorization: bearer test-key"));
    }

    #[tokio::test]
    async fn test_fetch_error_status_maps_to_status_error() {
        let (url, server) = serve_once("503 Service Unavailable", "unavailable").await;
        let window = ReportWindow::parse(Some("2025-09-01"), Some("2025-09-04")).unwrap();

        let err = client_for(url).fetch(&window).await.unwrap_err();
        match err {
            RemoteError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "unavailable");
            }
            other => panic!("expected status error, got {:?}", other),
        }
        server.await.unwrap();
    }
}
