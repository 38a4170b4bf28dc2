//! Remote session API client
//!
//! Every request carries a fresh trace-correlation header so a failing
//! call can be matched against server-side logs.

mod http;

pub use http::UreqTransport;

use crate::error::{TandemError, TandemResult};
use crate::session::{SessionId, SessionStatus};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

/// Default name of the trace-correlation header
pub const DEFAULT_TRACE_HEADER: &str = "x-trace-id";

/// HTTP methods used by the session API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Outbound request, relative to the transport's base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub endpoint: String,
    pub headers: Vec<(String, String)>,
}

/// Failures reported by a transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("{0}")]
    Connection(String),
}

/// HTTP transport with its own base URL and authentication
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the response body
    async fn send(&self, request: &ApiRequest) -> Result<String, TransportError>;

    /// Absolute URL for an endpoint
    fn url(&self, endpoint: &str) -> String;

    /// Headers the transport adds itself, with secrets redacted
    fn base_headers(&self) -> Vec<(String, String)>;
}

#[derive(Deserialize)]
struct CreateResponse {
    id: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: String,
}

/// Client for the session endpoints
pub struct SessionClient {
    transport: Arc<dyn Transport>,
    trace_header: String,
}

impl SessionClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            trace_header: DEFAULT_TRACE_HEADER.to_string(),
        }
    }

    /// Use a different trace-correlation header name
    pub fn with_trace_header(mut self, name: impl Into<String>) -> Self {
        self.trace_header = name.into();
        self
    }

    /// Send a traced request and decode its JSON body
    ///
    /// Failures are logged with method, URL and header context, then
    /// returned as-is; nothing is retried here.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        endpoint: &str,
    ) -> TandemResult<T> {
        let request = ApiRequest {
            method,
            endpoint: endpoint.to_string(),
            headers: vec![(self.trace_header.clone(), Uuid::new_v4().to_string())],
        };
        let url = self.transport.url(endpoint);
        debug!("{} {}", method, url);

        let body = match self.transport.send(&request).await {
            Ok(body) => body,
            Err(e) => {
                let headers: serde_json::Map<String, serde_json::Value> = request
                    .headers
                    .iter()
                    .chain(self.transport.base_headers().iter())
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect();
                let context = serde_json::json!({
                    "method": method.to_string(),
                    "url": url,
                    "headers": headers,
                });
                error!("{}", context);

                return Err(TandemError::Network {
                    method: method.to_string(),
                    url,
                    source: e,
                });
            }
        };

        serde_json::from_str(&body).map_err(|e| TandemError::InvalidResponse {
            url,
            reason: e.to_string(),
        })
    }

    /// Create a new session
    ///
    /// A blank id would be persisted and resumed as a real session, so it is
    /// rejected as an invalid response.
    pub async fn create(&self) -> TandemResult<SessionId> {
        let response: CreateResponse = self.request(HttpMethod::Post, "instance").await?;
        if response.id.trim().is_empty() {
            return Err(TandemError::InvalidResponse {
                url: self.transport.url("instance"),
                reason: "empty session id".to_string(),
            });
        }
        Ok(SessionId::new(response.id))
    }

    /// Query the current status of a session
    pub async fn status(&self, id: &SessionId) -> TandemResult<SessionStatus> {
        let response: StatusResponse = self
            .request(HttpMethod::Get, &format!("instance/{}/status", id))
            .await?;
        Ok(SessionStatus::from(response.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;

    #[tokio::test]
    async fn create_returns_assigned_id() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(r#"{"id": "sess-1"}"#);
        let client = SessionClient::new(transport.clone());

        let id = client.create().await.unwrap();

        assert_eq!(id.as_str(), "sess-1");
        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[0].endpoint, "instance");
    }

    #[tokio::test]
    async fn status_queries_instance_endpoint() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(r#"{"status": "Ready"}"#);
        let client = SessionClient::new(transport.clone());

        let status = client.status(&SessionId::new("abc")).await.unwrap();

        assert_eq!(status, SessionStatus::Ready);
        assert_eq!(transport.requests()[0].endpoint, "instance/abc/status");
        assert_eq!(transport.requests()[0].method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn every_request_gets_a_fresh_trace_header() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(r#"{"status": "Pending"}"#);
        transport.respond(r#"{"status": "Pending"}"#);
        let client = SessionClient::new(transport.clone()).with_trace_header("x-correlation");

        let id = SessionId::new("abc");
        client.status(&id).await.unwrap();
        client.status(&id).await.unwrap();

        let sent = transport.requests();
        let traces: Vec<&str> = sent
            .iter()
            .map(|r| {
                r.headers
                    .iter()
                    .find(|(k, _)| k == "x-correlation")
                    .map(|(_, v)| v.as_str())
                    .unwrap()
            })
            .collect();
        assert_ne!(traces[0], traces[1]);
        assert!(Uuid::parse_str(traces[0]).is_ok());
    }

    #[tokio::test]
    async fn transport_failure_becomes_network_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(TransportError::Status(502));
        let client = SessionClient::new(transport);

        let err = client.create().await.unwrap_err();

        match err {
            TandemError::Network { method, url, source } => {
                assert_eq!(method, "POST");
                assert_eq!(url, "https://api.test/instance");
                assert_eq!(source, TransportError::Status(502));
            }
            other => panic!("expected Network, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(r#"{"unexpected": true}"#);
        let client = SessionClient::new(transport);

        let err = client.create().await.unwrap_err();
        assert!(matches!(err, TandemError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn blank_id_is_invalid_response() {
        for body in [r#"{"id": ""}"#, r#"{"id": "  "}"#] {
            let transport = Arc::new(ScriptedTransport::new());
            transport.respond(body);
            let client = SessionClient::new(transport);

            match client.create().await.unwrap_err() {
                TandemError::InvalidResponse { url, reason } => {
                    assert_eq!(url, "https://api.test/instance");
                    assert_eq!(reason, "empty session id");
                }
                other => panic!("expected InvalidResponse, got {other:?}"),
            }
        }
    }
}
