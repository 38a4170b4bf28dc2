//! Blocking HTTP transport backed by ureq
//!
//! Requests run on the blocking thread pool so the async lifecycle never
//! stalls the runtime.

use super::{ApiRequest, HttpMethod, Transport, TransportError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Transport for the remote session API
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl UreqTransport {
    /// Create a transport for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn with_headers<B>(
        &self,
        mut builder: ureq::RequestBuilder<B>,
        headers: &[(String, String)],
    ) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = &self.token {
            builder = builder.header("authorization", format!("Bearer {}", token).as_str());
        }
        builder.header("accept", "application/json")
    }

    fn send_blocking(&self, request: &ApiRequest) -> Result<String, TransportError> {
        let url = self.url(&request.endpoint);

        let result = match request.method {
            HttpMethod::Get => self
                .with_headers(self.agent.get(url.as_str()), &request.headers)
                .call(),
            HttpMethod::Post => self
                .with_headers(self.agent.post(url.as_str()), &request.headers)
                .send_empty(),
        };

        let mut response = result.map_err(map_error)?;
        debug!("{} {} -> {}", request.method, url, response.status());

        response.body_mut().read_to_string().map_err(map_error)
    }
}

fn map_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::StatusCode(code) => TransportError::Status(code),
        other => TransportError::Connection(other.to_string()),
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn send(&self, request: &ApiRequest) -> Result<String, TransportError> {
        let transport = self.clone();
        let request = request.clone();

        tokio::task::spawn_blocking(move || transport.send_blocking(&request))
            .await
            .map_err(|e| TransportError::Connection(format!("request task failed: {}", e)))?
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn base_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        if self.token.is_some() {
            headers.push(("authorization".to_string(), "Bearer ***".to_string()));
        }
        headers
    }
}
