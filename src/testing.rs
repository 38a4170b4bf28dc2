//! Test doubles shared by unit tests

use crate::api::{ApiRequest, Transport, TransportError};
use crate::error::{TandemError, TandemResult};
use crate::probe::VersionProbe;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Transport replaying queued responses in order
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<String, TransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(&self, body: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(body.into()));
    }

    pub fn fail(&self, err: TransportError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("script exhausted".into())))
    }

    fn url(&self, endpoint: &str) -> String {
        format!("https://api.test/{}", endpoint)
    }

    fn base_headers(&self) -> Vec<(String, String)> {
        vec![("authorization".to_string(), "Bearer ***".to_string())]
    }
}

/// Probe returning a fixed version string
pub struct FixedProbe(String);

impl FixedProbe {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }
}

#[async_trait]
impl VersionProbe for FixedProbe {
    async fn version(&self) -> TandemResult<String> {
        Ok(self.0.clone())
    }
}

/// Probe whose command always exits unsuccessfully
pub struct FailingProbe;

#[async_trait]
impl VersionProbe for FailingProbe {
    async fn version(&self) -> TandemResult<String> {
        Err(TandemError::command_exec("node -v", "node: not found"))
    }
}
