use crate::domain::model::{HttpMethod, ProbeTimeouts, RecognitionSample, ServiceEndpoint};
use crate::utils::error::ServiceError;
use async_trait::async_trait;
use std::time::Duration;

/// One outbound request, fully resolved against the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

/// Raw answer from the service. Any status code, including errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Falls back to the raw text as a JSON string when the body is not JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|_| serde_json::Value::String(self.body.clone()))
    }
}

/// Sends a request and reports the answer. Only failures to obtain an
/// answer at all (refused, timed out, broken body) come back as errors.
#[async_trait]
pub trait ServiceTransport: Send + Sync {
    async fn send(&self, request: &ProbeRequest) -> Result<TransportResponse, ServiceError>;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &ServiceEndpoint;
    fn timeouts(&self) -> ProbeTimeouts;
    fn sample(&self) -> &RecognitionSample;
}
