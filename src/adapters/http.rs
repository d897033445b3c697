use crate::domain::model::HttpMethod;
use crate::domain::ports::{ProbeRequest, ServiceTransport, TransportResponse};
use crate::utils::error::{Result, ServiceError};
use async_trait::async_trait;
use reqwest::Client;

/// reqwest-backed transport. Each request carries its own timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("face-probe/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ServiceTransport for HttpTransport {
    async fn send(&self, request: &ProbeRequest) -> std::result::Result<TransportResponse, ServiceError> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        let mut builder = builder.timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_client_error(request, e))?;

        let status = response.status().as_u16();
        tracing::debug!("API response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| classify_client_error(request, e))?;

        Ok(TransportResponse { status, body })
    }
}

/// Folds a reqwest failure into the service error taxonomy.
pub fn classify_client_error(request: &ProbeRequest, err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout {
            url: request.url.clone(),
            timeout_ms: request.timeout.as_millis() as u64,
        }
    } else if err.is_connect() {
        ServiceError::ConnectionRefused {
            url: request.url.clone(),
        }
    } else {
        ServiceError::UnknownError {
            details: format!("{:?}", err),
        }
    }
}
