use crate::domain::model::{
    CompareResponse, EncodeResponse, HttpMethod, ProbeTimeouts, RecognitionSample, ServiceEndpoint,
};
use crate::domain::ports::{ProbeRequest, TransportResponse};
use crate::utils::error::ServiceError;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeName {
    Health,
    Config,
    Encode,
    LegacyCompare,
}

impl ProbeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeName::Health => "health",
            ProbeName::Config => "config",
            ProbeName::Encode => "encode",
            ProbeName::LegacyCompare => "legacy_compare",
        }
    }
}

impl fmt::Display for ProbeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a probe sits in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// A hard failure here skips every later sequenced probe.
    Sequenced,
    /// Always attempted after the sequenced stage; never escalates.
    Independent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Success,
    ExpectedFailure,
    HardFailure,
}

/// Outcome of exactly one probe attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "disposition", content = "detail", rename_all = "snake_case")]
pub enum ProbeResult {
    Success(serde_json::Value),
    ExpectedFailure(String),
    HardFailure(ServiceError),
}

impl ProbeResult {
    pub fn disposition(&self) -> Disposition {
        match self {
            ProbeResult::Success(_) => Disposition::Success,
            ProbeResult::ExpectedFailure(_) => Disposition::ExpectedFailure,
            ProbeResult::HardFailure(_) => Disposition::HardFailure,
        }
    }

    pub fn is_hard_failure(&self) -> bool {
        matches!(self, ProbeResult::HardFailure(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSpec {
    pub name: ProbeName,
    pub method: HttpMethod,
    pub path: &'static str,
    pub timeout: Duration,
    pub body: Option<serde_json::Value>,
    pub stage: Stage,
}

impl ProbeSpec {
    pub fn request(&self, endpoint: &ServiceEndpoint) -> ProbeRequest {
        ProbeRequest {
            method: self.method,
            url: endpoint.url(self.path),
            body: self.body.clone(),
            timeout: self.timeout,
        }
    }
}

/// Ordered list of probes making up one verification run.
#[derive(Debug, Clone)]
pub struct ProbePlan {
    specs: Vec<ProbeSpec>,
}

impl ProbePlan {
    /// Health, config and encode in sequence, then the legacy compare call.
    pub fn standard(sample: &RecognitionSample, timeouts: &ProbeTimeouts) -> Self {
        let specs = vec![
            ProbeSpec {
                name: ProbeName::Health,
                method: HttpMethod::Get,
                path: "/",
                timeout: timeouts.health,
                body: None,
                stage: Stage::Sequenced,
            },
            ProbeSpec {
                name: ProbeName::Config,
                method: HttpMethod::Get,
                path: "/config",
                timeout: timeouts.config,
                body: None,
                stage: Stage::Sequenced,
            },
            ProbeSpec {
                name: ProbeName::Encode,
                method: HttpMethod::Post,
                path: "/encode",
                timeout: timeouts.encode,
                body: Some(serde_json::json!({
                    "image": sample.image,
                    "studentId": sample.student_id,
                })),
                stage: Stage::Sequenced,
            },
            ProbeSpec {
                name: ProbeName::LegacyCompare,
                method: HttpMethod::Post,
                path: "/compare",
                timeout: timeouts.compare,
                body: Some(serde_json::json!({
                    "url1": "test-url-1",
                    "url2": "test-url-2",
                })),
                stage: Stage::Independent,
            },
        ];
        Self { specs }
    }

    pub fn stage(&self, stage: Stage) -> impl Iterator<Item = &ProbeSpec> {
        self.specs.iter().filter(move |spec| spec.stage == stage)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Maps the raw outcome of a probe call onto its disposition.
pub fn classify(
    probe: ProbeName,
    outcome: Result<TransportResponse, ServiceError>,
) -> ProbeResult {
    match probe {
        ProbeName::Health | ProbeName::Config => classify_required(outcome),
        ProbeName::Encode => classify_encode(outcome),
        ProbeName::LegacyCompare => classify_legacy(outcome),
    }
}

fn classify_required(outcome: Result<TransportResponse, ServiceError>) -> ProbeResult {
    match outcome {
        Ok(response) if response.is_success() => ProbeResult::Success(response.json()),
        Ok(response) => ProbeResult::HardFailure(protocol_error(&response)),
        Err(err) => ProbeResult::HardFailure(err),
    }
}

fn classify_encode(outcome: Result<TransportResponse, ServiceError>) -> ProbeResult {
    match outcome {
        Ok(response) if response.is_success() => {
            let payload = response.json();
            let parsed: EncodeResponse =
                serde_json::from_value(payload.clone()).unwrap_or_default();
            if parsed.success {
                ProbeResult::Success(payload)
            } else {
                ProbeResult::ExpectedFailure(
                    parsed
                        .message
                        .unwrap_or_else(|| "service rejected the sample".to_string()),
                )
            }
        }
        Ok(response) if response.status == 400 => ProbeResult::ExpectedFailure(format!(
            "HTTP 400: {}",
            service_message(&response)
        )),
        Ok(response) => ProbeResult::HardFailure(protocol_error(&response)),
        Err(err) => ProbeResult::HardFailure(err),
    }
}

fn classify_legacy(outcome: Result<TransportResponse, ServiceError>) -> ProbeResult {
    match outcome {
        Ok(response) if response.is_success() => {
            let payload = response.json();
            let parsed: CompareResponse =
                serde_json::from_value(payload.clone()).unwrap_or_default();
            if parsed.deprecated {
                ProbeResult::Success(payload)
            } else {
                ProbeResult::ExpectedFailure(
                    "endpoint answered without a deprecation marker".to_string(),
                )
            }
        }
        Ok(response) => ProbeResult::ExpectedFailure(format!(
            "HTTP {}: {}",
            response.status,
            service_message(&response)
        )),
        Err(err) => ProbeResult::ExpectedFailure(err.to_string()),
    }
}

fn protocol_error(response: &TransportResponse) -> ServiceError {
    ServiceError::ProtocolError {
        status: response.status,
        body: response.body.clone(),
    }
}

// Prefers the service's own `message` field over the raw body.
fn service_message(response: &TransportResponse) -> String {
    response
        .json()
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| response.body.clone())
}
