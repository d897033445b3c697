use crate::core::probe::{Disposition, ProbeName, ProbeResult};
use crate::domain::model::{ConfigResponse, HealthResponse, ServiceEndpoint};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct ProbeEntry {
    pub probe: ProbeName,
    #[serde(flatten)]
    pub result: ProbeResult,
    #[serde(rename = "duration_ms", serialize_with = "duration_as_millis")]
    pub duration: Duration,
}

/// Results of one verification run, in probe order.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub endpoint: ServiceEndpoint,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    entries: Vec<ProbeEntry>,
    skipped: Vec<ProbeName>,
}

impl AggregateReport {
    pub fn new(endpoint: ServiceEndpoint) -> Self {
        Self {
            endpoint,
            started_at: Utc::now(),
            finished_at: None,
            entries: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ProbeEntry) {
        self.entries.push(entry);
    }

    pub fn mark_skipped(&mut self, probe: ProbeName) {
        self.skipped.push(probe);
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn entries(&self) -> &[ProbeEntry] {
        &self.entries
    }

    /// Probes that were never attempted because an earlier probe hard-failed.
    pub fn skipped(&self) -> &[ProbeName] {
        &self.skipped
    }

    pub fn get(&self, probe: ProbeName) -> Option<&ProbeEntry> {
        self.entries.iter().find(|e| e.probe == probe)
    }

    pub fn dispositions(&self) -> Vec<(ProbeName, Disposition)> {
        self.entries
            .iter()
            .map(|e| (e.probe, e.result.disposition()))
            .collect()
    }

    /// Expected failures count as passes.
    pub fn passed(&self) -> bool {
        !self.entries.iter().any(|e| e.result.is_hard_failure())
    }

    pub fn summary(&self) -> ReportSummary {
        let count = |d: Disposition| {
            self.entries
                .iter()
                .filter(|e| e.result.disposition() == d)
                .count()
        };
        let total_duration: Duration = self.entries.iter().map(|e| e.duration).sum();

        ReportSummary {
            attempted: self.entries.len(),
            succeeded: count(Disposition::Success),
            expected_failures: count(Disposition::ExpectedFailure),
            hard_failures: count(Disposition::HardFailure),
            skipped: self.skipped.len(),
            total_duration_ms: total_duration.as_millis() as u64,
            passed: self.passed(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let serde_json::Value::Object(map) = &mut value {
            map.insert("passed".to_string(), self.passed().into());
            map.insert("summary".to_string(), serde_json::to_value(self.summary())?);
        }
        serde_json::to_string_pretty(&value)
    }
}

/// Per-disposition counts for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub expected_failures: usize,
    pub hard_failures: usize,
    pub skipped: usize,
    pub total_duration_ms: u64,
    pub passed: bool,
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempted, {} succeeded, {} expected failures, {} hard failures, {} skipped ({} ms)",
            self.attempted,
            self.succeeded,
            self.expected_failures,
            self.hard_failures,
            self.skipped,
            self.total_duration_ms
        )
    }
}

impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🔍 Face Recognition Service Verification")?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "📡 Service: {}", self.endpoint)?;

        for (index, entry) in self.entries.iter().enumerate() {
            writeln!(f)?;
            let millis = entry.duration.as_millis();
            match &entry.result {
                ProbeResult::Success(payload) => {
                    writeln!(f, "{}. ✅ {} ({} ms)", index + 1, entry.probe, millis)?;
                    for (field, value) in highlights(entry.probe, payload) {
                        writeln!(f, "   {}: {}", field, value)?;
                    }
                }
                ProbeResult::ExpectedFailure(reason) => {
                    writeln!(
                        f,
                        "{}. ✅ {} - expected failure ({} ms)",
                        index + 1,
                        entry.probe,
                        millis
                    )?;
                    writeln!(f, "   reason: {}", reason)?;
                }
                ProbeResult::HardFailure(err) => {
                    writeln!(f, "{}. ❌ {} ({} ms)", index + 1, entry.probe, millis)?;
                    writeln!(f, "   error: {}", err)?;
                    writeln!(f, "   💡 {}", err.remediation())?;
                }
            }
        }

        if !self.skipped.is_empty() {
            let names: Vec<&str> = self.skipped.iter().map(|p| p.as_str()).collect();
            writeln!(f)?;
            writeln!(f, "⏭️  Not run after hard failure: {}", names.join(", "))?;
        }

        writeln!(f)?;
        writeln!(f, "📊 Summary: {}", self.summary())?;
        let verdict = if self.passed() { "✅ PASSED" } else { "❌ FAILED" };
        writeln!(f, "🎯 Overall Status: {}", verdict)
    }
}

/// Fields worth echoing for a successful probe, read optimistically.
pub fn highlights(probe: ProbeName, payload: &serde_json::Value) -> Vec<(&'static str, String)> {
    let field = |name: &str| {
        payload
            .get(name)
            .map(render_value)
            .unwrap_or_else(|| "<missing>".to_string())
    };

    match probe {
        ProbeName::Health => {
            let parsed: HealthResponse =
                serde_json::from_value(payload.clone()).unwrap_or_default();
            let mut fields = vec![
                ("status", field("status")),
                ("message", field("message")),
                ("version", field("version")),
            ];
            if let Some(timestamp) = parsed.timestamp {
                fields.push(("timestamp", timestamp));
            }
            fields
        }
        ProbeName::Config => {
            let parsed: ConfigResponse =
                serde_json::from_value(payload.clone()).unwrap_or_default();
            vec![
                ("confidence_threshold", field("confidence_threshold")),
                ("anti_spoof_enabled", field("anti_spoof_enabled")),
                ("face_recognition_model", field("face_recognition_model")),
                ("mode", parsed.mode_or_default().to_string()),
                ("version", field("version")),
            ]
        }
        ProbeName::Encode => vec![("message", field("message"))],
        ProbeName::LegacyCompare => vec![("deprecated", field("deprecated"))],
    }
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn duration_as_millis<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ServiceError;

    fn entry(probe: ProbeName, result: ProbeResult) -> ProbeEntry {
        ProbeEntry {
            probe,
            result,
            duration: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_passed_ignores_expected_failures() {
        let mut report = AggregateReport::new(ServiceEndpoint::default());
        report.push(entry(ProbeName::Health, ProbeResult::Success(serde_json::json!({}))));
        report.push(entry(
            ProbeName::Encode,
            ProbeResult::ExpectedFailure("Invalid image data".to_string()),
        ));
        assert!(report.passed());

        report.push(entry(
            ProbeName::Config,
            ProbeResult::HardFailure(ServiceError::UnknownError {
                details: "boom".to_string(),
            }),
        ));
        assert!(!report.passed());
    }

    #[test]
    fn test_config_values_echoed_verbatim() {
        let mut report = AggregateReport::new(ServiceEndpoint::default());
        report.push(entry(
            ProbeName::Config,
            ProbeResult::Success(serde_json::json!({
                "confidence_threshold": 0.8,
                "anti_spoof_enabled": true,
                "face_recognition_model": "model-x",
                "version": "2.0.0-simplified"
            })),
        ));

        let text = report.to_string();
        assert!(text.contains("confidence_threshold: 0.8"));
        assert!(text.contains("anti_spoof_enabled: true"));
        assert!(text.contains("face_recognition_model: model-x"));
        assert!(text.contains("mode: production"));
        assert!(text.contains("version: 2.0.0-simplified"));
        assert!(text.contains("PASSED"));
    }

    #[test]
    fn test_health_missing_fields_render_placeholder() {
        let fields = highlights(ProbeName::Health, &serde_json::json!({"status": "success"}));
        assert_eq!(fields[0], ("status", "success".to_string()));
        assert_eq!(fields[1], ("message", "<missing>".to_string()));
        assert!(fields.iter().all(|(name, _)| *name != "timestamp"));
    }

    #[test]
    fn test_health_timestamp_echoed_when_present() {
        let fields = highlights(
            ProbeName::Health,
            &serde_json::json!({
                "status": "success",
                "message": "running",
                "version": "2.0.0",
                "timestamp": "2026-10-19T08:00:00"
            }),
        );
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[3], ("timestamp", "2026-10-19T08:00:00".to_string()));
    }

    #[test]
    fn test_config_version_missing_renders_placeholder() {
        let fields = highlights(ProbeName::Config, &serde_json::json!({"mode": "mock"}));
        assert!(fields.contains(&("mode", "mock".to_string())));
        assert!(fields.contains(&("version", "<missing>".to_string())));
    }

    #[test]
    fn test_hard_failure_rendering_includes_remediation() {
        let mut report = AggregateReport::new(ServiceEndpoint::default());
        report.push(entry(
            ProbeName::Health,
            ProbeResult::HardFailure(ServiceError::ConnectionRefused {
                url: "http://localhost:8085/".to_string(),
            }),
        ));
        report.mark_skipped(ProbeName::Config);
        report.mark_skipped(ProbeName::Encode);

        let text = report.to_string();
        assert!(text.contains("❌ health"));
        assert!(text.contains("Start the face recognition service"));
        assert!(text.contains("Not run after hard failure: config, encode"));
        assert!(text.contains("FAILED"));
    }

    #[test]
    fn test_summary_counts() {
        let mut report = AggregateReport::new(ServiceEndpoint::default());
        report.push(entry(ProbeName::Health, ProbeResult::Success(serde_json::json!({}))));
        report.push(entry(ProbeName::Config, ProbeResult::Success(serde_json::json!({}))));
        report.push(entry(
            ProbeName::Encode,
            ProbeResult::ExpectedFailure("rejected".to_string()),
        ));

        report.mark_skipped(ProbeName::LegacyCompare);

        let summary = report.summary();
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.expected_failures, 1);
        assert_eq!(summary.hard_failures, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total_duration_ms, 15);
        assert!(summary.passed);

        let text = report.to_string();
        assert!(text.contains(
            "📊 Summary: 3 attempted, 2 succeeded, 1 expected failures, 0 hard failures, 1 skipped (15 ms)"
        ));
    }

    #[test]
    fn test_json_output_shape() {
        let mut report = AggregateReport::new(ServiceEndpoint::new("http://svc:1"));
        report.push(entry(
            ProbeName::Encode,
            ProbeResult::ExpectedFailure("rejected".to_string()),
        ));
        let report = report.finish();

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["endpoint"], "http://svc:1");
        assert_eq!(value["passed"], true);
        assert_eq!(value["entries"][0]["probe"], "encode");
        assert_eq!(value["entries"][0]["disposition"], "expected_failure");
        assert_eq!(value["entries"][0]["duration_ms"], 5);
        assert!(value["finished_at"].is_string());
        assert_eq!(value["summary"]["attempted"], 1);
        assert_eq!(value["summary"]["expected_failures"], 1);
        assert_eq!(value["summary"]["hard_failures"], 0);
        assert_eq!(value["summary"]["passed"], true);
    }
}
