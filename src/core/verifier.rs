use crate::core::probe::{classify, ProbePlan, ProbeResult, ProbeSpec, Stage};
use crate::core::report::{AggregateReport, ProbeEntry};
use crate::domain::ports::{ConfigProvider, ServiceTransport};
use std::time::Instant;

/// Runs the probe plan against one service endpoint.
pub struct Verifier<T: ServiceTransport, C: ConfigProvider> {
    transport: T,
    config: C,
    plan: ProbePlan,
}

impl<T: ServiceTransport, C: ConfigProvider> Verifier<T, C> {
    pub fn new(transport: T, config: C) -> Self {
        let plan = ProbePlan::standard(config.sample(), &config.timeouts());
        Self {
            transport,
            config,
            plan,
        }
    }

    pub async fn run_verification(&self) -> AggregateReport {
        let endpoint = self.config.endpoint();
        let mut report = AggregateReport::new(endpoint.clone());
        tracing::info!("🔍 Verifying face recognition service at {}", endpoint);

        let mut sequenced = self.plan.stage(Stage::Sequenced);
        while let Some(spec) = sequenced.next() {
            let entry = self.run_probe(spec).await;
            let aborted = entry.result.is_hard_failure();
            report.push(entry);

            if aborted {
                for skipped in sequenced.by_ref() {
                    tracing::info!("⏭️ Skipping probe: {} (earlier probe failed)", skipped.name);
                    report.mark_skipped(skipped.name);
                }
                break;
            }
        }

        for spec in self.plan.stage(Stage::Independent) {
            let entry = self.run_probe(spec).await;
            report.push(entry);
        }

        let report = report.finish();
        if report.passed() {
            tracing::info!("✅ Verification passed ({} probes)", report.entries().len());
        } else {
            tracing::error!("❌ Verification failed");
        }
        report
    }

    /// Sends one probe and classifies whatever came back. Never errors.
    pub async fn run_probe(&self, spec: &ProbeSpec) -> ProbeEntry {
        let request = spec.request(self.config.endpoint());
        tracing::debug!(
            "📡 {} {} (timeout {:?})",
            request.method,
            request.url,
            request.timeout
        );

        let start_time = Instant::now();
        let outcome = self.transport.send(&request).await;
        let duration = start_time.elapsed();
        let result = classify(spec.name, outcome);

        match &result {
            ProbeResult::Success(_) => {
                tracing::info!("✅ {} succeeded in {:?}", spec.name, duration)
            }
            ProbeResult::ExpectedFailure(reason) => {
                tracing::warn!("⚠️ {} rejected as expected: {}", spec.name, reason)
            }
            ProbeResult::HardFailure(err) => {
                tracing::error!("❌ {} failed: {}", spec.name, err);
                tracing::error!("💡 Suggestion: {}", err.remediation());
            }
        }

        ProbeEntry {
            probe: spec.name,
            result,
            duration,
        }
    }

    pub fn plan(&self) -> &ProbePlan {
        &self.plan
    }
}
