use crate::core::capability::Capability;
use crate::reporting::model::{EnumerationReport, HostIdentity, ResultSet};

/// Accumulates category results into the run's report
pub struct Reporter {
    report: EnumerationReport,
}

impl Reporter {
    pub fn new(identity: HostIdentity) -> Self {
        Self {
            report: EnumerationReport::new(identity),
        }
    }

    pub fn record(&mut self, cap: Capability, results: ResultSet) {
        tracing::debug!("Recorded {} {} entries", results.len(), cap);
        self.report
            .results
            .insert(cap.as_str().to_string(), Some(results));
    }

    pub fn set_provider(&mut self, provider: Option<String>) {
        self.report.provider = provider;
    }

    pub fn finish(self) -> EnumerationReport {
        self.report
    }
}
