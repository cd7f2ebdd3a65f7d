use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::AppResult;
use crate::workflow::link::LinkOutcome;

const DRY_RUN_PLACEHOLDER: &str = "dry-run";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Clean,
    Degraded,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Clean => 0,
            RunStatus::Degraded => 1,
        }
    }
}

/// Per-recommendation results of one run.
#[derive(Debug, Default)]
pub struct RunReport {
    results: BTreeMap<String, LinkOutcome>,
    below_threshold: usize,
    unrouted: usize,
}

impl RunReport {
    pub fn record(&mut self, recommendation_id: &str, outcome: LinkOutcome) {
        self.results.insert(recommendation_id.to_string(), outcome);
    }

    pub fn record_below_threshold(&mut self) {
        self.below_threshold += 1;
    }

    pub fn record_unrouted(&mut self) {
        self.unrouted += 1;
    }

    pub fn results(&self) -> &BTreeMap<String, LinkOutcome> {
        &self.results
    }

    pub fn status(&self) -> RunStatus {
        if self.unrouted > 0 {
            RunStatus::Degraded
        } else {
            RunStatus::Clean
        }
    }

    /// `key=value` lines, one per processed recommendation.
    pub fn output_lines(&self) -> String {
        self.results
            .iter()
            .map(|(id, outcome)| {
                let value = match outcome {
                    LinkOutcome::Created(payload) => payload.to_string(),
                    LinkOutcome::DryRun => DRY_RUN_PLACEHOLDER.to_string(),
                };
                format!("{id}={value}\n")
            })
            .collect()
    }

    /// Writes the results for the calling pipeline; skipped when no path is configured.
    pub fn emit(&self, output_file: Option<&Path>) -> AppResult<()> {
        info!(
            processed = self.results.len(),
            below_threshold = self.below_threshold,
            unrouted = self.unrouted,
            "run finished"
        );
        if self.unrouted > 0 {
            warn!(
                unrouted = self.unrouted,
                "some recommendations had no bucket mapping"
            );
        }

        let Some(path) = output_file else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.output_lines())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn clean_until_something_is_unrouted() {
        let mut report = RunReport::default();
        report.record_below_threshold();
        assert_eq!(report.status(), RunStatus::Clean);
        assert_eq!(report.status().exit_code(), 0);

        report.record_unrouted();
        assert_eq!(report.status(), RunStatus::Degraded);
        assert_eq!(report.status().exit_code(), 1);
    }

    #[test]
    fn renders_key_value_lines() {
        let mut report = RunReport::default();
        report.record("b", LinkOutcome::DryRun);
        report.record("a", LinkOutcome::Created(json!({ "key": "INFRA-1" })));
        assert_eq!(
            report.output_lines(),
            "a={\"key\":\"INFRA-1\"}\nb=dry-run\n"
        );
    }

    #[test]
    fn writes_output_file_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("vars.env");
        let mut report = RunReport::default();
        report.record("r1", LinkOutcome::DryRun);
        report.emit(Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "r1=dry-run\n");

        report.emit(None).unwrap();
    }
}
