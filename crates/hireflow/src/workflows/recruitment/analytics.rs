use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::domain::{InterviewRecord, RoleId};
use super::roles::{load_document, write_document};

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("analytics store unavailable: {0}")]
    Unavailable(String),
}

/// Per-role counters. All four only ever increase; `selected_for_test`
/// equals `passed + failed` once every in-flight test has resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounters {
    pub total_applicants: u64,
    pub selected_for_test: u64,
    pub passed: u64,
    pub failed: u64,
}

impl RoleCounters {
    /// Pass rate over resolved tests; `None` until any test has resolved.
    pub fn pass_rate(&self) -> Option<f64> {
        let resolved = self.passed + self.failed;
        if resolved == 0 {
            None
        } else {
            Some(self.passed as f64 / resolved as f64)
        }
    }
}

/// Full analytics view: per-role counters plus the append-only interview log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub roles: BTreeMap<String, RoleCounters>,
    pub interviews: Vec<InterviewRecord>,
}

/// Storage abstraction for applicant counters and the interview log.
pub trait AnalyticsStore: Send + Sync {
    fn record_applicant(&self, role: &RoleId) -> Result<(), AnalyticsError>;
    fn record_test_outcome(&self, role: &RoleId, passed: bool) -> Result<(), AnalyticsError>;
    fn record_interview(&self, record: InterviewRecord) -> Result<(), AnalyticsError>;
    fn snapshot(&self) -> Result<AnalyticsSnapshot, AnalyticsError>;
}

/// File-backed analytics over a single JSON document. A missing or corrupt
/// document loads as zeroed counters and an empty interview list rather than
/// failing the caller.
pub struct JsonAnalyticsStore {
    path: PathBuf,
    state: Mutex<AnalyticsSnapshot>,
}

impl JsonAnalyticsStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = load_document(&path);
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    fn persist(&self, state: &AnalyticsSnapshot) -> Result<(), AnalyticsError> {
        write_document(&self.path, state).map_err(|err| AnalyticsError::Unavailable(err.to_string()))
    }
}

impl AnalyticsStore for JsonAnalyticsStore {
    fn record_applicant(&self, role: &RoleId) -> Result<(), AnalyticsError> {
        let mut state = self.state.lock().expect("analytics mutex poisoned");
        state.roles.entry(role.0.clone()).or_default().total_applicants += 1;
        self.persist(&state)
    }

    fn record_test_outcome(&self, role: &RoleId, passed: bool) -> Result<(), AnalyticsError> {
        let mut state = self.state.lock().expect("analytics mutex poisoned");
        let counters = state.roles.entry(role.0.clone()).or_default();
        counters.selected_for_test += 1;
        if passed {
            counters.passed += 1;
        } else {
            counters.failed += 1;
        }
        self.persist(&state)
    }

    fn record_interview(&self, record: InterviewRecord) -> Result<(), AnalyticsError> {
        let mut state = self.state.lock().expect("analytics mutex poisoned");
        state.interviews.push(record);
        self.persist(&state)
    }

    fn snapshot(&self) -> Result<AnalyticsSnapshot, AnalyticsError> {
        let state = self.state.lock().expect("analytics mutex poisoned");
        Ok(state.clone())
    }
}

/// Renders the per-role counters as CSV for recruiter exports.
pub fn render_csv(snapshot: &AnalyticsSnapshot) -> Result<String, AnalyticsError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "role",
            "total_applicants",
            "selected_for_test",
            "passed",
            "failed",
            "pass_rate_pct",
        ])
        .map_err(|err| AnalyticsError::Unavailable(err.to_string()))?;

    for (role, counters) in &snapshot.roles {
        let pass_rate = counters
            .pass_rate()
            .map(|rate| format!("{:.1}", rate * 100.0))
            .unwrap_or_default();
        writer
            .write_record([
                role.as_str(),
                &counters.total_applicants.to_string(),
                &counters.selected_for_test.to_string(),
                &counters.passed.to_string(),
                &counters.failed.to_string(),
                &pass_rate,
            ])
            .map_err(|err| AnalyticsError::Unavailable(err.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| AnalyticsError::Unavailable(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| AnalyticsError::Unavailable(err.to_string()))
}
