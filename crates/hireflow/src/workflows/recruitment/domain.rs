use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier wrapper for roles in the recruiter catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(pub String);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One multiple-choice screening question. The correct answer is stored as
/// option text, not an index, and must equal one of the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// Verdict returned by the resume scoring collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeVerdict {
    pub selected: bool,
    pub feedback: String,
}

/// Interview timestamp drawn from the recruiter-curated pool.
///
/// Serialized in the pool and analytics documents as `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterviewSlot(pub NaiveDateTime);

impl InterviewSlot {
    pub const FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";
}

impl fmt::Display for InterviewSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for InterviewSlot {
    type Err = chrono::ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(raw.trim(), Self::FORMAT).map(InterviewSlot)
    }
}

impl Serialize for InterviewSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for InterviewSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Progress through one role's screening test, scoped to the live session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestProgress {
    pub current_index: usize,
    pub answers: Vec<String>,
    pub completed: bool,
}

impl TestProgress {
    pub fn clear(&mut self) {
        self.current_index = 0;
        self.answers.clear();
        self.completed = false;
    }

    pub fn is_empty(&self) -> bool {
        self.current_index == 0 && self.answers.is_empty() && !self.completed
    }
}

/// Booked interview entry appended to the analytics log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub email: String,
    pub role: String,
    pub time: InterviewSlot,
    pub link: String,
}

/// Current position of a candidate application in the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationState {
    Intake,
    AnalyzedPending,
    SelectedPendingTest,
    TestPassedPendingConfirm,
    ConfirmedPendingSchedule,
    Scheduled,
    RejectedByAnalysis,
    RejectedByTest,
}

impl ApplicationState {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationState::Intake => "intake",
            ApplicationState::AnalyzedPending => "analyzed_pending",
            ApplicationState::SelectedPendingTest => "selected_pending_test",
            ApplicationState::TestPassedPendingConfirm => "test_passed_pending_confirm",
            ApplicationState::ConfirmedPendingSchedule => "confirmed_pending_schedule",
            ApplicationState::Scheduled => "scheduled",
            ApplicationState::RejectedByAnalysis => "rejected_by_analysis",
            ApplicationState::RejectedByTest => "rejected_by_test",
        }
    }

    /// Terminal states accept no further workflow input besides reset.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationState::Scheduled
                | ApplicationState::RejectedByAnalysis
                | ApplicationState::RejectedByTest
        )
    }
}
