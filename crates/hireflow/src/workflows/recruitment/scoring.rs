use super::domain::{ResumeVerdict, RoleId};

/// Seam for the resume/role fit judgment so a real scoring backend can be
/// substituted without touching the workflow.
///
/// Implementations must not fail for well-formed input: an internal failure
/// surfaces as a rejected verdict carrying the error message as feedback.
pub trait ResumeScorer: Send + Sync {
    fn analyze(&self, resume_text: &str, role: &RoleId) -> ResumeVerdict;
}

/// Deterministic stand-in for a real scoring backend.
#[derive(Debug, Clone)]
pub struct StubScorer {
    selected: bool,
    feedback: String,
}

impl StubScorer {
    /// Default behavior: every well-formed resume is selected.
    pub fn selecting() -> Self {
        Self {
            selected: true,
            feedback: "The candidate meets over 70% of the required skills for the role."
                .to_string(),
        }
    }

    pub fn rejecting(feedback: impl Into<String>) -> Self {
        Self {
            selected: false,
            feedback: feedback.into(),
        }
    }
}

impl ResumeScorer for StubScorer {
    fn analyze(&self, _resume_text: &str, _role: &RoleId) -> ResumeVerdict {
        ResumeVerdict {
            selected: self.selected,
            feedback: self.feedback.clone(),
        }
    }
}
