use super::domain::{ApplicationState, InterviewSlot, ResumeVerdict, RoleId, TestProgress};
use super::screening::TestReport;

/// Error raised when an input is not valid for the current workflow state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("input not valid in state '{}'", .state.label())]
    InvalidState { state: ApplicationState },
    #[error("candidate email is required before analysis")]
    MissingEmail,
    #[error("resume text is required before analysis")]
    MissingResume,
    #[error("no interview slot has been chosen")]
    NoSlotChosen,
    #[error("a meeting already exists for the chosen slot")]
    MeetingAlreadyBooked,
    #[error("no meeting has been created for this application")]
    NoMeetingBooked,
}

/// One in-flight candidate application for a single candidate/role pair.
///
/// The `state` field is the single source of truth for workflow ordering.
/// Every transition method validates the current state and refuses anything
/// out of order, so a caller cannot reach scheduling without a passed test
/// and an explicit confirmation recorded on this same instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateApplication {
    state: ApplicationState,
    role: RoleId,
    candidate_email: String,
    resume_text: String,
    verdict: Option<ResumeVerdict>,
    progress: TestProgress,
    chosen_slot: Option<InterviewSlot>,
    join_url: Option<String>,
}

impl CandidateApplication {
    pub fn new(role: RoleId) -> Self {
        Self {
            state: ApplicationState::Intake,
            role,
            candidate_email: String::new(),
            resume_text: String::new(),
            verdict: None,
            progress: TestProgress::default(),
            chosen_slot: None,
            join_url: None,
        }
    }

    pub fn state(&self) -> ApplicationState {
        self.state
    }

    pub fn role(&self) -> &RoleId {
        &self.role
    }

    pub fn candidate_email(&self) -> &str {
        &self.candidate_email
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn verdict(&self) -> Option<&ResumeVerdict> {
        self.verdict.as_ref()
    }

    pub fn progress(&self) -> &TestProgress {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut TestProgress {
        &mut self.progress
    }

    pub fn chosen_slot(&self) -> Option<InterviewSlot> {
        self.chosen_slot
    }

    pub fn join_url(&self) -> Option<&str> {
        self.join_url.as_deref()
    }

    fn expect_state(&self, expected: ApplicationState) -> Result<(), TransitionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(TransitionError::InvalidState { state: self.state })
        }
    }

    /// Candidate contact details may only change during intake.
    pub fn set_candidate_email(&mut self, email: &str) -> Result<(), TransitionError> {
        self.expect_state(ApplicationState::Intake)?;
        self.candidate_email = email.trim().to_string();
        Ok(())
    }

    /// Attaching a new resume replaces the previous text; only valid before
    /// analysis has run.
    pub fn attach_resume(&mut self, text: &str) -> Result<(), TransitionError> {
        self.expect_state(ApplicationState::Intake)?;
        self.resume_text = text.to_string();
        Ok(())
    }

    /// Checks analysis preconditions without committing a transition.
    pub fn ready_for_analysis(&self) -> Result<(), TransitionError> {
        self.expect_state(ApplicationState::Intake)?;
        if self.candidate_email.is_empty() {
            return Err(TransitionError::MissingEmail);
        }
        if self.resume_text.trim().is_empty() {
            return Err(TransitionError::MissingResume);
        }
        Ok(())
    }

    pub fn begin_analysis(&mut self) -> Result<(), TransitionError> {
        self.ready_for_analysis()?;
        self.state = ApplicationState::AnalyzedPending;
        Ok(())
    }

    /// Records the scoring collaborator's verdict and branches accordingly.
    pub fn record_verdict(&mut self, verdict: ResumeVerdict) -> Result<(), TransitionError> {
        self.expect_state(ApplicationState::AnalyzedPending)?;
        self.state = if verdict.selected {
            ApplicationState::SelectedPendingTest
        } else {
            ApplicationState::RejectedByAnalysis
        };
        self.verdict = Some(verdict);
        Ok(())
    }

    /// Records a completed screening run. Test progress is cleared on both
    /// branches so a later retake starts from scratch.
    pub fn record_test_result(&mut self, report: &TestReport) -> Result<(), TransitionError> {
        self.expect_state(ApplicationState::SelectedPendingTest)?;
        self.progress.clear();
        self.state = if report.passed {
            ApplicationState::TestPassedPendingConfirm
        } else {
            ApplicationState::RejectedByTest
        };
        Ok(())
    }

    /// The candidate's explicit "proceed" after passing the test.
    pub fn confirm(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ApplicationState::TestPassedPendingConfirm)?;
        self.state = ApplicationState::ConfirmedPendingSchedule;
        Ok(())
    }

    /// Picks (or re-picks) an interview slot. Re-picking is allowed any
    /// number of times until a meeting has been created for the slot.
    pub fn choose_slot(&mut self, slot: InterviewSlot) -> Result<(), TransitionError> {
        self.expect_state(ApplicationState::ConfirmedPendingSchedule)?;
        if self.join_url.is_some() {
            return Err(TransitionError::MeetingAlreadyBooked);
        }
        self.chosen_slot = Some(slot);
        Ok(())
    }

    /// Caches the created meeting so a retried scheduling step reuses the
    /// existing join link instead of booking a second meeting.
    pub fn record_meeting(&mut self, join_url: String) -> Result<(), TransitionError> {
        self.expect_state(ApplicationState::ConfirmedPendingSchedule)?;
        if self.chosen_slot.is_none() {
            return Err(TransitionError::NoSlotChosen);
        }
        self.join_url = Some(join_url);
        Ok(())
    }

    /// Terminal success; requires a created meeting.
    pub fn complete_scheduling(&mut self) -> Result<(), TransitionError> {
        self.expect_state(ApplicationState::ConfirmedPendingSchedule)?;
        if self.join_url.is_none() {
            return Err(TransitionError::NoMeetingBooked);
        }
        self.state = ApplicationState::Scheduled;
        Ok(())
    }

    /// Global reset: accepted from any state, returns to intake with every
    /// per-application field cleared. The selected role is catalog context
    /// and survives; stores and analytics are never touched from here.
    pub fn reset(&mut self) {
        self.state = ApplicationState::Intake;
        self.candidate_email.clear();
        self.resume_text.clear();
        self.verdict = None;
        self.progress.clear();
        self.chosen_slot = None;
        self.join_url = None;
    }

    /// Light reset: clears candidate identity, resume, analysis state, and
    /// test progress, leaving any in-flight interview slot untouched.
    pub fn new_application(&mut self) {
        self.state = ApplicationState::Intake;
        self.candidate_email.clear();
        self.resume_text.clear();
        self.verdict = None;
        self.progress.clear();
    }
}
