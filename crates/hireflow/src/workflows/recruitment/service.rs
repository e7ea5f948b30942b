use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{error, info};

use super::analytics::{AnalyticsError, AnalyticsSnapshot, AnalyticsStore};
use super::application::{CandidateApplication, TransitionError};
use super::domain::{ApplicationState, InterviewRecord, InterviewSlot, Question, RoleId};
use super::notification::{
    interview_invite, rejection_message, selection_message, NotificationError, Notifier,
    TemplateContext,
};
use super::roles::{RoleStore, StoreError};
use super::scheduling::{MeetingScheduler, SchedulingError};
use super::scoring::ResumeScorer;
use super::screening::{ScreeningError, ScreeningTest, TestReport, PASS_THRESHOLD_PCT};
use super::slots::{SlotPool, SlotPoolError};

pub const INTERVIEW_DURATION_MINUTES: u32 = 60;

/// Error raised by the recruitment service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("no application in progress")]
    NoApplication,
    #[error("unknown role '{0}'")]
    UnknownRole(String),
    #[error("candidate email '{0}' is not a valid address")]
    InvalidEmail(String),
    #[error("resume text is required")]
    EmptyResume,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Screening(#[from] ScreeningError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    #[error(transparent)]
    Slots(#[from] SlotPoolError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
}

impl ServiceError {
    /// Collaborator and storage outages invite a retry of the same
    /// transition; everything else is an input or ordering problem.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::Notification(_)
                | ServiceError::Scheduling(_)
                | ServiceError::Analytics(AnalyticsError::Unavailable(_))
                | ServiceError::Store(StoreError::Unavailable(_))
                | ServiceError::Slots(SlotPoolError::Unavailable(_))
        )
    }
}

/// Public snapshot of the live application for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub state: &'static str,
    pub role: String,
    pub candidate_email: String,
    pub has_resume: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub answered_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_time: Option<InterviewSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_url: Option<String>,
}

/// The question currently presented to the candidate. The correct answer is
/// never exposed through this view.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<String>,
}

/// Outcome of one screening-test interaction: either the next question or
/// the scored report once the run completes.
#[derive(Debug, Clone, Serialize)]
pub struct TestStepView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<TestReport>,
    pub status: ApplicationStatusView,
}

/// Service composing the stores, the screening engine, and the scoring,
/// notification, and scheduling collaborators around one live candidate
/// application.
///
/// One application is live per service instance; the session model has no
/// concurrent applications sharing mutable state. Collaborator calls are
/// blocking and the state machine only advances after a call returns
/// successfully.
pub struct RecruitmentService<R, A, P> {
    roles: Arc<R>,
    analytics: Arc<A>,
    slots: Arc<P>,
    scorer: Box<dyn ResumeScorer>,
    notifier: Box<dyn Notifier>,
    scheduler: Box<dyn MeetingScheduler>,
    company_name: String,
    live: Mutex<Option<CandidateApplication>>,
}

impl<R, A, P> RecruitmentService<R, A, P>
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        roles: Arc<R>,
        analytics: Arc<A>,
        slots: Arc<P>,
        scorer: Box<dyn ResumeScorer>,
        notifier: Box<dyn Notifier>,
        scheduler: Box<dyn MeetingScheduler>,
        company_name: impl Into<String>,
    ) -> Self {
        Self {
            roles,
            analytics,
            slots,
            scorer,
            notifier,
            scheduler,
            company_name: company_name.into(),
            live: Mutex::new(None),
        }
    }

    /// Begins a fresh application for a known role, replacing any previous
    /// live application.
    pub fn start_application(&self, role: RoleId) -> Result<ApplicationStatusView, ServiceError> {
        if self.roles.get_requirement(&role)?.is_none() {
            return Err(ServiceError::UnknownRole(role.0));
        }

        let mut live = self.live.lock().expect("application mutex poisoned");
        let application = CandidateApplication::new(role);
        info!(role = %application.role(), "application started");
        let view = self.status_of(&application);
        *live = Some(application);
        Ok(view)
    }

    pub fn set_candidate_email(&self, email: &str) -> Result<ApplicationStatusView, ServiceError> {
        let trimmed = email.trim();
        if trimmed.is_empty() || !trimmed.contains('@') {
            return Err(ServiceError::InvalidEmail(email.to_string()));
        }
        self.with_live(|service, app| {
            app.set_candidate_email(trimmed)?;
            Ok(service.status_of(app))
        })
    }

    pub fn attach_resume(&self, text: &str) -> Result<ApplicationStatusView, ServiceError> {
        if text.trim().is_empty() {
            return Err(ServiceError::EmptyResume);
        }
        self.with_live(|service, app| {
            app.attach_resume(text)?;
            Ok(service.status_of(app))
        })
    }

    /// Runs the scoring collaborator over the attached resume. The applicant
    /// counter is incremented once per attempt, before the verdict branches.
    pub fn analyze(&self) -> Result<ApplicationStatusView, ServiceError> {
        self.with_live(|service, app| {
            app.ready_for_analysis()?;

            let verdict = service.scorer.analyze(app.resume_text(), app.role());
            service.analytics.record_applicant(app.role())?;
            app.begin_analysis()?;
            app.record_verdict(verdict.clone())?;
            info!(
                role = %app.role(),
                selected = verdict.selected,
                "resume analysis recorded"
            );

            if !verdict.selected {
                let message =
                    rejection_message(&service.template_context(app), &verdict.feedback);
                if let Err(err) = service.notifier.send(&message) {
                    error!(%err, "rejection notification failed");
                    return Err(ServiceError::Notification(err));
                }
            }

            Ok(service.status_of(app))
        })
    }

    /// Starts (or restarts) the screening test for the selected candidate.
    /// A role without questions completes immediately as an automatic pass.
    pub fn start_test(&self) -> Result<TestStepView, ServiceError> {
        self.with_live(|service, app| {
            expect_state(app, ApplicationState::SelectedPendingTest)?;
            let test = service.screening_test(app.role())?;
            test.begin(app.progress_mut());

            if app.progress().completed {
                return service.finalize_test(app, &test);
            }
            Ok(service.test_step(app, &test))
        })
    }

    pub fn current_question(&self) -> Result<Option<QuestionView>, ServiceError> {
        self.with_live(|service, app| {
            expect_state(app, ApplicationState::SelectedPendingTest)?;
            let test = service.screening_test(app.role())?;
            Ok(question_view(&test, app.progress().current_index))
        })
    }

    /// Records one answer; scores and resolves the run once the last
    /// question is answered. If a completed run could not be recorded
    /// earlier (storage outage), calling this again re-resolves it without
    /// consuming the answer.
    pub fn submit_answer(&self, answer: &str) -> Result<TestStepView, ServiceError> {
        self.with_live(|service, app| {
            expect_state(app, ApplicationState::SelectedPendingTest)?;
            let test = service.screening_test(app.role())?;

            if !app.progress().completed {
                test.record_answer(app.progress_mut(), answer)?;
            }

            if app.progress().completed {
                return service.finalize_test(app, &test);
            }
            Ok(service.test_step(app, &test))
        })
    }

    /// The candidate's explicit "proceed": sends the selection notification
    /// and only then advances, so a failed send leaves the state retryable.
    pub fn confirm(&self) -> Result<ApplicationStatusView, ServiceError> {
        self.with_live(|service, app| {
            expect_state(app, ApplicationState::TestPassedPendingConfirm)?;

            let message = selection_message(&service.template_context(app));
            service.notifier.send(&message).map_err(|err| {
                error!(%err, "selection notification failed");
                ServiceError::Notification(err)
            })?;

            app.confirm()?;
            info!(role = %app.role(), "candidate confirmed, awaiting scheduling");
            Ok(service.status_of(app))
        })
    }

    pub fn available_slots(&self) -> Result<Vec<InterviewSlot>, ServiceError> {
        Ok(self.slots.available()?)
    }

    pub fn proposed_slot(&self) -> Result<Option<InterviewSlot>, ServiceError> {
        Ok(self.slots.proposed()?)
    }

    /// Books the interview: resolves the slot (recruiter-proposed head of
    /// the pool unless the candidate re-picked), creates the meeting, sends
    /// the invite, records the interview, and consumes the slot.
    ///
    /// The created meeting is cached on the application, so retrying after a
    /// partial failure reuses the join link instead of double-booking.
    pub fn schedule(
        &self,
        requested: Option<InterviewSlot>,
    ) -> Result<ApplicationStatusView, ServiceError> {
        self.with_live(|service, app| {
            expect_state(app, ApplicationState::ConfirmedPendingSchedule)?;

            let slot = match requested {
                Some(slot) => slot,
                None => service
                    .slots
                    .proposed()?
                    .ok_or(ServiceError::Slots(SlotPoolError::Exhausted))?,
            };
            if !service.slots.contains(slot)? {
                return Err(ServiceError::Slots(SlotPoolError::NotOffered(slot)));
            }
            if app.chosen_slot() != Some(slot) {
                app.choose_slot(slot)?;
            }

            let join_url = match app.join_url() {
                Some(url) => url.to_string(),
                None => {
                    let topic = format!("Interview for {}", app.role());
                    let url = service
                        .scheduler
                        .create_meeting(&topic, slot, INTERVIEW_DURATION_MINUTES)
                        .map_err(|err| {
                            error!(%err, "meeting creation failed");
                            ServiceError::Scheduling(err)
                        })?;
                    app.record_meeting(url.clone())?;
                    url
                }
            };

            let invite = interview_invite(&service.template_context(app), slot, &join_url);
            service.notifier.send(&invite).map_err(|err| {
                error!(%err, "interview invite failed");
                ServiceError::Notification(err)
            })?;

            service.analytics.record_interview(InterviewRecord {
                email: app.candidate_email().to_string(),
                role: app.role().0.clone(),
                time: slot,
                link: join_url.clone(),
            })?;
            service.slots.book(slot)?;

            app.complete_scheduling()?;
            info!(role = %app.role(), slot = %slot, "interview scheduled");
            Ok(service.status_of(app))
        })
    }

    /// Global reset: the live application returns to intake with every
    /// per-application field cleared. Stores and analytics are untouched.
    pub fn reset(&self) {
        let mut live = self.live.lock().expect("application mutex poisoned");
        if let Some(app) = live.as_mut() {
            app.reset();
            info!(role = %app.role(), "application reset");
        }
    }

    /// Light reset for a fresh candidate: clears identity, resume, analysis,
    /// and test progress while any in-flight interview slot stays untouched.
    pub fn new_application(&self) -> Result<ApplicationStatusView, ServiceError> {
        self.with_live(|service, app| {
            app.new_application();
            Ok(service.status_of(app))
        })
    }

    pub fn status(&self) -> Result<ApplicationStatusView, ServiceError> {
        self.with_live(|service, app| Ok(service.status_of(app)))
    }

    pub fn analytics_snapshot(&self) -> Result<AnalyticsSnapshot, ServiceError> {
        Ok(self.analytics.snapshot()?)
    }

    // Role/question administration passthroughs.

    pub fn list_roles(&self) -> Result<Vec<RoleId>, ServiceError> {
        Ok(self.roles.list_roles()?)
    }

    pub fn role_requirement(&self, role: &RoleId) -> Result<String, ServiceError> {
        self.roles
            .get_requirement(role)?
            .ok_or_else(|| ServiceError::UnknownRole(role.0.clone()))
    }

    pub fn upsert_role(&self, role: &RoleId, requirement: &str) -> Result<(), ServiceError> {
        Ok(self.roles.upsert_role(role, requirement)?)
    }

    pub fn delete_role(&self, role: &RoleId) -> Result<(), ServiceError> {
        Ok(self.roles.delete_role(role)?)
    }

    pub fn list_questions(&self, role: &RoleId) -> Result<Vec<Question>, ServiceError> {
        Ok(self.roles.list_questions(role)?)
    }

    pub fn add_question(&self, role: &RoleId, question: Question) -> Result<(), ServiceError> {
        Ok(self.roles.add_question(role, question)?)
    }

    pub fn update_question(
        &self,
        role: &RoleId,
        index: usize,
        question: Question,
    ) -> Result<(), ServiceError> {
        Ok(self.roles.update_question(role, index, question)?)
    }

    pub fn delete_question(&self, role: &RoleId, index: usize) -> Result<(), ServiceError> {
        Ok(self.roles.delete_question(role, index)?)
    }

    fn with_live<T>(
        &self,
        f: impl FnOnce(&Self, &mut CandidateApplication) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut live = self.live.lock().expect("application mutex poisoned");
        let app = live.as_mut().ok_or(ServiceError::NoApplication)?;
        f(self, app)
    }

    fn screening_test(&self, role: &RoleId) -> Result<ScreeningTest, ServiceError> {
        Ok(ScreeningTest::new(self.roles.list_questions(role)?))
    }

    /// Scores a completed run, records the outcome, and resolves the branch.
    /// The outcome commits before the rejection notification goes out: the
    /// result is a fact, the mail is a side effect.
    fn finalize_test(
        &self,
        app: &mut CandidateApplication,
        test: &ScreeningTest,
    ) -> Result<TestStepView, ServiceError> {
        let report = test.score(app.progress())?;
        self.analytics.record_test_outcome(app.role(), report.passed)?;
        app.record_test_result(&report)?;
        info!(
            role = %app.role(),
            percentage = report.percentage,
            passed = report.passed,
            "screening test resolved"
        );

        if !report.passed {
            let feedback = format!(
                "Screening score {:.1}% is below the {:.0}% passing bar.",
                report.percentage, PASS_THRESHOLD_PCT
            );
            let message = rejection_message(&self.template_context(app), &feedback);
            if let Err(err) = self.notifier.send(&message) {
                error!(%err, "rejection notification failed");
                return Err(ServiceError::Notification(err));
            }
        }

        Ok(TestStepView {
            question: None,
            report: Some(report),
            status: self.status_of(app),
        })
    }

    fn test_step(&self, app: &CandidateApplication, test: &ScreeningTest) -> TestStepView {
        TestStepView {
            question: question_view(test, app.progress().current_index),
            report: None,
            status: self.status_of(app),
        }
    }

    fn template_context(&self, app: &CandidateApplication) -> TemplateContext {
        TemplateContext {
            company_name: self.company_name.clone(),
            role: app.role().0.clone(),
            candidate_email: app.candidate_email().to_string(),
        }
    }

    fn status_of(&self, app: &CandidateApplication) -> ApplicationStatusView {
        ApplicationStatusView {
            state: app.state().label(),
            role: app.role().0.clone(),
            candidate_email: app.candidate_email().to_string(),
            has_resume: !app.resume_text().is_empty(),
            feedback: app.verdict().map(|verdict| verdict.feedback.clone()),
            answered_questions: app.progress().answers.len(),
            interview_time: app.chosen_slot(),
            join_url: app.join_url().map(str::to_string),
        }
    }
}

fn expect_state(
    app: &CandidateApplication,
    expected: ApplicationState,
) -> Result<(), ServiceError> {
    if app.state() == expected {
        Ok(())
    } else {
        Err(ServiceError::Transition(TransitionError::InvalidState {
            state: app.state(),
        }))
    }
}

fn question_view(test: &ScreeningTest, index: usize) -> Option<QuestionView> {
    test.question_at(index).map(|question| QuestionView {
        index,
        total: test.len(),
        prompt: question.prompt.clone(),
        options: question.options.clone(),
    })
}
