//! Candidate recruitment workflow: resume intake, automated skill analysis,
//! multiple-choice screening, selection confirmation, and interview
//! self-scheduling, with per-role analytics alongside.
//!
//! The state machine in [`application`] is the single source of truth for
//! workflow ordering; the stores and gateway traits around it are the seams
//! for persistence and for the external scoring, mail, and meeting-provider
//! collaborators.

pub mod analytics;
pub mod application;
pub mod domain;
pub mod notification;
pub mod roles;
pub mod router;
pub mod scheduling;
pub mod scoring;
pub mod screening;
pub mod service;
pub mod slots;

#[cfg(test)]
mod tests;

pub use analytics::{
    render_csv, AnalyticsError, AnalyticsSnapshot, AnalyticsStore, JsonAnalyticsStore,
    RoleCounters,
};
pub use application::{CandidateApplication, TransitionError};
pub use domain::{
    ApplicationState, InterviewRecord, InterviewSlot, Question, ResumeVerdict, RoleId,
    TestProgress,
};
pub use notification::{
    NotificationError, Notifier, OutboundMessage, SmtpMailer, TemplateContext,
};
pub use roles::{
    default_roles, seed_default_roles, validate_question, JsonRoleStore, RoleStore, StoreError,
};
pub use router::recruitment_router;
pub use scheduling::{
    MeetingCredentials, MeetingScheduler, SchedulingError, TokenCache, ZoomMeetingClient,
};
pub use scoring::{ResumeScorer, StubScorer};
pub use screening::{ScreeningError, ScreeningTest, TestReport, PASS_THRESHOLD_PCT};
pub use service::{
    ApplicationStatusView, QuestionView, RecruitmentService, ServiceError, TestStepView,
    INTERVIEW_DURATION_MINUTES,
};
pub use slots::{JsonSlotPool, SlotPool, SlotPoolError};
