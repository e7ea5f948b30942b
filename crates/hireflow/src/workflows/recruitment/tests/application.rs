use super::common::slot;
use crate::workflows::recruitment::application::{CandidateApplication, TransitionError};
use crate::workflows::recruitment::domain::{ApplicationState, ResumeVerdict, RoleId};
use crate::workflows::recruitment::screening::TestReport;

fn app() -> CandidateApplication {
    CandidateApplication::new(RoleId("backend_engineer".to_string()))
}

fn selected() -> ResumeVerdict {
    ResumeVerdict {
        selected: true,
        feedback: "match".to_string(),
    }
}

fn passing_report() -> TestReport {
    TestReport {
        correct: 2,
        total: 2,
        percentage: 100.0,
        passed: true,
    }
}

fn app_at_pending_schedule() -> CandidateApplication {
    let mut app = app();
    app.set_candidate_email("candidate@example.com").expect("email");
    app.attach_resume("resume").expect("resume");
    app.begin_analysis().expect("analysis");
    app.record_verdict(selected()).expect("verdict");
    app.record_test_result(&passing_report()).expect("test");
    app.confirm().expect("confirm");
    app
}

#[test]
fn transitions_walk_the_states_in_order() {
    let mut app = app();
    assert_eq!(app.state(), ApplicationState::Intake);

    app.set_candidate_email("candidate@example.com").expect("email");
    app.attach_resume("resume").expect("resume");
    app.begin_analysis().expect("analysis");
    assert_eq!(app.state(), ApplicationState::AnalyzedPending);

    app.record_verdict(selected()).expect("verdict");
    assert_eq!(app.state(), ApplicationState::SelectedPendingTest);

    app.record_test_result(&passing_report()).expect("test");
    assert_eq!(app.state(), ApplicationState::TestPassedPendingConfirm);

    app.confirm().expect("confirm");
    assert_eq!(app.state(), ApplicationState::ConfirmedPendingSchedule);

    app.choose_slot(slot("2025-03-01 10:00:00")).expect("slot");
    app.record_meeting("https://meet.example.com/j/1".to_string())
        .expect("meeting");
    app.complete_scheduling().expect("scheduled");
    assert_eq!(app.state(), ApplicationState::Scheduled);
    assert!(app.state().is_terminal());
}

#[test]
fn no_state_can_be_skipped() {
    let mut app = app();

    assert!(matches!(
        app.confirm(),
        Err(TransitionError::InvalidState { .. })
    ));
    assert!(matches!(
        app.choose_slot(slot("2025-03-01 10:00:00")),
        Err(TransitionError::InvalidState { .. })
    ));
    assert!(matches!(
        app.record_test_result(&passing_report()),
        Err(TransitionError::InvalidState { .. })
    ));
    assert!(matches!(
        app.complete_scheduling(),
        Err(TransitionError::InvalidState { .. })
    ));
    assert_eq!(app.state(), ApplicationState::Intake);
}

#[test]
fn scheduling_requires_slot_and_meeting_in_order() {
    let mut app = app_at_pending_schedule();

    assert_eq!(
        app.record_meeting("https://meet.example.com/j/1".to_string()),
        Err(TransitionError::NoSlotChosen)
    );
    assert_eq!(app.complete_scheduling(), Err(TransitionError::NoMeetingBooked));

    app.choose_slot(slot("2025-03-01 10:00:00")).expect("slot");
    assert_eq!(app.complete_scheduling(), Err(TransitionError::NoMeetingBooked));

    app.record_meeting("https://meet.example.com/j/1".to_string())
        .expect("meeting");
    app.complete_scheduling().expect("scheduled");
}

#[test]
fn slot_can_be_repicked_until_a_meeting_is_created() {
    let mut app = app_at_pending_schedule();

    app.choose_slot(slot("2025-03-01 10:00:00")).expect("first pick");
    app.choose_slot(slot("2025-03-02 15:30:00")).expect("re-pick");
    app.choose_slot(slot("2025-03-01 10:00:00")).expect("re-pick again");

    app.record_meeting("https://meet.example.com/j/1".to_string())
        .expect("meeting");
    assert_eq!(
        app.choose_slot(slot("2025-03-02 15:30:00")),
        Err(TransitionError::MeetingAlreadyBooked)
    );
}

#[test]
fn rejected_branches_are_terminal() {
    let mut app = app();
    app.set_candidate_email("candidate@example.com").expect("email");
    app.attach_resume("resume").expect("resume");
    app.begin_analysis().expect("analysis");
    app.record_verdict(ResumeVerdict {
        selected: false,
        feedback: "no match".to_string(),
    })
    .expect("verdict");

    assert_eq!(app.state(), ApplicationState::RejectedByAnalysis);
    assert!(app.state().is_terminal());
    assert!(matches!(
        app.begin_analysis(),
        Err(TransitionError::InvalidState { .. })
    ));
}

#[test]
fn intake_edits_are_locked_after_analysis() {
    let mut app = app();
    app.set_candidate_email("candidate@example.com").expect("email");
    app.attach_resume("resume").expect("resume");
    app.begin_analysis().expect("analysis");

    assert!(matches!(
        app.set_candidate_email("other@example.com"),
        Err(TransitionError::InvalidState { .. })
    ));
    assert!(matches!(
        app.attach_resume("other resume"),
        Err(TransitionError::InvalidState { .. })
    ));
}

#[test]
fn reset_clears_every_field_and_keeps_the_role() {
    let mut app = app_at_pending_schedule();
    app.choose_slot(slot("2025-03-01 10:00:00")).expect("slot");
    app.record_meeting("https://meet.example.com/j/1".to_string())
        .expect("meeting");

    app.reset();

    assert_eq!(app.state(), ApplicationState::Intake);
    assert_eq!(app.role().0, "backend_engineer");
    assert_eq!(app.candidate_email(), "");
    assert_eq!(app.resume_text(), "");
    assert!(app.verdict().is_none());
    assert!(app.progress().is_empty());
    assert!(app.chosen_slot().is_none());
    assert!(app.join_url().is_none());
}

#[test]
fn new_application_preserves_in_flight_scheduling_state() {
    let mut app = app_at_pending_schedule();
    app.choose_slot(slot("2025-03-01 10:00:00")).expect("slot");

    app.new_application();

    assert_eq!(app.state(), ApplicationState::Intake);
    assert_eq!(app.candidate_email(), "");
    assert_eq!(app.resume_text(), "");
    assert!(app.verdict().is_none());
    assert_eq!(app.chosen_slot(), Some(slot("2025-03-01 10:00:00")));
}

#[test]
fn analysis_needs_both_email_and_resume() {
    let mut app = app();
    assert_eq!(app.begin_analysis(), Err(TransitionError::MissingEmail));

    app.set_candidate_email("candidate@example.com").expect("email");
    assert_eq!(app.begin_analysis(), Err(TransitionError::MissingResume));

    app.attach_resume("   ").expect("whitespace resume");
    assert_eq!(app.begin_analysis(), Err(TransitionError::MissingResume));

    app.attach_resume("real resume").expect("resume");
    app.begin_analysis().expect("analysis");
}
