use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::workflows::recruitment::analytics::{
    AnalyticsError, AnalyticsSnapshot, AnalyticsStore,
};
use crate::workflows::recruitment::domain::{InterviewRecord, InterviewSlot, Question, RoleId};
use crate::workflows::recruitment::notification::{NotificationError, Notifier, OutboundMessage};
use crate::workflows::recruitment::roles::{validate_question, RoleStore, StoreError};
use crate::workflows::recruitment::scheduling::{MeetingScheduler, SchedulingError};
use crate::workflows::recruitment::scoring::StubScorer;
use crate::workflows::recruitment::service::RecruitmentService;
use crate::workflows::recruitment::slots::{SlotPool, SlotPoolError};

#[derive(Default)]
pub(super) struct MemoryRoleStore {
    requirements: Mutex<BTreeMap<String, String>>,
    questions: Mutex<BTreeMap<String, Vec<Question>>>,
}

impl RoleStore for MemoryRoleStore {
    fn list_roles(&self) -> Result<Vec<RoleId>, StoreError> {
        let requirements = self.requirements.lock().expect("lock");
        Ok(requirements.keys().map(|id| RoleId(id.clone())).collect())
    }

    fn get_requirement(&self, role: &RoleId) -> Result<Option<String>, StoreError> {
        let requirements = self.requirements.lock().expect("lock");
        Ok(requirements.get(&role.0).cloned())
    }

    fn upsert_role(&self, role: &RoleId, requirement: &str) -> Result<(), StoreError> {
        let mut requirements = self.requirements.lock().expect("lock");
        requirements.insert(role.0.clone(), requirement.to_string());
        Ok(())
    }

    fn delete_role(&self, role: &RoleId) -> Result<(), StoreError> {
        let mut requirements = self.requirements.lock().expect("lock");
        requirements
            .remove(&role.0)
            .map(|_| ())
            .ok_or_else(|| StoreError::RoleNotFound(role.0.clone()))
    }

    fn list_questions(&self, role: &RoleId) -> Result<Vec<Question>, StoreError> {
        let questions = self.questions.lock().expect("lock");
        Ok(questions.get(&role.0).cloned().unwrap_or_default())
    }

    fn add_question(&self, role: &RoleId, question: Question) -> Result<(), StoreError> {
        validate_question(&question)?;
        let mut questions = self.questions.lock().expect("lock");
        questions.entry(role.0.clone()).or_default().push(question);
        Ok(())
    }

    fn update_question(
        &self,
        role: &RoleId,
        index: usize,
        question: Question,
    ) -> Result<(), StoreError> {
        validate_question(&question)?;
        let mut questions = self.questions.lock().expect("lock");
        let bank = questions
            .get_mut(&role.0)
            .ok_or_else(|| StoreError::RoleNotFound(role.0.clone()))?;
        let slot = bank
            .get_mut(index)
            .ok_or_else(|| StoreError::QuestionNotFound {
                role: role.0.clone(),
                index,
            })?;
        *slot = question;
        Ok(())
    }

    fn delete_question(&self, role: &RoleId, index: usize) -> Result<(), StoreError> {
        let mut questions = self.questions.lock().expect("lock");
        let bank = questions
            .get_mut(&role.0)
            .ok_or_else(|| StoreError::RoleNotFound(role.0.clone()))?;
        if index >= bank.len() {
            return Err(StoreError::QuestionNotFound {
                role: role.0.clone(),
                index,
            });
        }
        bank.remove(index);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryAnalyticsStore {
    state: Mutex<AnalyticsSnapshot>,
}

impl AnalyticsStore for MemoryAnalyticsStore {
    fn record_applicant(&self, role: &RoleId) -> Result<(), AnalyticsError> {
        let mut state = self.state.lock().expect("lock");
        state.roles.entry(role.0.clone()).or_default().total_applicants += 1;
        Ok(())
    }

    fn record_test_outcome(&self, role: &RoleId, passed: bool) -> Result<(), AnalyticsError> {
        let mut state = self.state.lock().expect("lock");
        let counters = state.roles.entry(role.0.clone()).or_default();
        counters.selected_for_test += 1;
        if passed {
            counters.passed += 1;
        } else {
            counters.failed += 1;
        }
        Ok(())
    }

    fn record_interview(&self, record: InterviewRecord) -> Result<(), AnalyticsError> {
        let mut state = self.state.lock().expect("lock");
        state.interviews.push(record);
        Ok(())
    }

    fn snapshot(&self) -> Result<AnalyticsSnapshot, AnalyticsError> {
        Ok(self.state.lock().expect("lock").clone())
    }
}

pub(super) struct MemorySlotPool {
    times: Mutex<Vec<InterviewSlot>>,
}

impl MemorySlotPool {
    pub(super) fn new(times: Vec<InterviewSlot>) -> Self {
        Self {
            times: Mutex::new(times),
        }
    }
}

impl SlotPool for MemorySlotPool {
    fn available(&self) -> Result<Vec<InterviewSlot>, SlotPoolError> {
        Ok(self.times.lock().expect("lock").clone())
    }

    fn book(&self, slot: InterviewSlot) -> Result<(), SlotPoolError> {
        let mut times = self.times.lock().expect("lock");
        let position = times
            .iter()
            .position(|offered| *offered == slot)
            .ok_or(SlotPoolError::NotOffered(slot))?;
        times.remove(position);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    sent: Mutex<Vec<OutboundMessage>>,
    failures_remaining: Mutex<u32>,
}

impl RecordingNotifier {
    pub(super) fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().expect("lock").clone()
    }

    pub(super) fn fail_times(&self, failures: u32) {
        *self.failures_remaining.lock().expect("lock") = failures;
    }
}

impl Notifier for Arc<RecordingNotifier> {
    fn send(&self, message: &OutboundMessage) -> Result<(), NotificationError> {
        let mut failures = self.failures_remaining.lock().expect("lock");
        if *failures > 0 {
            *failures -= 1;
            return Err(NotificationError::Transport("relay offline".to_string()));
        }
        drop(failures);
        self.sent.lock().expect("lock").push(message.clone());
        Ok(())
    }
}

pub(super) struct StubScheduler {
    pub(super) join_url: String,
    calls: Mutex<u32>,
    failures_remaining: Mutex<u32>,
}

impl Default for StubScheduler {
    fn default() -> Self {
        Self {
            join_url: "https://meet.example.com/j/91507223".to_string(),
            calls: Mutex::new(0),
            failures_remaining: Mutex::new(0),
        }
    }
}

impl StubScheduler {
    pub(super) fn calls(&self) -> u32 {
        *self.calls.lock().expect("lock")
    }

    pub(super) fn fail_times(&self, failures: u32) {
        *self.failures_remaining.lock().expect("lock") = failures;
    }
}

impl MeetingScheduler for Arc<StubScheduler> {
    fn create_meeting(
        &self,
        _topic: &str,
        _start_time: InterviewSlot,
        _duration_minutes: u32,
    ) -> Result<String, SchedulingError> {
        let mut failures = self.failures_remaining.lock().expect("lock");
        if *failures > 0 {
            *failures -= 1;
            return Err(SchedulingError::Meeting("provider offline".to_string()));
        }
        drop(failures);
        *self.calls.lock().expect("lock") += 1;
        Ok(self.join_url.clone())
    }
}

pub(super) type TestService =
    RecruitmentService<MemoryRoleStore, MemoryAnalyticsStore, MemorySlotPool>;

pub(super) struct Harness {
    pub(super) service: Arc<TestService>,
    pub(super) slots: Arc<MemorySlotPool>,
    pub(super) notifier: Arc<RecordingNotifier>,
    pub(super) scheduler: Arc<StubScheduler>,
}

pub(super) fn slot(raw: &str) -> InterviewSlot {
    raw.parse().expect("valid slot")
}

pub(super) fn backend_questions() -> Vec<Question> {
    vec![
        Question {
            prompt: "Which HTTP method is idempotent by definition?".to_string(),
            options: vec![
                "POST".to_string(),
                "PUT".to_string(),
                "PATCH".to_string(),
                "CONNECT".to_string(),
            ],
            answer: "PUT".to_string(),
        },
        Question {
            prompt: "Which index structure serves range scans best?".to_string(),
            options: vec!["Hash".to_string(), "B-tree".to_string()],
            answer: "B-tree".to_string(),
        },
    ]
}

pub(super) fn harness() -> Harness {
    harness_with_scorer(StubScorer::selecting())
}

pub(super) fn harness_with_scorer(scorer: StubScorer) -> Harness {
    let roles = Arc::new(MemoryRoleStore::default());
    let backend = RoleId("backend_engineer".to_string());
    roles
        .upsert_role(&backend, "REST APIs, databases, cloud services")
        .expect("seed role");
    for question in backend_questions() {
        roles.add_question(&backend, question).expect("seed question");
    }
    roles
        .upsert_role(
            &RoleId("devops_engineer".to_string()),
            "Kubernetes, Terraform, CI/CD",
        )
        .expect("seed questionless role");

    let analytics = Arc::new(MemoryAnalyticsStore::default());
    let slots = Arc::new(MemorySlotPool::new(vec![
        slot("2025-03-01 10:00:00"),
        slot("2025-03-02 15:30:00"),
    ]));
    let notifier = Arc::new(RecordingNotifier::default());
    let scheduler = Arc::new(StubScheduler::default());

    let service = Arc::new(RecruitmentService::new(
        roles,
        analytics,
        slots.clone(),
        Box::new(scorer),
        Box::new(notifier.clone()),
        Box::new(scheduler.clone()),
        "Acme Robotics",
    ));

    Harness {
        service,
        slots,
        notifier,
        scheduler,
    }
}

/// Walks a selected candidate through intake, analysis, and a perfect test
/// up to the confirmation gate.
pub(super) fn advance_to_pending_confirm(harness: &Harness) {
    let service = &harness.service;
    service
        .start_application(RoleId("backend_engineer".to_string()))
        .expect("start");
    service
        .set_candidate_email("candidate@example.com")
        .expect("email");
    service
        .attach_resume("Six years of backend work with Rust and Postgres.")
        .expect("resume");
    service.analyze().expect("analysis");
    service.start_test().expect("test start");
    for question in backend_questions() {
        service.submit_answer(&question.answer).expect("answer");
    }
}

pub(super) fn advance_to_confirmed(harness: &Harness) {
    advance_to_pending_confirm(harness);
    harness.service.confirm().expect("confirm");
}
