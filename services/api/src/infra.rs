use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use hireflow::workflows::recruitment::{
    validate_question, AnalyticsError, AnalyticsSnapshot, AnalyticsStore, InterviewRecord,
    InterviewSlot, MeetingScheduler, NotificationError, Notifier, OutboundMessage, Question,
    RoleId, RoleStore, SchedulingError, SlotPool, SlotPoolError, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory stores and collaborators for the CLI demo, mirroring the
/// file-backed implementations without touching disk or the network.
#[derive(Default)]
pub(crate) struct InMemoryRoleStore {
    requirements: Mutex<BTreeMap<String, String>>,
    questions: Mutex<BTreeMap<String, Vec<Question>>>,
}

impl RoleStore for InMemoryRoleStore {
    fn list_roles(&self) -> Result<Vec<RoleId>, StoreError> {
        let requirements = self.requirements.lock().expect("role store mutex poisoned");
        Ok(requirements.keys().map(|id| RoleId(id.clone())).collect())
    }

    fn get_requirement(&self, role: &RoleId) -> Result<Option<String>, StoreError> {
        let requirements = self.requirements.lock().expect("role store mutex poisoned");
        Ok(requirements.get(&role.0).cloned())
    }

    fn upsert_role(&self, role: &RoleId, requirement: &str) -> Result<(), StoreError> {
        let mut requirements = self.requirements.lock().expect("role store mutex poisoned");
        requirements.insert(role.0.clone(), requirement.to_string());
        Ok(())
    }

    fn delete_role(&self, role: &RoleId) -> Result<(), StoreError> {
        let mut requirements = self.requirements.lock().expect("role store mutex poisoned");
        requirements
            .remove(&role.0)
            .map(|_| ())
            .ok_or_else(|| StoreError::RoleNotFound(role.0.clone()))
    }

    fn list_questions(&self, role: &RoleId) -> Result<Vec<Question>, StoreError> {
        let questions = self.questions.lock().expect("role store mutex poisoned");
        Ok(questions.get(&role.0).cloned().unwrap_or_default())
    }

    fn add_question(&self, role: &RoleId, question: Question) -> Result<(), StoreError> {
        validate_question(&question)?;
        let mut questions = self.questions.lock().expect("role store mutex poisoned");
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
        let mut questions = self.questions.lock().expect("role store mutex poisoned");
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
        let mut questions = self.questions.lock().expect("role store mutex poisoned");
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
pub(crate) struct InMemoryAnalyticsStore {
    state: Mutex<AnalyticsSnapshot>,
}

impl AnalyticsStore for InMemoryAnalyticsStore {
    fn record_applicant(&self, role: &RoleId) -> Result<(), AnalyticsError> {
        let mut state = self.state.lock().expect("analytics mutex poisoned");
        state.roles.entry(role.0.clone()).or_default().total_applicants += 1;
        Ok(())
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
        Ok(())
    }

    fn record_interview(&self, record: InterviewRecord) -> Result<(), AnalyticsError> {
        let mut state = self.state.lock().expect("analytics mutex poisoned");
        state.interviews.push(record);
        Ok(())
    }

    fn snapshot(&self) -> Result<AnalyticsSnapshot, AnalyticsError> {
        Ok(self.state.lock().expect("analytics mutex poisoned").clone())
    }
}

pub(crate) struct InMemorySlotPool {
    times: Mutex<Vec<InterviewSlot>>,
}

impl InMemorySlotPool {
    pub(crate) fn new(times: Vec<InterviewSlot>) -> Self {
        Self {
            times: Mutex::new(times),
        }
    }
}

impl SlotPool for InMemorySlotPool {
    fn available(&self) -> Result<Vec<InterviewSlot>, SlotPoolError> {
        Ok(self.times.lock().expect("slot pool mutex poisoned").clone())
    }

    fn book(&self, slot: InterviewSlot) -> Result<(), SlotPoolError> {
        let mut times = self.times.lock().expect("slot pool mutex poisoned");
        let position = times
            .iter()
            .position(|offered| *offered == slot)
            .ok_or(SlotPoolError::NotOffered(slot))?;
        times.remove(position);
        Ok(())
    }
}

/// Demo notifier: records the outbound transcript instead of submitting mail.
#[derive(Clone, Default)]
pub(crate) struct RecordingNotifier {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
}

impl RecordingNotifier {
    pub(crate) fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, message: &OutboundMessage) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}

/// Demo scheduler: mints a deterministic join link without calling out.
#[derive(Clone)]
pub(crate) struct FixedScheduler {
    pub(crate) join_url: String,
}

impl Default for FixedScheduler {
    fn default() -> Self {
        Self {
            join_url: "https://meet.example.com/j/83412765".to_string(),
        }
    }
}

impl MeetingScheduler for FixedScheduler {
    fn create_meeting(
        &self,
        _topic: &str,
        _start_time: InterviewSlot,
        _duration_minutes: u32,
    ) -> Result<String, SchedulingError> {
        Ok(self.join_url.clone())
    }
}
