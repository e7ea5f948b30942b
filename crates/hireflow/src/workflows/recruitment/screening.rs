use serde::Serialize;

use super::domain::{Question, TestProgress};

/// Minimum percentage required to pass a screening test.
pub const PASS_THRESHOLD_PCT: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScreeningError {
    #[error("an answer is required before advancing")]
    EmptyAnswer,
    #[error("the test is already complete")]
    AlreadyComplete,
    #[error("the test has unanswered questions")]
    Incomplete,
}

/// Result of scoring a completed screening run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestReport {
    pub correct: usize,
    pub total: usize,
    pub percentage: f64,
    pub passed: bool,
}

/// Drives a candidate through one role's ordered question list, one question
/// at a time, recording chosen option text verbatim. Progress lives on the
/// candidate application; the engine itself is stateless between calls.
#[derive(Debug, Clone)]
pub struct ScreeningTest {
    questions: Vec<Question>,
}

impl ScreeningTest {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Resets progress for a fresh run. A role with no questions completes
    /// immediately and will score as an automatic pass.
    pub fn begin(&self, progress: &mut TestProgress) {
        progress.clear();
        if self.questions.is_empty() {
            progress.completed = true;
        }
    }

    pub fn current_question<'a>(&'a self, progress: &TestProgress) -> Option<&'a Question> {
        if progress.completed {
            return None;
        }
        self.questions.get(progress.current_index)
    }

    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Records one answer and advances. Skipping is not possible: an empty
    /// selection is rejected and the index only moves on a recorded answer.
    pub fn record_answer(
        &self,
        progress: &mut TestProgress,
        answer: &str,
    ) -> Result<(), ScreeningError> {
        if progress.completed {
            return Err(ScreeningError::AlreadyComplete);
        }
        if answer.trim().is_empty() {
            return Err(ScreeningError::EmptyAnswer);
        }

        progress.answers.push(answer.to_string());
        progress.current_index += 1;
        if progress.current_index >= self.questions.len() {
            progress.completed = true;
        }
        Ok(())
    }

    /// Scores a completed run: `correct = count(answers[i] == questions[i].answer)`,
    /// pass iff the percentage reaches [`PASS_THRESHOLD_PCT`]. The
    /// zero-question case reports 100% and passes.
    pub fn score(&self, progress: &TestProgress) -> Result<TestReport, ScreeningError> {
        if !progress.completed {
            return Err(ScreeningError::Incomplete);
        }

        let total = self.questions.len();
        if total == 0 {
            return Ok(TestReport {
                correct: 0,
                total: 0,
                percentage: 100.0,
                passed: true,
            });
        }

        let correct = self
            .questions
            .iter()
            .zip(progress.answers.iter())
            .filter(|(question, answer)| question.answer == **answer)
            .count();
        let percentage = 100.0 * correct as f64 / total as f64;

        Ok(TestReport {
            correct,
            total,
            percentage,
            passed: percentage >= PASS_THRESHOLD_PCT,
        })
    }
}
