use super::common::backend_questions;
use crate::workflows::recruitment::domain::{Question, TestProgress};
use crate::workflows::recruitment::screening::{ScreeningError, ScreeningTest};

fn ten_questions() -> Vec<Question> {
    (0..10)
        .map(|n| Question {
            prompt: format!("Question {n}"),
            options: vec!["yes".to_string(), "no".to_string()],
            answer: "yes".to_string(),
        })
        .collect()
}

#[test]
fn all_correct_answers_score_one_hundred_percent() {
    let test = ScreeningTest::new(backend_questions());
    let mut progress = TestProgress::default();
    test.begin(&mut progress);

    for question in backend_questions() {
        test.record_answer(&mut progress, &question.answer).expect("answer");
    }

    let report = test.score(&progress).expect("complete");
    assert_eq!(report.correct, 2);
    assert_eq!(report.total, 2);
    assert_eq!(report.percentage, 100.0);
    assert!(report.passed);
}

#[test]
fn all_wrong_answers_fail() {
    let test = ScreeningTest::new(backend_questions());
    let mut progress = TestProgress::default();
    test.begin(&mut progress);

    test.record_answer(&mut progress, "CONNECT").expect("answer");
    test.record_answer(&mut progress, "Hash").expect("answer");

    let report = test.score(&progress).expect("complete");
    assert_eq!(report.correct, 0);
    assert_eq!(report.percentage, 0.0);
    assert!(!report.passed);
}

#[test]
fn threshold_is_inclusive_at_seventy_percent() {
    let test = ScreeningTest::new(ten_questions());
    let mut progress = TestProgress::default();
    test.begin(&mut progress);

    for n in 0..10 {
        let answer = if n < 7 { "yes" } else { "no" };
        test.record_answer(&mut progress, answer).expect("answer");
    }

    let report = test.score(&progress).expect("complete");
    assert_eq!(report.correct, 7);
    assert_eq!(report.percentage, 70.0);
    assert!(report.passed, "exactly 70% passes");
}

#[test]
fn sixty_six_percent_fails() {
    let questions = ten_questions().into_iter().take(3).collect::<Vec<_>>();
    let test = ScreeningTest::new(questions);
    let mut progress = TestProgress::default();
    test.begin(&mut progress);

    test.record_answer(&mut progress, "yes").expect("answer");
    test.record_answer(&mut progress, "yes").expect("answer");
    test.record_answer(&mut progress, "no").expect("answer");

    let report = test.score(&progress).expect("complete");
    assert!(!report.passed);
}

#[test]
fn empty_answers_are_rejected_and_do_not_advance() {
    let test = ScreeningTest::new(backend_questions());
    let mut progress = TestProgress::default();
    test.begin(&mut progress);

    assert_eq!(
        test.record_answer(&mut progress, "   "),
        Err(ScreeningError::EmptyAnswer)
    );
    assert_eq!(progress.current_index, 0);
    assert!(progress.answers.is_empty());

    let current = test.current_question(&progress).expect("question");
    assert_eq!(current.prompt, backend_questions()[0].prompt);
}

#[test]
fn answers_are_recorded_verbatim() {
    let test = ScreeningTest::new(backend_questions());
    let mut progress = TestProgress::default();
    test.begin(&mut progress);

    test.record_answer(&mut progress, "  PUT  ").expect("answer");
    assert_eq!(progress.answers[0], "  PUT  ");

    test.record_answer(&mut progress, "B-tree").expect("answer");
    let report = test.score(&progress).expect("complete");
    // Verbatim recording means the padded answer does not match.
    assert_eq!(report.correct, 1);
}

#[test]
fn completed_test_refuses_further_answers() {
    let test = ScreeningTest::new(backend_questions());
    let mut progress = TestProgress::default();
    test.begin(&mut progress);

    test.record_answer(&mut progress, "PUT").expect("answer");
    test.record_answer(&mut progress, "B-tree").expect("answer");
    assert!(progress.completed);
    assert!(test.current_question(&progress).is_none());

    assert_eq!(
        test.record_answer(&mut progress, "PUT"),
        Err(ScreeningError::AlreadyComplete)
    );
}

#[test]
fn incomplete_test_cannot_be_scored() {
    let test = ScreeningTest::new(backend_questions());
    let mut progress = TestProgress::default();
    test.begin(&mut progress);
    test.record_answer(&mut progress, "PUT").expect("answer");

    assert_eq!(test.score(&progress), Err(ScreeningError::Incomplete));
}

#[test]
fn zero_questions_complete_immediately_and_auto_pass() {
    let test = ScreeningTest::new(Vec::new());
    let mut progress = TestProgress::default();
    test.begin(&mut progress);

    assert!(progress.completed);
    let report = test.score(&progress).expect("scored");
    assert_eq!(report.total, 0);
    assert_eq!(report.percentage, 100.0);
    assert!(report.passed);
}

#[test]
fn begin_resets_previous_progress() {
    let test = ScreeningTest::new(backend_questions());
    let mut progress = TestProgress::default();
    test.begin(&mut progress);
    test.record_answer(&mut progress, "PUT").expect("answer");

    test.begin(&mut progress);
    assert!(progress.is_empty());
}
