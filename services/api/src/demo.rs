use std::sync::Arc;

use clap::Args;
use hireflow::error::AppError;
use hireflow::workflows::recruitment::{
    seed_default_roles, InterviewSlot, Question, RecruitmentService, ResumeScorer, RoleId,
    RoleStore, StubScorer,
};

use crate::infra::{
    FixedScheduler, InMemoryAnalyticsStore, InMemoryRoleStore, InMemorySlotPool, RecordingNotifier,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Role the demo candidate applies for
    #[arg(long, default_value = "backend_engineer")]
    pub(crate) role: String,
    /// Candidate address used in the outbound mail transcript
    #[arg(long, default_value = "candidate@example.com")]
    pub(crate) candidate_email: String,
    /// Score the resume as a rejection instead of a selection
    #[arg(long)]
    pub(crate) reject_resume: bool,
    /// Answer every screening question wrong
    #[arg(long)]
    pub(crate) fail_test: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        role,
        candidate_email,
        reject_resume,
        fail_test,
    } = args;

    println!("Recruitment workflow demo (in-memory collaborators)");

    let roles = Arc::new(InMemoryRoleStore::default());
    seed_default_roles(roles.as_ref()).map_err(|err| AppError::Workflow(err.into()))?;
    let backend = RoleId("backend_engineer".to_string());
    for question in demo_questions() {
        roles
            .add_question(&backend, question)
            .map_err(|err| AppError::Workflow(err.into()))?;
    }

    let analytics = Arc::new(InMemoryAnalyticsStore::default());
    let slots = Arc::new(InMemorySlotPool::new(demo_slots()));
    let notifier = RecordingNotifier::default();
    let scheduler = FixedScheduler::default();

    let scorer: Box<dyn ResumeScorer> = if reject_resume {
        Box::new(StubScorer::rejecting(
            "Profile does not match the published requirements.",
        ))
    } else {
        Box::new(StubScorer::selecting())
    };

    let service = RecruitmentService::new(
        roles,
        analytics,
        slots,
        scorer,
        Box::new(notifier.clone()),
        Box::new(scheduler.clone()),
        "Acme Robotics",
    );

    let role_id = RoleId(role);
    let status = service
        .start_application(role_id.clone())
        .map_err(AppError::Workflow)?;
    println!("- Application started for role {} -> {}", role_id, status.state);

    service
        .set_candidate_email(&candidate_email)
        .map_err(AppError::Workflow)?;
    service
        .attach_resume("Seven years building REST APIs on AWS with Postgres and Kubernetes.")
        .map_err(AppError::Workflow)?;

    let status = service.analyze().map_err(AppError::Workflow)?;
    println!("- Resume analyzed -> {}", status.state);
    if let Some(feedback) = &status.feedback {
        println!("  Feedback: {feedback}");
    }

    if status.state == "selected_pending_test" {
        let bank = service.list_questions(&role_id).map_err(AppError::Workflow)?;
        let mut step = service.start_test().map_err(AppError::Workflow)?;
        while let Some(question) = step.question.clone() {
            println!(
                "  Question {}/{}: {}",
                question.index + 1,
                question.total,
                question.prompt
            );
            let correct = bank[question.index].answer.clone();
            let answer = if fail_test {
                wrong_option(&question.options, &correct)
            } else {
                correct
            };
            println!("    Answer: {answer}");
            step = service.submit_answer(&answer).map_err(AppError::Workflow)?;
        }

        if let Some(report) = &step.report {
            println!(
                "- Screening scored {:.1}% ({}/{}) -> {}",
                report.percentage, report.correct, report.total, step.status.state
            );
        }

        if step.status.state == "test_passed_pending_confirm" {
            let status = service.confirm().map_err(AppError::Workflow)?;
            println!("- Candidate confirmed -> {}", status.state);

            let proposed = service.proposed_slot().map_err(AppError::Workflow)?;
            if let Some(slot) = proposed {
                println!("- Recruiter proposes {slot}");
            }
            let status = service.schedule(None).map_err(AppError::Workflow)?;
            println!(
                "- Interview scheduled for {} -> {}",
                status
                    .interview_time
                    .map(|slot| slot.to_string())
                    .unwrap_or_default(),
                status.join_url.as_deref().unwrap_or_default()
            );
        }
    }

    println!("\nOutbound mail transcript");
    let sent = notifier.sent();
    if sent.is_empty() {
        println!("- none");
    }
    for message in &sent {
        println!("- To {}: {}", message.to.join(", "), message.subject);
    }

    let snapshot = service.analytics_snapshot().map_err(AppError::Workflow)?;
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("\nAnalytics snapshot\n{json}"),
        Err(err) => println!("\nAnalytics snapshot unavailable: {err}"),
    }

    Ok(())
}

fn demo_questions() -> Vec<Question> {
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

fn demo_slots() -> Vec<InterviewSlot> {
    ["2025-03-01 10:00:00", "2025-03-02 15:30:00"]
        .into_iter()
        .map(|raw| raw.parse().expect("valid demo slot"))
        .collect()
}

fn wrong_option(options: &[String], correct: &str) -> String {
    options
        .iter()
        .find(|option| option.as_str() != correct)
        .cloned()
        .unwrap_or_else(|| correct.to_string())
}
