use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::analytics::{AnalyticsError, AnalyticsStore};
use super::domain::{InterviewSlot, Question, RoleId};
use super::roles::{RoleStore, StoreError};
use super::service::{RecruitmentService, ServiceError};
use super::slots::{SlotPool, SlotPoolError};

/// Router builder exposing the candidate workflow, slot listing, analytics
/// snapshot, and role/question administration.
pub fn recruitment_router<R, A, P>(service: Arc<RecruitmentService<R, A, P>>) -> Router
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    Router::new()
        .route(
            "/api/v1/recruitment/applications",
            post(start_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/application",
            get(status_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/application/email",
            put(email_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/application/resume",
            put(resume_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/application/analyze",
            post(analyze_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/application/test",
            post(start_test_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/application/test/question",
            get(question_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/application/test/answer",
            post(answer_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/application/confirm",
            post(confirm_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/application/schedule",
            post(schedule_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/application/reset",
            post(reset_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/application/new",
            post(new_application_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/slots",
            get(slots_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/analytics",
            get(analytics_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/roles",
            get(list_roles_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/roles/:role_id",
            get(get_role_handler::<R, A, P>)
                .put(upsert_role_handler::<R, A, P>)
                .delete(delete_role_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/roles/:role_id/questions",
            get(list_questions_handler::<R, A, P>).post(add_question_handler::<R, A, P>),
        )
        .route(
            "/api/v1/recruitment/roles/:role_id/questions/:index",
            put(update_question_handler::<R, A, P>).delete(delete_question_handler::<R, A, P>),
        )
        .with_state(service)
}

type Service<R, A, P> = State<Arc<RecruitmentService<R, A, P>>>;

#[derive(Debug, Deserialize)]
struct StartRequest {
    role: String,
    #[serde(default)]
    candidate_email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmailRequest {
    email: String,
}

#[derive(Debug, Deserialize)]
struct ResumeRequest {
    resume_text: String,
}

#[derive(Debug, Deserialize)]
struct AnswerRequest {
    answer: String,
}

#[derive(Debug, Deserialize)]
struct ScheduleRequest {
    #[serde(default)]
    time: Option<InterviewSlot>,
}

#[derive(Debug, Deserialize)]
struct RoleRequest {
    requirement: String,
}

fn error_response(err: &ServiceError) -> Response {
    let status = match err {
        ServiceError::NoApplication
        | ServiceError::UnknownRole(_)
        | ServiceError::Store(StoreError::RoleNotFound(_))
        | ServiceError::Store(StoreError::QuestionNotFound { .. }) => StatusCode::NOT_FOUND,
        ServiceError::InvalidEmail(_)
        | ServiceError::EmptyResume
        | ServiceError::Store(StoreError::TooFewOptions)
        | ServiceError::Store(StoreError::AnswerNotAnOption)
        | ServiceError::Screening(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Transition(_) | ServiceError::Slots(SlotPoolError::NotOffered(_)) => {
            StatusCode::CONFLICT
        }
        ServiceError::Slots(SlotPoolError::Exhausted) => StatusCode::CONFLICT,
        ServiceError::Notification(_)
        | ServiceError::Scheduling(_)
        | ServiceError::Analytics(AnalyticsError::Unavailable(_))
        | ServiceError::Store(StoreError::Unavailable(_))
        | ServiceError::Slots(SlotPoolError::Unavailable(_)) => StatusCode::BAD_GATEWAY,
    };

    let payload = json!({
        "error": err.to_string(),
        "retryable": err.is_retryable(),
    });
    (status, Json(payload)).into_response()
}

fn respond<T: serde::Serialize>(result: Result<T, ServiceError>) -> Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(err) => error_response(&err),
    }
}

/// Transitions that reach out to blocking collaborators (scoring, mail,
/// meeting creation) run on the blocking pool so the provider clients can
/// drive their own runtimes.
async fn respond_blocking<T, F>(f: F) -> Response
where
    T: serde::Serialize + Send + 'static,
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => respond(result),
        Err(err) => {
            let payload = json!({
                "error": format!("worker task failed: {err}"),
                "retryable": true,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

async fn start_handler<R, A, P>(
    State(service): Service<R, A, P>,
    Json(request): Json<StartRequest>,
) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    let result = service
        .start_application(RoleId(request.role))
        .and_then(|view| match request.candidate_email {
            Some(email) => service.set_candidate_email(&email),
            None => Ok(view),
        });
    match result {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn status_handler<R, A, P>(State(service): Service<R, A, P>) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    respond(service.status())
}

async fn email_handler<R, A, P>(
    State(service): Service<R, A, P>,
    Json(request): Json<EmailRequest>,
) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    respond(service.set_candidate_email(&request.email))
}

async fn resume_handler<R, A, P>(
    State(service): Service<R, A, P>,
    Json(request): Json<ResumeRequest>,
) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    respond(service.attach_resume(&request.resume_text))
}

async fn analyze_handler<R, A, P>(State(service): Service<R, A, P>) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    respond_blocking(move || service.analyze()).await
}

async fn start_test_handler<R, A, P>(State(service): Service<R, A, P>) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    respond_blocking(move || service.start_test()).await
}

async fn question_handler<R, A, P>(State(service): Service<R, A, P>) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    respond(service.current_question())
}

async fn answer_handler<R, A, P>(
    State(service): Service<R, A, P>,
    Json(request): Json<AnswerRequest>,
) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    respond_blocking(move || service.submit_answer(&request.answer)).await
}

async fn confirm_handler<R, A, P>(State(service): Service<R, A, P>) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    respond_blocking(move || service.confirm()).await
}

async fn schedule_handler<R, A, P>(
    State(service): Service<R, A, P>,
    Json(request): Json<ScheduleRequest>,
) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    respond_blocking(move || service.schedule(request.time)).await
}

async fn reset_handler<R, A, P>(State(service): Service<R, A, P>) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    service.reset();
    (StatusCode::OK, Json(json!({ "status": "reset" }))).into_response()
}

async fn new_application_handler<R, A, P>(State(service): Service<R, A, P>) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    respond(service.new_application())
}

async fn slots_handler<R, A, P>(State(service): Service<R, A, P>) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    let result = service.available_slots().and_then(|available| {
        let proposed = service.proposed_slot()?;
        Ok(json!({ "proposed": proposed, "available_times": available }))
    });
    respond(result)
}

async fn analytics_handler<R, A, P>(State(service): Service<R, A, P>) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    respond(service.analytics_snapshot())
}

async fn list_roles_handler<R, A, P>(State(service): Service<R, A, P>) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    respond(service.list_roles())
}

async fn get_role_handler<R, A, P>(
    State(service): Service<R, A, P>,
    Path(role_id): Path<String>,
) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    let role = RoleId(role_id);
    let result = service
        .role_requirement(&role)
        .map(|requirement| json!({ "role": role.0, "requirement": requirement }));
    respond(result)
}

async fn upsert_role_handler<R, A, P>(
    State(service): Service<R, A, P>,
    Path(role_id): Path<String>,
    Json(request): Json<RoleRequest>,
) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    let role = RoleId(role_id);
    let result = service
        .upsert_role(&role, &request.requirement)
        .map(|()| json!({ "role": role.0, "status": "stored" }));
    respond(result)
}

async fn delete_role_handler<R, A, P>(
    State(service): Service<R, A, P>,
    Path(role_id): Path<String>,
) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    let role = RoleId(role_id);
    let result = service
        .delete_role(&role)
        .map(|()| json!({ "role": role.0, "status": "deleted" }));
    respond(result)
}

async fn list_questions_handler<R, A, P>(
    State(service): Service<R, A, P>,
    Path(role_id): Path<String>,
) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    respond(service.list_questions(&RoleId(role_id)))
}

async fn add_question_handler<R, A, P>(
    State(service): Service<R, A, P>,
    Path(role_id): Path<String>,
    Json(question): Json<Question>,
) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    let role = RoleId(role_id);
    let result = service
        .add_question(&role, question)
        .map(|()| json!({ "role": role.0, "status": "stored" }));
    respond(result)
}

async fn update_question_handler<R, A, P>(
    State(service): Service<R, A, P>,
    Path((role_id, index)): Path<(String, usize)>,
    Json(question): Json<Question>,
) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    let role = RoleId(role_id);
    let result = service
        .update_question(&role, index, question)
        .map(|()| json!({ "role": role.0, "index": index, "status": "stored" }));
    respond(result)
}

async fn delete_question_handler<R, A, P>(
    State(service): Service<R, A, P>,
    Path((role_id, index)): Path<(String, usize)>,
) -> Response
where
    R: RoleStore + 'static,
    A: AnalyticsStore + 'static,
    P: SlotPool + 'static,
{
    let role = RoleId(role_id);
    let result = service
        .delete_question(&role, index)
        .map(|()| json!({ "role": role.0, "index": index, "status": "deleted" }));
    respond(result)
}
