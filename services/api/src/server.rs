use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hireflow::config::AppConfig;
use hireflow::error::AppError;
use hireflow::telemetry;
use hireflow::workflows::recruitment::{
    seed_default_roles, JsonAnalyticsStore, JsonRoleStore, JsonSlotPool, MeetingCredentials,
    RecruitmentService, ServiceError, SmtpMailer, StubScorer, ZoomMeetingClient,
};
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_recruitment_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(data_dir) = args.data_dir.take() {
        config.data.dir = data_dir;
    }

    telemetry::init(&config.telemetry)?;

    // The server talks to real providers; refuse to start on blank
    // credentials instead of substituting defaults.
    config.providers.require()?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let data_dir = config.data.dir.as_path();
    let roles = Arc::new(JsonRoleStore::open(
        data_dir.join("role_requirements.json"),
        data_dir.join("question_bank.json"),
    ));
    seed_default_roles(roles.as_ref()).map_err(|err| AppError::Workflow(err.into()))?;
    let analytics = Arc::new(JsonAnalyticsStore::open(data_dir.join("analytics.json")));
    let slots = Arc::new(JsonSlotPool::open(data_dir.join("available_times.json")));

    let mailer = SmtpMailer::new(
        &config.providers.email_relay,
        &config.providers.email_sender,
        &config.providers.email_passkey,
    )
    .map_err(|err| AppError::Workflow(ServiceError::Notification(err)))?;
    let scheduler = ZoomMeetingClient::new(MeetingCredentials {
        account_id: config.providers.zoom_account_id.clone(),
        client_id: config.providers.zoom_client_id.clone(),
        client_secret: config.providers.zoom_client_secret.clone(),
    })
    .map_err(|err| AppError::Workflow(ServiceError::Scheduling(err)))?;

    let service = Arc::new(RecruitmentService::new(
        roles,
        analytics,
        slots,
        Box::new(StubScorer::selecting()),
        Box::new(mailer),
        Box::new(scheduler),
        config.providers.company_name.clone(),
    ));

    let app = with_recruitment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "recruitment workflow orchestrator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
