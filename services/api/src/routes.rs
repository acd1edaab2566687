use crate::infra::{ApiState, AppState};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Utc;
use readiness_check::error::AppError;
use readiness_check::theme::{ColorScheme, ThemePreference, ThemeSnapshot};
use readiness_check::workflows::readiness::results::{
    results_router, ResultRepository, ResultSubmission,
};
use readiness_check::workflows::readiness::storage::{
    verify_signature, FilesystemArtifactStore, StorageError, UrlPolicy,
};
use readiness_check::workflows::readiness::{
    AnswerSummary, RawAnswers, ReadinessCatalog, ReadinessScorecard, ReportFormat, SurveySession,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

const REPORT_FILE_STEM: &str = "ai-readiness-report";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScoreResponse {
    #[serde(flatten)]
    pub(crate) scorecard: ReadinessScorecard,
    pub(crate) answers: Vec<AnswerSummary>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    pub(crate) format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ThemeUpdate {
    #[serde(default)]
    pub(crate) preference: Option<ThemePreference>,
    #[serde(default)]
    pub(crate) system: Option<ColorScheme>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SignatureQuery {
    #[serde(default)]
    pub(crate) expires: Option<i64>,
    #[serde(default)]
    pub(crate) signature: Option<String>,
}

pub(crate) fn with_service_routes<R>(
    state: ApiState<R>,
    artifacts: Option<Arc<FilesystemArtifactStore>>,
) -> Router
where
    R: ResultRepository + 'static,
{
    let readiness: Router = Router::new()
        .route("/api/v1/readiness/catalog", get(catalog_endpoint::<R>))
        .route("/api/v1/readiness/score", post(score_endpoint::<R>))
        .route("/api/v1/readiness/report", post(report_endpoint::<R>))
        .route(
            "/api/v1/theme",
            get(theme_snapshot::<R>).post(theme_endpoint::<R>),
        )
        .with_state(state.clone());

    let mut router = results_router(state.results.clone(), state.theme.clone())
        .merge(readiness)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint));

    if let Some(store) = artifacts {
        let served: Router = Router::new()
            .route("/artifacts/*key", get(artifact_endpoint))
            .with_state(store);
        router = router.merge(served);
    }

    router
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn catalog_endpoint<R>(State(state): State<ApiState<R>>) -> Json<ReadinessCatalog>
where
    R: ResultRepository + 'static,
{
    Json(state.catalog.as_ref().clone())
}

/// Score raw answers through a survey session, exactly as an interactive respondent would.
pub(crate) async fn score_endpoint<R>(
    State(state): State<ApiState<R>>,
    Json(answers): Json<RawAnswers>,
) -> Result<Json<ScoreResponse>, AppError>
where
    R: ResultRepository + 'static,
{
    let mut session = SurveySession::new(state.catalog.clone());
    session.apply(&answers)?;
    let frozen = session.freeze();

    let scorecard = state.results.engine().score(frozen)?;
    let answers = state.results.summarizer().summarize(frozen)?;
    Ok(Json(ScoreResponse { scorecard, answers }))
}

/// Interactive renderer: returns the document as a download and persists nothing.
pub(crate) async fn report_endpoint<R>(
    State(state): State<ApiState<R>>,
    Query(query): Query<ReportQuery>,
    Json(submission): Json<ResultSubmission>,
) -> Result<Response, AppError>
where
    R: ResultRepository + 'static,
{
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse::<ReportFormat>()?,
        None => ReportFormat::Pdf,
    };

    let input = state.results.prepare(submission)?;
    let report = state.results.renderer().render(&input, format)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        report.file_name(REPORT_FILE_STEM)
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    )
        .into_response())
}

pub(crate) async fn theme_snapshot<R>(State(state): State<ApiState<R>>) -> Json<ThemeSnapshot>
where
    R: ResultRepository + 'static,
{
    Json(state.theme.snapshot())
}

pub(crate) async fn theme_endpoint<R>(
    State(state): State<ApiState<R>>,
    Json(update): Json<ThemeUpdate>,
) -> Json<ThemeSnapshot>
where
    R: ResultRepository + 'static,
{
    if let Some(system) = update.system {
        state.theme.system_changed(system);
    }
    if let Some(preference) = update.preference {
        state.theme.set_preference(preference);
    }
    Json(state.theme.snapshot())
}

pub(crate) async fn artifact_endpoint(
    State(store): State<Arc<FilesystemArtifactStore>>,
    Path(key): Path<String>,
    Query(query): Query<SignatureQuery>,
) -> Response {
    if let UrlPolicy::Signed { secret, .. } = store.policy() {
        let valid = match (query.expires, query.signature.as_deref()) {
            (Some(expires), Some(signature)) => {
                verify_signature(secret, &key, expires, signature, Utc::now())
            }
            _ => false,
        };
        if !valid {
            let payload = json!({ "error": "invalid or expired signature" });
            return (StatusCode::FORBIDDEN, Json(payload)).into_response();
        }
    }

    match store.read(&key).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                FilesystemArtifactStore::content_type_for(&key).to_string(),
            )],
            bytes,
        )
            .into_response(),
        Err(StorageError::InvalidKey(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(StorageError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            StatusCode::NOT_FOUND.into_response()
        }
        Err(err) => {
            warn!(key, error = %err, "failed to serve artifact");
            let payload = json!({ "error": "artifact unavailable" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
