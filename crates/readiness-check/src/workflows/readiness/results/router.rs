use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::warn;

use super::admin::{render_admin_page, ADMIN_PATH};
use super::domain::{PageRequest, ResultSubmission};
use super::repository::{RepositoryError, ResultRepository};
use super::service::{ResultService, ResultServiceError};
use crate::theme::ThemeSettings;

pub const RESULTS_PATH: &str = "/api/ai-readiness-results";
pub const LANDING_PATH: &str = "/aireadinesscheck";

pub struct ResultsState<R> {
    pub service: Arc<ResultService<R>>,
    pub theme: Arc<ThemeSettings>,
}

impl<R> Clone for ResultsState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            theme: Arc::clone(&self.theme),
        }
    }
}

/// Router exposing result submission, listing, the short-link redirect, and the admin view.
pub fn results_router<R>(service: Arc<ResultService<R>>, theme: Arc<ThemeSettings>) -> Router
where
    R: ResultRepository + 'static,
{
    Router::new()
        .route(
            RESULTS_PATH,
            get(list_handler::<R>).post(submit_handler::<R>),
        )
        .route("/aireadinesscheck/r/:slug", get(redirect_handler::<R>))
        .route(ADMIN_PATH, get(admin_handler::<R>))
        .with_state(ResultsState { service, theme })
}

pub(crate) async fn submit_handler<R>(
    State(state): State<ResultsState<R>>,
    axum::Json(submission): axum::Json<ResultSubmission>,
) -> Response
where
    R: ResultRepository + 'static,
{
    match state.service.submit(submission).await {
        Ok(receipt) => (StatusCode::CREATED, axum::Json(receipt)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R>(
    State(state): State<ResultsState<R>>,
    Query(request): Query<PageRequest>,
) -> Response
where
    R: ResultRepository + 'static,
{
    match state.service.list(request).await {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn redirect_handler<R>(
    State(state): State<ResultsState<R>>,
    Path(slug): Path<String>,
) -> Response
where
    R: ResultRepository + 'static,
{
    let target = match state.service.report_url(&slug).await {
        Ok(Some(url)) => url,
        Ok(None) => LANDING_PATH.to_string(),
        Err(err) => {
            warn!(%slug, error = %err, "report lookup failed; redirecting to landing page");
            LANDING_PATH.to_string()
        }
    };
    (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
}

pub(crate) async fn admin_handler<R>(
    State(state): State<ResultsState<R>>,
    Query(request): Query<PageRequest>,
) -> Response
where
    R: ResultRepository + 'static,
{
    let page = match state.service.list(request).await {
        Ok(page) => page,
        Err(err) => return error_response(err),
    };

    match render_admin_page(&page, state.theme.resolved()) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn error_response(err: ResultServiceError) -> Response {
    let status = match &err {
        ResultServiceError::Submission(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ResultServiceError::Repository(RepositoryError::Unavailable(_))
        | ResultServiceError::SlugExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
        ResultServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
