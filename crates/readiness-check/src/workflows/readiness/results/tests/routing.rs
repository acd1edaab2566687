use super::common::*;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::readiness::results::router::{redirect_handler, ResultsState};

#[tokio::test]
async fn submit_route_returns_receipt() {
    let service = build_service(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryArtifactStore::default()),
    )
    .with_slug_source(scripted_slugs(&["r0ute5"]));
    let router = router_with_service(service);

    let payload = json!({
        "scores": { "Strategic Vision & Value": [0, 1, 2] },
        "userInfo": { "firstName": "Ada", "email": "ada@example.com" }
    });
    let response = router
        .oneshot(json_request("POST", "/api/ai-readiness-results", payload))
        .await
        .expect("response");

    assert_status(&response, StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["slug"], "r0ute5");
    assert_eq!(body["artifactStored"], true);
}

#[tokio::test]
async fn submit_route_rejects_contract_violations() {
    let router = router_with_service(build_service(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryArtifactStore::default()),
    ));

    let payload = json!({ "scores": { "Strategic Vision & Value": [5] } });
    let response = router
        .oneshot(json_request("POST", "/api/ai-readiness-results", payload))
        .await
        .expect("response");

    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert!(body["error"].as_str().expect("message").contains("outside 0..=4"));
}

#[tokio::test]
async fn submit_route_reports_unavailable_storage() {
    let router = router_with_service(build_service(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryArtifactStore::default()),
    ));

    let payload = json!({
        "totals": [{ "name": "Data Stewardship & Quality", "sum": 0, "readiness": 50, "status": "Established" }],
        "avg": 50
    });
    let response = router
        .oneshot(json_request("POST", "/api/ai-readiness-results", payload))
        .await
        .expect("response");

    assert_status(&response, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn list_route_clamps_page_size() {
    let repository = Arc::new(MemoryRepository::default());
    repository.seed(record("abc123", 0));
    let router = router_with_service(build_service(
        repository,
        Arc::new(MemoryArtifactStore::default()),
    ));

    let response = router
        .oneshot(get_request("/api/ai-readiness-results?page=0&pageSize=500"))
        .await
        .expect("response");

    assert_status(&response, StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 100);
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["results"][0]["slug"], "abc123");
    assert_eq!(body["results"][0]["status"], "Established");
}

#[tokio::test]
async fn redirect_route_points_at_stored_report() {
    let repository = Arc::new(MemoryRepository::default());
    repository.seed(record("abc123", 0));
    let router = router_with_service(build_service(
        repository,
        Arc::new(MemoryArtifactStore::default()),
    ));

    let response = router
        .oneshot(get_request("/aireadinesscheck/r/abc123"))
        .await
        .expect("response");

    assert_status(&response, StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://files.example.com/ai-readiness/abc123.pdf"
    );
}

#[tokio::test]
async fn redirect_handler_falls_back_to_landing_page() {
    let service = Arc::new(build_service(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryArtifactStore::default()),
    ));
    let state = ResultsState {
        service,
        theme: theme(),
    };

    let response = redirect_handler::<MemoryRepository>(State(state), Path("nope00".into())).await;
    assert_status(&response, StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/aireadinesscheck");
}

#[tokio::test]
async fn redirect_survives_repository_outage() {
    let router = router_with_service(build_service(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryArtifactStore::default()),
    ));

    let response = router
        .oneshot(get_request("/aireadinesscheck/r/abc123"))
        .await
        .expect("response");

    assert_status(&response, StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/aireadinesscheck");
}

#[tokio::test]
async fn admin_route_renders_themed_table() {
    let repository = Arc::new(MemoryRepository::default());
    repository.seed(record("abc123", 0));
    let router = router_with_service(build_service(
        repository,
        Arc::new(MemoryArtifactStore::default()),
    ));

    let response = router
        .oneshot(get_request("/aireadinesscheck/admin"))
        .await
        .expect("response");

    assert_status(&response, StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE]
        .to_str()
        .expect("header")
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let html = read_text(response).await;
    assert!(html.contains("abc123"));
    assert!(html.contains("data-theme=\"dark\""));
}
