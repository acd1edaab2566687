use readiness_check::workflows::readiness::results::{
    PageRequest, ResultService, ResultSubmission, SqliteResultRepository,
};
use readiness_check::workflows::readiness::storage::{FilesystemArtifactStore, UrlPolicy};
use readiness_check::workflows::readiness::{RawAnswers, ReadinessCatalog, ReportRenderer};
use std::sync::Arc;

struct Fixture {
    service: ResultService<SqliteResultRepository>,
    dir: tempfile::TempDir,
}

async fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let repository = SqliteResultRepository::open(dir.path().join("db/results.db"))
        .await
        .expect("database");
    let store = FilesystemArtifactStore::new(
        dir.path().join("artifacts"),
        "https://check.example.com/artifacts",
        UrlPolicy::Public,
    );
    let service = ResultService::new(
        Arc::new(repository),
        Arc::new(store),
        Arc::new(ReadinessCatalog::standard()),
        ReportRenderer::default(),
    );
    Fixture { service, dir }
}

fn submission() -> ResultSubmission {
    let mut scores = RawAnswers::new();
    scores.set("Human Oversight & Skills", 2, 0);
    ResultSubmission {
        scores: Some(scores),
        ..ResultSubmission::default()
    }
}

#[tokio::test]
async fn submitted_result_is_stored_and_linked() {
    let fixture = fixture().await;
    let receipt = fixture.service.submit(submission()).await.expect("submit");
    assert!(receipt.artifact_stored);

    let slug = receipt.slug.as_str().to_string();
    let pdf = fixture
        .dir
        .path()
        .join("artifacts")
        .join(format!("ai-readiness/{slug}.pdf"));
    let bytes = std::fs::read(&pdf).expect("artifact on disk");
    assert!(bytes.starts_with(b"%PDF-"));

    let url = fixture
        .service
        .report_url(&slug)
        .await
        .expect("lookup")
        .expect("url");
    assert_eq!(
        url,
        format!("https://check.example.com/artifacts/ai-readiness/{slug}.pdf")
    );
}

#[tokio::test]
async fn listing_pages_through_results_newest_first() {
    let fixture = fixture().await;
    let mut slugs = Vec::new();
    for _ in 0..3 {
        let receipt = fixture.service.submit(submission()).await.expect("submit");
        slugs.push(receipt.slug);
    }

    let page = fixture
        .service
        .list(PageRequest {
            page: Some(1),
            page_size: Some(2),
        })
        .await
        .expect("list");
    assert_eq!(page.total_count, 3);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].slug, slugs[2]);
    assert!(page.results.iter().all(|view| view.report_url.is_some()));

    let last = fixture
        .service
        .list(PageRequest {
            page: Some(2),
            page_size: Some(2),
        })
        .await
        .expect("list");
    assert_eq!(last.results.len(), 1);
    assert_eq!(last.results[0].slug, slugs[0]);
}

#[tokio::test]
async fn unknown_slug_has_no_report() {
    let fixture = fixture().await;
    assert_eq!(fixture.service.report_url("zzzzzz").await.expect("lookup"), None);
    assert_eq!(fixture.service.report_url("not a slug").await.expect("lookup"), None);
}
