use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::theme::{ColorScheme, ThemePreference, ThemeSettings};
use crate::workflows::readiness::catalog::ReadinessCatalog;
use crate::workflows::readiness::domain::{RawAnswers, ReadinessStatus};
use crate::workflows::readiness::report::{ReportRenderer, RespondentInfo};
use crate::workflows::readiness::results::domain::{ResultRecord, ResultSubmission, Slug};
use crate::workflows::readiness::results::repository::{RepositoryError, ResultRepository};
use crate::workflows::readiness::results::{results_router, ResultService};
use crate::workflows::readiness::scoring::ReadinessMetric;
use crate::workflows::readiness::storage::{ArtifactLocator, ArtifactStore, StorageError};

pub(super) const FILES_BASE: &str = "https://files.example.com";

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<Vec<ResultRecord>>,
}

impl MemoryRepository {
    pub(super) fn records(&self) -> Vec<ResultRecord> {
        self.records.lock().expect("records lock").clone()
    }

    pub(super) fn seed(&self, record: ResultRecord) {
        self.records.lock().expect("records lock").push(record);
    }
}

#[async_trait]
impl ResultRepository for MemoryRepository {
    async fn insert(&self, record: &ResultRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().expect("records lock");
        if records.iter().any(|existing| existing.slug == record.slug) {
            return Err(RepositoryError::Conflict);
        }
        records.push(record.clone());
        Ok(())
    }

    async fn fetch(&self, slug: &Slug) -> Result<Option<ResultRecord>, RepositoryError> {
        let records = self.records.lock().expect("records lock");
        Ok(records.iter().find(|record| &record.slug == slug).cloned())
    }

    async fn exists(&self, slug: &Slug) -> Result<bool, RepositoryError> {
        Ok(self.fetch(slug).await?.is_some())
    }

    async fn list(&self, offset: u64, limit: u32) -> Result<Vec<ResultRecord>, RepositoryError> {
        let mut records = self.records();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.records.lock().expect("records lock").len() as u64)
    }
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl ResultRepository for UnavailableRepository {
    async fn insert(&self, _record: &ResultRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".into()))
    }

    async fn fetch(&self, _slug: &Slug) -> Result<Option<ResultRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".into()))
    }

    async fn exists(&self, _slug: &Slug) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".into()))
    }

    async fn list(&self, _offset: u64, _limit: u32) -> Result<Vec<ResultRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".into()))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".into()))
    }
}

/// Accepts every slug check but refuses every insert.
pub(super) struct InsertFailingRepository;

#[async_trait]
impl ResultRepository for InsertFailingRepository {
    async fn insert(&self, _record: &ResultRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("write rejected".into()))
    }

    async fn fetch(&self, _slug: &Slug) -> Result<Option<ResultRecord>, RepositoryError> {
        Ok(None)
    }

    async fn exists(&self, _slug: &Slug) -> Result<bool, RepositoryError> {
        Ok(false)
    }

    async fn list(&self, _offset: u64, _limit: u32) -> Result<Vec<ResultRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(0)
    }
}

/// Reports every slug as free, but loses the first insert to a concurrent writer.
#[derive(Default)]
pub(super) struct RacingRepository {
    inner: MemoryRepository,
    conflicted: Mutex<bool>,
}

impl RacingRepository {
    pub(super) fn records(&self) -> Vec<ResultRecord> {
        self.inner.records()
    }
}

#[async_trait]
impl ResultRepository for RacingRepository {
    async fn insert(&self, record: &ResultRecord) -> Result<(), RepositoryError> {
        {
            let mut conflicted = self.conflicted.lock().expect("conflict lock");
            if !*conflicted {
                *conflicted = true;
                return Err(RepositoryError::Conflict);
            }
        }
        self.inner.insert(record).await
    }

    async fn fetch(&self, slug: &Slug) -> Result<Option<ResultRecord>, RepositoryError> {
        self.inner.fetch(slug).await
    }

    async fn exists(&self, _slug: &Slug) -> Result<bool, RepositoryError> {
        Ok(false)
    }

    async fn list(&self, offset: u64, limit: u32) -> Result<Vec<ResultRecord>, RepositoryError> {
        self.inner.list(offset, limit).await
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        self.inner.count().await
    }
}

#[derive(Debug, Default)]
pub(super) struct MemoryArtifactStore {
    blobs: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl MemoryArtifactStore {
    pub(super) fn blob(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.blobs.lock().expect("blobs lock").get(key).cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.blobs.lock().expect("blobs lock").len()
    }

    pub(super) fn seed(&self, key: &str) {
        self.blobs
            .lock()
            .expect("blobs lock")
            .insert(key.to_string(), (b"taken".to_vec(), "application/pdf".into()));
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn store(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<ArtifactLocator, StorageError> {
        let mut blobs = self.blobs.lock().expect("blobs lock");
        if blobs.contains_key(key) {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }
        blobs.insert(key.to_string(), (bytes, content_type.to_string()));
        Ok(ArtifactLocator::new(key))
    }

    async fn resolve(&self, locator: &ArtifactLocator) -> Result<String, StorageError> {
        Ok(format!("{FILES_BASE}/{}", locator.as_str()))
    }
}

#[derive(Debug)]
pub(super) struct OfflineArtifactStore;

#[async_trait]
impl ArtifactStore for OfflineArtifactStore {
    async fn store(
        &self,
        key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<ArtifactLocator, StorageError> {
        Err(StorageError::Rejected {
            key: key.to_string(),
            status: 503,
        })
    }

    async fn resolve(&self, _locator: &ArtifactLocator) -> Result<String, StorageError> {
        Ok("not a url".to_string())
    }
}

pub(super) fn catalog() -> Arc<ReadinessCatalog> {
    Arc::new(ReadinessCatalog::standard())
}

pub(super) fn slug(value: &str) -> Slug {
    Slug::parse(value).expect("valid slug")
}

/// Slug source handing out the given values in order, then repeating the last one.
pub(super) fn scripted_slugs(values: &[&str]) -> impl Fn() -> Slug + Send + Sync + 'static {
    let queue: Mutex<VecDeque<Slug>> = Mutex::new(values.iter().map(|v| slug(v)).collect());
    let last = slug(values.last().expect("at least one slug"));
    move || {
        queue
            .lock()
            .expect("slug queue lock")
            .pop_front()
            .unwrap_or_else(|| last.clone())
    }
}

pub(super) fn build_service<R>(
    repository: Arc<R>,
    store: Arc<dyn ArtifactStore>,
) -> ResultService<R>
where
    R: ResultRepository + 'static,
{
    ResultService::new(repository, store, catalog(), ReportRenderer::default())
}

pub(super) fn theme() -> Arc<ThemeSettings> {
    Arc::new(ThemeSettings::new(ThemePreference::Dark, ColorScheme::Light))
}

pub(super) fn router_with_service<R>(service: ResultService<R>) -> Router
where
    R: ResultRepository + 'static,
{
    results_router(Arc::new(service), theme())
}

pub(super) fn respondent() -> RespondentInfo {
    RespondentInfo {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        company: "Analytical Engines".into(),
    }
}

pub(super) fn scored_submission() -> ResultSubmission {
    let mut scores = RawAnswers::new();
    scores.set("Strategic Vision & Value", 0, 0);
    scores.set("Strategic Vision & Value", 1, 0);
    scores.set("Strategic Vision & Value", 2, 0);
    ResultSubmission {
        scores: Some(scores),
        user_info: Some(respondent()),
        created_at: Some(Utc.with_ymd_and_hms(2025, 6, 1, 14, 5, 0).unwrap()),
        ..ResultSubmission::default()
    }
}

pub(super) fn precomputed_submission() -> ResultSubmission {
    ResultSubmission {
        totals: Some(vec![
            ReadinessMetric {
                name: "Strategic Vision & Value".into(),
                sum: 6,
                readiness: 100,
                status: ReadinessStatus::Leading,
            },
            ReadinessMetric {
                name: "Data Stewardship & Quality".into(),
                sum: 0,
                readiness: 50,
                status: ReadinessStatus::Established,
            },
        ]),
        avg: Some(75),
        ..ResultSubmission::default()
    }
}

pub(super) fn record(value: &str, minutes: i64) -> ResultRecord {
    ResultRecord {
        slug: slug(value),
        totals: Vec::new(),
        avg: 50,
        user_info: None,
        artifact: Some(ArtifactLocator::new(slug(value).artifact_key())),
        created_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
            + chrono::Duration::minutes(minutes),
    }
}

pub(super) fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub(super) fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub(super) async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) async fn read_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}
