use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use super::domain::{
    PageRequest, ResultPage, ResultRecord, ResultSubmission, Slug, SubmissionError,
    SubmissionReceipt,
};
use super::repository::{RepositoryError, ResultRepository};
use crate::workflows::readiness::catalog::ReadinessCatalog;
use crate::workflows::readiness::report::{ReportFormat, ReportInput, ReportRenderer};
use crate::workflows::readiness::scoring::ScoringEngine;
use crate::workflows::readiness::storage::{ArtifactStore, StorageError};
use crate::workflows::readiness::summary::AnswerSummarizer;

pub const MAX_SLUG_ATTEMPTS: usize = 5;

type SlugSource = dyn Fn() -> Slug + Send + Sync;

/// Persists completed assessments: scores or validates the submission, renders the
/// durable PDF, stores it, and records the metadata row under a fresh slug.
pub struct ResultService<R> {
    repository: Arc<R>,
    store: Arc<dyn ArtifactStore>,
    engine: ScoringEngine,
    summarizer: AnswerSummarizer,
    renderer: ReportRenderer,
    slugs: Box<SlugSource>,
}

impl<R> ResultService<R>
where
    R: ResultRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        store: Arc<dyn ArtifactStore>,
        catalog: Arc<ReadinessCatalog>,
        renderer: ReportRenderer,
    ) -> Self {
        Self {
            repository,
            store,
            engine: ScoringEngine::new(catalog.clone()),
            summarizer: AnswerSummarizer::new(catalog),
            renderer,
            slugs: Box::new(|| Slug::generate(&mut rand::thread_rng())),
        }
    }

    pub fn with_slug_source(mut self, source: impl Fn() -> Slug + Send + Sync + 'static) -> Self {
        self.slugs = Box::new(source);
        self
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn summarizer(&self) -> &AnswerSummarizer {
        &self.summarizer
    }

    pub fn renderer(&self) -> &ReportRenderer {
        &self.renderer
    }

    /// Turn a submission into report input; raw answers are scored and summarised here.
    pub fn prepare(&self, submission: ResultSubmission) -> Result<ReportInput, SubmissionError> {
        let completed_at = Some(submission.created_at.unwrap_or_else(Utc::now));

        match (submission.scores, submission.totals) {
            (Some(_), Some(_)) => Err(SubmissionError::Ambiguous),
            (None, None) => Err(SubmissionError::MissingResults),
            (Some(scores), None) => {
                let scorecard = self.engine.score(&scores)?;
                let answers = self.summarizer.summarize(&scores)?;
                Ok(ReportInput {
                    totals: scorecard.totals,
                    avg: scorecard.avg,
                    respondent: submission.user_info,
                    completed_at,
                    answers: Some(answers),
                })
            }
            (None, Some(totals)) => {
                let avg = submission.avg.ok_or(SubmissionError::MissingAverage)?;
                let avg =
                    ResultSubmission::validate_precomputed(self.engine.catalog(), &totals, avg)?;
                Ok(ReportInput {
                    totals,
                    avg,
                    respondent: submission.user_info,
                    completed_at,
                    answers: submission.answers,
                })
            }
        }
    }

    pub async fn submit(
        &self,
        submission: ResultSubmission,
    ) -> Result<SubmissionReceipt, ResultServiceError> {
        let input = self.prepare(submission)?;
        let created_at = input.completed_at.unwrap_or_else(Utc::now);

        let document = match self.renderer.render(&input, ReportFormat::Pdf) {
            Ok(report) => Some(report),
            Err(err) => {
                warn!(error = %err, "durable report rendering failed; recording result without artifact");
                None
            }
        };

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let slug = (self.slugs)();
            if self.repository.exists(&slug).await? {
                warn!(%slug, attempt, "slug already recorded; retrying");
                continue;
            }

            let artifact = match &document {
                Some(report) => {
                    let key = slug.artifact_key();
                    match self
                        .store
                        .store(&key, report.bytes.clone(), report.format.content_type())
                        .await
                    {
                        Ok(locator) => {
                            info!(%slug, %locator, "report artifact stored");
                            Some(locator)
                        }
                        Err(StorageError::AlreadyExists(_)) => {
                            warn!(%slug, attempt, "artifact key already taken; retrying");
                            continue;
                        }
                        Err(err) => {
                            warn!(%slug, error = %err, "artifact store failed; recording result without artifact");
                            None
                        }
                    }
                }
                None => None,
            };

            let artifact_stored = artifact.is_some();
            let record = ResultRecord {
                slug: slug.clone(),
                totals: input.totals.clone(),
                avg: input.avg,
                user_info: input.respondent.clone(),
                artifact,
                created_at,
            };

            match self.repository.insert(&record).await {
                Ok(()) => {
                    info!(%slug, artifact_stored, "assessment result recorded");
                    return Ok(SubmissionReceipt {
                        slug,
                        artifact_stored,
                    });
                }
                Err(RepositoryError::Conflict) => {
                    warn!(%slug, attempt, "slug claimed concurrently; retrying");
                }
                Err(err) => {
                    error!(%slug, error = %err, "failed to record assessment result");
                    return Err(err.into());
                }
            }
        }

        error!(attempts = MAX_SLUG_ATTEMPTS, "no free slug found");
        Err(ResultServiceError::SlugExhausted {
            attempts: MAX_SLUG_ATTEMPTS,
        })
    }

    /// URL of the stored report, or `None` when the slug is unknown, has no artifact, or
    /// the store yields something that is not an absolute URL.
    pub async fn report_url(&self, slug: &str) -> Result<Option<String>, ResultServiceError> {
        let Some(slug) = Slug::parse(slug) else {
            return Ok(None);
        };
        let Some(record) = self.repository.fetch(&slug).await? else {
            return Ok(None);
        };
        let Some(locator) = record.artifact else {
            return Ok(None);
        };

        match self.store.resolve(&locator).await {
            Ok(url) if reqwest::Url::parse(&url).is_ok() => Ok(Some(url)),
            Ok(url) => {
                warn!(%slug, %url, "artifact resolved to an unusable URL");
                Ok(None)
            }
            Err(err) => {
                warn!(%slug, error = %err, "artifact locator could not be resolved");
                Ok(None)
            }
        }
    }

    pub async fn list(&self, request: PageRequest) -> Result<ResultPage, ResultServiceError> {
        let window = request.normalize();
        let total_count = self.repository.count().await?;
        let records = self
            .repository
            .list(window.offset(), window.page_size)
            .await?;

        Ok(ResultPage {
            results: records.iter().map(ResultRecord::view).collect(),
            total_count,
            page: window.page,
            page_size: window.page_size,
        })
    }
}

impl<R> fmt::Debug for ResultService<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultService")
            .field("store", &self.store)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

/// Error raised by the result service.
#[derive(Debug, thiserror::Error)]
pub enum ResultServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("no unused slug after {attempts} attempts")]
    SlugExhausted { attempts: usize },
}
