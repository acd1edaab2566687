use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::workflows::readiness::catalog::ReadinessCatalog;
use crate::workflows::readiness::domain::{RawAnswers, ReadinessStatus, ScoreError};
use crate::workflows::readiness::report::RespondentInfo;
use crate::workflows::readiness::scoring::{overall_average, readiness_from_sum, ReadinessMetric};
use crate::workflows::readiness::storage::ArtifactLocator;
use crate::workflows::readiness::summary::AnswerSummary;

pub const SLUG_LEN: usize = 6;
const SLUG_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Short public identity of a stored result: six characters of `[a-z0-9]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn generate<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let value = (0..SLUG_LEN)
            .map(|_| char::from(SLUG_ALPHABET[rng.gen_range(0..SLUG_ALPHABET.len())]))
            .collect();
        Self(value)
    }

    pub fn parse(value: &str) -> Option<Self> {
        let valid = value.len() == SLUG_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
        valid.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn artifact_key(&self) -> String {
        format!("ai-readiness/{}.pdf", self.0)
    }

    pub fn report_path(&self) -> String {
        format!("/aireadinesscheck/r/{}", self.0)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload accepted by the results endpoint.
///
/// Either `scores` (raw answers, scored server-side) or precomputed `totals` + `avg`
/// must be present, never both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSubmission {
    #[serde(default)]
    pub scores: Option<RawAnswers>,
    #[serde(default)]
    pub totals: Option<Vec<ReadinessMetric>>,
    #[serde(default)]
    pub avg: Option<i64>,
    #[serde(default)]
    pub user_info: Option<RespondentInfo>,
    #[serde(default)]
    pub answers: Option<Vec<AnswerSummary>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ResultSubmission {
    /// Check precomputed metrics against the catalog: every total names a distinct
    /// enabler, its sum is reachable with that enabler's questions, readiness and status
    /// follow from the sum, and `avg` is the rounded mean of the readiness values.
    pub fn validate_precomputed(
        catalog: &ReadinessCatalog,
        totals: &[ReadinessMetric],
        avg: i64,
    ) -> Result<u8, SubmissionError> {
        let mut seen = HashSet::new();
        for metric in totals {
            let enabler = catalog
                .enabler(&metric.name)
                .ok_or_else(|| ScoreError::UnknownEnabler(metric.name.clone()))?;
            if !seen.insert(enabler.name) {
                return Err(SubmissionError::DuplicateEnabler(metric.name.clone()));
            }

            let questions = enabler.themes.len();
            let max_abs = i64::try_from(questions)
                .unwrap_or(i64::MAX / 4)
                .saturating_mul(2);
            if i64::from(metric.sum).abs() > max_abs {
                return Err(SubmissionError::SumOutOfRange {
                    name: metric.name.clone(),
                    sum: metric.sum,
                    max: max_abs,
                });
            }
            if metric.readiness > 100 {
                return Err(SubmissionError::ReadinessOutOfRange {
                    name: metric.name.clone(),
                    readiness: metric.readiness,
                });
            }
            let derived = readiness_from_sum(metric.sum, questions);
            if metric.readiness != derived {
                return Err(SubmissionError::ReadinessMismatch {
                    name: metric.name.clone(),
                    expected: derived,
                    actual: metric.readiness,
                });
            }
            let expected = ReadinessStatus::classify(metric.readiness);
            if metric.status != expected {
                return Err(SubmissionError::StatusMismatch {
                    name: metric.name.clone(),
                    expected,
                    actual: metric.status,
                });
            }
        }

        let avg = u8::try_from(avg)
            .ok()
            .filter(|avg| *avg <= 100)
            .ok_or(SubmissionError::AverageOutOfRange(avg))?;
        let expected = overall_average(totals);
        if avg != expected {
            return Err(SubmissionError::AverageMismatch {
                expected,
                actual: avg,
            });
        }
        Ok(avg)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission must include either `scores` or `totals` with `avg`")]
    MissingResults,
    #[error("submission must not include both `scores` and `totals`")]
    Ambiguous,
    #[error("`totals` supplied without `avg`")]
    MissingAverage,
    #[error("readiness {readiness} for `{name}` is outside 0..=100")]
    ReadinessOutOfRange { name: String, readiness: u8 },
    #[error("average {0} is outside 0..=100")]
    AverageOutOfRange(i64),
    #[error("average should be {expected} but was {actual}")]
    AverageMismatch { expected: u8, actual: u8 },
    #[error("`{0}` appears more than once in totals")]
    DuplicateEnabler(String),
    #[error("sum {sum} for `{name}` is outside -{max}..={max}")]
    SumOutOfRange { name: String, sum: i32, max: i64 },
    #[error("readiness for `{name}` should be {expected} but was {actual}")]
    ReadinessMismatch {
        name: String,
        expected: u8,
        actual: u8,
    },
    #[error("status for `{name}` should be {} but was {}", .expected.label(), .actual.label())]
    StatusMismatch {
        name: String,
        expected: ReadinessStatus,
        actual: ReadinessStatus,
    },
    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// Persisted snapshot of a completed assessment. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub slug: Slug,
    pub totals: Vec<ReadinessMetric>,
    pub avg: u8,
    pub user_info: Option<RespondentInfo>,
    pub artifact: Option<ArtifactLocator>,
    pub created_at: DateTime<Utc>,
}

impl ResultRecord {
    pub fn overall_status(&self) -> ReadinessStatus {
        ReadinessStatus::classify(self.avg)
    }

    pub fn view(&self) -> ResultView {
        ResultView {
            slug: self.slug.clone(),
            avg: self.avg,
            status: self.overall_status(),
            totals: self.totals.clone(),
            user_info: self.user_info.clone(),
            report_url: self.artifact.as_ref().map(|_| self.slug.report_path()),
            created_at: self.created_at,
        }
    }
}

/// Listing entry; exposes the redirect path rather than the storage locator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub slug: Slug,
    pub avg: u8,
    pub status: ReadinessStatus,
    pub totals: Vec<ReadinessMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<RespondentInfo>,
    pub report_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub slug: Slug,
    pub artifact_stored: bool,
}

/// Raw pagination query; normalised with [`PageRequest::normalize`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageRequest {
    pub fn normalize(self) -> PageWindow {
        let page = self
            .page
            .filter(|page| *page >= 1)
            .and_then(|page| u32::try_from(page).ok())
            .unwrap_or(1);
        let page_size = self
            .page_size
            .map(|size| size.clamp(1, i64::from(MAX_PAGE_SIZE)))
            .and_then(|size| u32::try_from(size).ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);
        PageWindow { page, page_size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
}

impl PageWindow {
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub results: Vec<ResultView>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
}
