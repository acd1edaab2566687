//! AI readiness assessment: question catalog, scoring, answer summaries, report
//! rendering, artifact storage, and result persistence.

pub mod catalog;
pub mod domain;
pub mod report;
pub mod results;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod summary;

pub use catalog::{Enabler, ReadinessCatalog, ThemeQuestion};
pub use domain::{
    normalized, Alignment, Intensity, RawAnswers, ReadinessStatus, ScoreError, MAX_SCORE,
    MIN_SCORE, NEUTRAL_SCORE,
};
pub use report::{
    Branding, RenderError, RenderedReport, ReportFormat, ReportInput, ReportRenderer,
    RespondentInfo,
};
pub use scoring::{
    overall_average, readiness_from_sum, ReadinessMetric, ReadinessScorecard, ScoringEngine,
};
pub use session::{SessionError, SessionPhase, SurveySession};
pub use summary::{AnswerSummarizer, AnswerSummary, QuestionSummary, NEUTRAL_SELECTION_TEXT};
