//! Durable result persistence: slugs, metadata rows, stored reports, and the HTTP surface
//! that submits, lists, and redirects to them.

pub mod admin;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
mod sqlite;

#[cfg(test)]
mod tests;

pub use domain::{
    PageRequest, PageWindow, ResultPage, ResultRecord, ResultSubmission, ResultView, Slug,
    SubmissionError, SubmissionReceipt,
};
pub use repository::{RepositoryError, ResultRepository};
pub use router::results_router;
pub use service::{ResultService, ResultServiceError, MAX_SLUG_ATTEMPTS};
pub use sqlite::SqliteResultRepository;
