use async_trait::async_trait;

use super::domain::{ResultRecord, Slug};

/// Storage abstraction so the service can be exercised without a database.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the slug is already taken.
    async fn insert(&self, record: &ResultRecord) -> Result<(), RepositoryError>;
    async fn fetch(&self, slug: &Slug) -> Result<Option<ResultRecord>, RepositoryError>;
    async fn exists(&self, slug: &Slug) -> Result<bool, RepositoryError>;
    /// Newest first.
    async fn list(&self, offset: u64, limit: u32) -> Result<Vec<ResultRecord>, RepositoryError>;
    async fn count(&self) -> Result<u64, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored record is unreadable: {0}")]
    Corrupt(String),
}
