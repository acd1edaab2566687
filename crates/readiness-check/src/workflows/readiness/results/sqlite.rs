use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{
    Sqlite, SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Decode, Row, Type};

use super::domain::{ResultRecord, Slug};
use super::repository::{RepositoryError, ResultRepository};
use crate::workflows::readiness::report::RespondentInfo;
use crate::workflows::readiness::storage::ArtifactLocator;

const SELECT_COLUMNS: &str = "SELECT slug, totals, avg, first_name, last_name, email, company, \
     artifact_locator, created_at FROM ai_readiness_results";

/// Result metadata in SQLite; the slug column carries a unique constraint.
#[derive(Debug, Clone)]
pub struct SqliteResultRepository {
    pool: SqlitePool,
}

impl SqliteResultRepository {
    pub async fn open(database_path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = database_path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                RepositoryError::Unavailable(format!("failed to create database directory: {err}"))
            })?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
            .map_err(|err| RepositoryError::Unavailable(format!("invalid database path: {err}")))?
            .journal_mode(SqliteJournalMode::Wal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|err| RepositoryError::Unavailable(format!("failed to connect: {err}")))?;

        let repository = Self { pool };
        repository.migrate().await?;
        Ok(repository)
    }

    pub async fn in_memory() -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|err| RepositoryError::Unavailable(format!("invalid memory options: {err}")))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|err| RepositoryError::Unavailable(format!("failed to connect: {err}")))?;

        let repository = Self { pool };
        repository.migrate().await?;
        Ok(repository)
    }

    async fn migrate(&self) -> Result<(), RepositoryError> {
        let schema = include_str!("../../../../migrations/001_ai_readiness_results.sql");
        sqlx::query(schema)
            .execute(&self.pool)
            .await
            .map_err(|err| query_error("migrate 001", &err))?;
        Ok(())
    }
}

#[async_trait]
impl ResultRepository for SqliteResultRepository {
    async fn insert(&self, record: &ResultRecord) -> Result<(), RepositoryError> {
        let totals = serde_json::to_string(&record.totals)
            .map_err(|err| RepositoryError::Corrupt(err.to_string()))?;
        let info = record.user_info.as_ref();

        sqlx::query(
            "INSERT INTO ai_readiness_results \
             (slug, totals, avg, first_name, last_name, email, company, artifact_locator, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.slug.as_str())
        .bind(totals)
        .bind(i64::from(record.avg))
        .bind(info.map(|i| i.first_name.clone()))
        .bind(info.map(|i| i.last_name.clone()))
        .bind(info.map(|i| i.email.clone()))
        .bind(info.map(|i| i.company.clone()))
        .bind(record.artifact.as_ref().map(ArtifactLocator::as_str))
        .bind(record.created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                RepositoryError::Conflict
            } else {
                query_error("insert result", &err)
            }
        })?;
        Ok(())
    }

    async fn fetch(&self, slug: &Slug) -> Result<Option<ResultRecord>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE slug = ?"))
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| query_error("fetch result", &err))?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn exists(&self, slug: &Slug) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM ai_readiness_results WHERE slug = ?")
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| query_error("check slug", &err))?;
        Ok(row.is_some())
    }

    async fn list(&self, offset: u64, limit: u32) -> Result<Vec<ResultRecord>, RepositoryError> {
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| query_error("list results", &err))?;
        rows.iter().map(record_from_row).collect()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM ai_readiness_results")
            .fetch_one(&self.pool)
            .await
            .map_err(|err| query_error("count results", &err))?;
        let total: i64 = column(&row, "total")?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}

fn record_from_row(row: &SqliteRow) -> Result<ResultRecord, RepositoryError> {
    let slug: String = column(row, "slug")?;
    let slug = Slug::parse(&slug)
        .ok_or_else(|| RepositoryError::Corrupt(format!("invalid slug `{slug}`")))?;

    let totals: String = column(row, "totals")?;
    let totals = serde_json::from_str(&totals)
        .map_err(|err| RepositoryError::Corrupt(format!("totals for {slug}: {err}")))?;

    let avg: i64 = column(row, "avg")?;
    let avg = u8::try_from(avg)
        .map_err(|_| RepositoryError::Corrupt(format!("avg {avg} for {slug}")))?;

    let created_at: String = column(row, "created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| RepositoryError::Corrupt(format!("created_at for {slug}: {err}")))?;

    let first_name: Option<String> = column(row, "first_name")?;
    let last_name: Option<String> = column(row, "last_name")?;
    let email: Option<String> = column(row, "email")?;
    let company: Option<String> = column(row, "company")?;
    let user_info = if first_name.is_none()
        && last_name.is_none()
        && email.is_none()
        && company.is_none()
    {
        None
    } else {
        Some(RespondentInfo {
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            company: company.unwrap_or_default(),
        })
    };

    let artifact: Option<String> = column(row, "artifact_locator")?;

    Ok(ResultRecord {
        slug,
        totals,
        avg,
        user_info,
        artifact: artifact.map(ArtifactLocator::new),
        created_at,
    })
}

/// Decode one column, reporting values of the wrong type as corruption.
fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: Decode<'r, Sqlite> + Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|err| RepositoryError::Corrupt(format!("column `{name}`: {err}")))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

fn query_error(query: &str, err: &sqlx::Error) -> RepositoryError {
    RepositoryError::Unavailable(format!("{query}: {err}"))
}
