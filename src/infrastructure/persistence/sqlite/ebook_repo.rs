//! SQLite Ebook Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{EbookRecord, EbookRepositoryPort, RepositoryError};
use crate::domain::ebook::{CoverTemplate, Theme};

/// SQLite Ebook Repository
pub struct SqliteEbookRepository {
    pool: DbPool,
}

impl SqliteEbookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct EbookRow {
    id: String,
    title: String,
    description: Option<String>,
    cover_template: String,
    theme: String,
    created_at: String,
    updated_at: String,
}

pub(super) fn parse_time(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

pub(super) fn parse_id(value: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(value).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

impl TryFrom<EbookRow> for EbookRecord {
    type Error = RepositoryError;

    fn try_from(row: EbookRow) -> Result<Self, Self::Error> {
        Ok(EbookRecord {
            id: parse_id(&row.id)?,
            title: row.title,
            description: row.description,
            cover_template: CoverTemplate::from_str(&row.cover_template).unwrap_or_default(),
            theme: serde_json::from_str(&row.theme)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

fn theme_json(theme: &Theme) -> Result<String, RepositoryError> {
    serde_json::to_string(theme).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

#[async_trait]
impl EbookRepositoryPort for SqliteEbookRepository {
    async fn save(&self, ebook: &EbookRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO ebooks (id, title, description, cover_template, theme, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                cover_template = excluded.cover_template,
                theme = excluded.theme,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(ebook.id.to_string())
        .bind(&ebook.title)
        .bind(&ebook.description)
        .bind(ebook.cover_template.as_str())
        .bind(theme_json(&ebook.theme)?)
        .bind(ebook.created_at.to_rfc3339())
        .bind(ebook.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<EbookRecord>, RepositoryError> {
        let row: Option<EbookRow> = sqlx::query_as(
            "SELECT id, title, description, cover_template, theme, created_at, updated_at FROM ebooks WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(EbookRecord::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<EbookRecord>, RepositoryError> {
        let rows: Vec<EbookRow> = sqlx::query_as(
            "SELECT id, title, description, cover_template, theme, created_at, updated_at FROM ebooks ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(EbookRecord::try_from).collect()
    }

    async fn update_theme(&self, id: Uuid, theme: &Theme) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE ebooks SET theme = ?, updated_at = ? WHERE id = ?")
            .bind(theme_json(theme)?)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Ebook {}", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        // 使用事务确保原子性
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM pages WHERE ebook_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        sqlx::query("DELETE FROM ebooks WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(())
    }
}
