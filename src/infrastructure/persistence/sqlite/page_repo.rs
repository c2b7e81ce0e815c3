//! SQLite Page Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::ebook_repo::{parse_id, parse_time};
use super::DbPool;
use crate::application::ports::{PageRecord, PageRepositoryPort, RepositoryError};
use crate::domain::ebook::PageTemplate;

/// SQLite Page Repository
pub struct SqlitePageRepository {
    pool: DbPool,
}

impl SqlitePageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PageRow {
    id: String,
    ebook_id: String,
    title: String,
    content: String,
    template: String,
    page_order: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<PageRow> for PageRecord {
    type Error = RepositoryError;

    fn try_from(row: PageRow) -> Result<Self, Self::Error> {
        Ok(PageRecord {
            id: parse_id(&row.id)?,
            ebook_id: parse_id(&row.ebook_id)?,
            title: row.title,
            content: row.content,
            template: PageTemplate::from_str(&row.template).unwrap_or_default(),
            order: usize::try_from(row.page_order).map_err(|_| {
                RepositoryError::SerializationError(format!(
                    "invalid page order: {}",
                    row.page_order
                ))
            })?,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

#[async_trait]
impl PageRepositoryPort for SqlitePageRepository {
    async fn save(&self, page: &PageRecord) -> Result<(), RepositoryError> {
        let order = i64::try_from(page.order).map_err(|_| {
            RepositoryError::SerializationError(format!("page order out of range: {}", page.order))
        })?;

        sqlx::query(
            r#"
            INSERT INTO pages (id, ebook_id, title, content, template, page_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                content = excluded.content,
                template = excluded.template,
                page_order = excluded.page_order,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(page.id.to_string())
        .bind(page.ebook_id.to_string())
        .bind(&page.title)
        .bind(&page.content)
        .bind(page.template.as_str())
        .bind(order)
        .bind(page.created_at.to_rfc3339())
        .bind(page.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PageRecord>, RepositoryError> {
        let row: Option<PageRow> = sqlx::query_as(
            "SELECT id, ebook_id, title, content, template, page_order, created_at, updated_at FROM pages WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(PageRecord::try_from).transpose()
    }

    async fn find_by_ebook(&self, ebook_id: Uuid) -> Result<Vec<PageRecord>, RepositoryError> {
        let rows: Vec<PageRow> = sqlx::query_as(
            "SELECT id, ebook_id, title, content, template, page_order, created_at, updated_at FROM pages WHERE ebook_id = ? ORDER BY page_order, created_at",
        )
        .bind(ebook_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(PageRecord::try_from).collect()
    }

    async fn next_order(&self, ebook_id: Uuid) -> Result<usize, RepositoryError> {
        let (max_order,): (Option<i64>,) =
            sqlx::query_as("SELECT MAX(page_order) FROM pages WHERE ebook_id = ?")
                .bind(ebook_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(max_order.map(|m| m.max(-1) + 1).unwrap_or(0) as usize)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM pages WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{EbookRecord, EbookRepositoryPort};
    use crate::domain::ebook::{CoverTemplate, Theme};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteEbookRepository,
    };
    use chrono::Utc;

    /// 页面表有外键约束，先写入所属电子书
    async fn repo_with_ebook() -> (SqlitePageRepository, Uuid) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let now = Utc::now();
        let ebook = EbookRecord {
            id: Uuid::new_v4(),
            title: "Sourdough".to_string(),
            description: None,
            cover_template: CoverTemplate::Classic,
            theme: Theme::default(),
            created_at: now,
            updated_at: now,
        };
        SqliteEbookRepository::new(pool.clone())
            .save(&ebook)
            .await
            .unwrap();

        (SqlitePageRepository::new(pool), ebook.id)
    }

    fn page(ebook_id: Uuid, title: &str, order: usize) -> PageRecord {
        let now = Utc::now();
        PageRecord {
            id: Uuid::new_v4(),
            ebook_id,
            title: title.to_string(),
            content: format!("<h2>{}</h2>", title),
            template: PageTemplate::Standard,
            order,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_pages_listed_by_order() {
        let (repo, ebook_id) = repo_with_ebook().await;

        assert_eq!(repo.next_order(ebook_id).await.unwrap(), 0);

        repo.save(&page(ebook_id, "Baking", 2)).await.unwrap();
        repo.save(&page(ebook_id, "Intro", 0)).await.unwrap();
        repo.save(&page(ebook_id, "Starter", 1)).await.unwrap();

        let titles: Vec<_> = repo
            .find_by_ebook(ebook_id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Intro", "Starter", "Baking"]);
        assert_eq!(repo.next_order(ebook_id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_save_rejects_order_beyond_integer_column() {
        let (repo, ebook_id) = repo_with_ebook().await;

        let result = repo.save(&page(ebook_id, "Far", usize::MAX)).await;

        assert!(matches!(result, Err(RepositoryError::SerializationError(_))));
        assert!(repo.find_by_ebook(ebook_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (repo, ebook_id) = repo_with_ebook().await;
        let mut record = page(ebook_id, "Intro", 0);
        repo.save(&record).await.unwrap();

        record.template = PageTemplate::Quote;
        record.content = "<blockquote>Patience</blockquote>".to_string();
        repo.save(&record).await.unwrap();

        let found = repo.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(found.template, PageTemplate::Quote);
        assert_eq!(found.content, "<blockquote>Patience</blockquote>");

        repo.delete(record.id).await.unwrap();
        assert!(repo.find_by_id(record.id).await.unwrap().is_none());
    }
}
