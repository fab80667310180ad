use crate::infrastructure::db::DbPool;
use crate::{
    domain::category::Category,
    error::{AppError, AppResult},
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Persistence for the category forest.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    /// Direct children of one category
    async fn get_children_of(&self, parent_id: Uuid) -> AppResult<Vec<Category>>;

    /// Direct children of every listed category, in one round-trip
    async fn get_children_of_many(&self, parent_ids: &[Uuid]) -> AppResult<Vec<Category>>;

    async fn get_all(&self) -> AppResult<Vec<Category>>;

    async fn create(&self, category: &Category) -> AppResult<()>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

pub struct PgCategoryRepository {
    pool: Arc<DbPool>,
}

impl PgCategoryRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let pool = self.pool.as_ref();
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, parent_id, created_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    async fn get_children_of(&self, parent_id: Uuid) -> AppResult<Vec<Category>> {
        self.get_children_of_many(&[parent_id]).await
    }

    async fn get_children_of_many(&self, parent_ids: &[Uuid]) -> AppResult<Vec<Category>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let pool = self.pool.as_ref();
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, parent_id, created_at
            FROM categories
            WHERE parent_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(parent_ids)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    async fn get_all(&self) -> AppResult<Vec<Category>> {
        let pool = self.pool.as_ref();
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, parent_id, created_at
            FROM categories
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    async fn create(&self, category: &Category) -> AppResult<()> {
        let pool = self.pool.as_ref();

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, parent_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(category.parent_id)
        .bind(category.created_at)
        .execute(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_foreign_key_violation() {
                    return AppError::BadRequest("Parent category does not exist".to_string());
                }
            }
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            DELETE FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
