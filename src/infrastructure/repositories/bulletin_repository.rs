use crate::infrastructure::db::DbPool;
use crate::{
    domain::bulletin::{Bulletin, BulletinFilter, Specification},
    error::{AppError, AppResult},
};
use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

/// Persistence for bulletins.
#[async_trait]
pub trait BulletinRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Bulletin>>;

    /// Bulletins satisfying `spec`, ordered by id, `skip` rows skipped and at
    /// most `take` returned.
    async fn find_by_specification(
        &self,
        spec: &Specification,
        take: i64,
        skip: i64,
    ) -> AppResult<Vec<Bulletin>>;

    async fn create(&self, bulletin: &Bulletin) -> AppResult<()>;

    async fn update(&self, bulletin: &Bulletin) -> AppResult<()>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

const SELECT_BULLETINS: &str =
    "SELECT id, owner_id, title, description, category_id, price, created_at FROM bulletins WHERE TRUE";

/// Escapes LIKE wildcards so the search text matches literally.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for ch in search.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn push_filter(builder: &mut QueryBuilder<'static, Postgres>, filter: &BulletinFilter) {
    builder.push(" AND ");
    match filter {
        BulletinFilter::OwnerNotEmpty => {
            builder.push("owner_id <> ").push_bind(Uuid::nil());
        }
        BulletinFilter::SearchString(search) => {
            let pattern = like_pattern(search);
            builder
                .push("(title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        BulletinFilter::MinPrice(price) => {
            builder.push("price >= ").push_bind(*price);
        }
        BulletinFilter::MaxPrice(price) => {
            builder.push("price <= ").push_bind(*price);
        }
        BulletinFilter::ByUser(user_id) => {
            builder.push("owner_id = ").push_bind(*user_id);
        }
        BulletinFilter::ByCategorySet(ids) => {
            let ids: Vec<Uuid> = ids.iter().copied().collect();
            builder.push("category_id = ANY(").push_bind(ids).push(")");
        }
    }
}

/// Builds the SELECT for every translatable filter of `spec`. Pagination is
/// only pushed down when given.
fn build_select(spec: &Specification, page: Option<(i64, i64)>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_BULLETINS);
    for filter in spec.filters() {
        push_filter(&mut builder, filter);
    }
    builder.push(" ORDER BY id");
    if let Some((take, skip)) = page {
        builder
            .push(" LIMIT ")
            .push_bind(take)
            .push(" OFFSET ")
            .push_bind(skip);
    }
    builder
}

pub struct PgBulletinRepository {
    pool: Arc<DbPool>,
}

impl PgBulletinRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BulletinRepository for PgBulletinRepository {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Bulletin>> {
        let pool = self.pool.as_ref();
        let bulletin = sqlx::query_as::<_, Bulletin>(
            r#"
            SELECT id, owner_id, title, description, category_id, price, created_at
            FROM bulletins
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(bulletin)
    }

    async fn find_by_specification(
        &self,
        spec: &Specification,
        take: i64,
        skip: i64,
    ) -> AppResult<Vec<Bulletin>> {
        let pool = self.pool.as_ref();

        if spec.is_translatable() {
            let bulletins = build_select(spec, Some((take, skip)))
                .build_query_as::<Bulletin>()
                .fetch_all(pool)
                .await?;
            return Ok(bulletins);
        }

        // Closure predicates cannot run in the database: push the filters
        // down, evaluate the rest here, then paginate.
        tracing::debug!(?spec, "Specification not fully translatable, filtering in memory");
        let candidates = build_select(spec, None)
            .build_query_as::<Bulletin>()
            .fetch_all(pool)
            .await?;

        Ok(candidates
            .into_iter()
            .filter(|b| spec.is_satisfied_by(b))
            .skip(skip as usize)
            .take(take as usize)
            .collect())
    }

    async fn create(&self, bulletin: &Bulletin) -> AppResult<()> {
        let pool = self.pool.as_ref();

        sqlx::query(
            r#"
            INSERT INTO bulletins (id, owner_id, title, description, category_id, price, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(bulletin.id)
        .bind(bulletin.owner_id)
        .bind(&bulletin.title)
        .bind(&bulletin.description)
        .bind(bulletin.category_id)
        .bind(bulletin.price)
        .bind(bulletin.created_at)
        .execute(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_foreign_key_violation() {
                    return AppError::BadRequest("Category does not exist".to_string());
                }
            }
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn update(&self, bulletin: &Bulletin) -> AppResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE bulletins
            SET title = $1, description = $2, category_id = $3, price = $4
            WHERE id = $5
            "#,
        )
        .bind(&bulletin.title)
        .bind(&bulletin.description)
        .bind(bulletin.category_id)
        .bind(bulletin.price)
        .bind(bulletin.id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Bulletin not found".to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            DELETE FROM bulletins
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
