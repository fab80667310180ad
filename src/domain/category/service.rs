use super::error::CategoryServiceError;
use super::hierarchy::CategoryHierarchyResolver;
use super::model::{Category, CategoryResponse, CreateCategoryRequest};
use crate::domain::shared::Clock;
use crate::infrastructure::cache::CacheStore;
use crate::infrastructure::repositories::CategoryRepository;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const MAX_CATEGORY_NAME_LENGTH: usize = 100;

/// Cache key holding the serialized snapshot of every category.
///
/// Removed after every category create and before every category delete.
/// Never updated in place.
pub const ALL_CATEGORIES_CACHE_KEY: &str = "all_categories";

pub const DEFAULT_CATEGORY_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

pub struct CategoryService {
    category_repo: Arc<dyn CategoryRepository>,
    cache: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    resolver: CategoryHierarchyResolver,
    cache_ttl: Duration,
}

impl CategoryService {
    pub fn new(
        category_repo: Arc<dyn CategoryRepository>,
        cache: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        cache_ttl: Duration,
    ) -> Self {
        let resolver = CategoryHierarchyResolver::new(category_repo.clone());
        Self {
            category_repo,
            cache,
            clock,
            resolver,
            cache_ttl,
        }
    }

    pub fn resolver(&self) -> &CategoryHierarchyResolver {
        &self.resolver
    }

    /// Every category, served from the cache when a snapshot is present.
    ///
    /// Cache backend failures fall through to the store.
    pub async fn get_all_categories(&self) -> Result<Vec<Category>, CategoryServiceError> {
        if let Some(categories) = self.cached_categories().await {
            tracing::debug!(count = categories.len(), "Category cache hit");
            return Ok(categories);
        }

        let categories = self
            .category_repo
            .get_all()
            .await?;

        tracing::debug!(count = categories.len(), "Category cache miss, loaded from store");

        match serde_json::to_string(&categories) {
            Ok(snapshot) => {
                if let Err(e) = self
                    .cache
                    .set_string(ALL_CATEGORIES_CACHE_KEY, snapshot, self.cache_ttl)
                    .await
                {
                    tracing::warn!(error = %e, "Failed to store category snapshot in cache");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize category snapshot"),
        }

        Ok(categories)
    }

    pub async fn get_category(&self, id: Uuid) -> Result<Category, CategoryServiceError> {
        self.category_repo
            .get_by_id(id)
            .await?
            .ok_or(CategoryServiceError::NotFound)
    }

    /// Direct children of a category.
    pub async fn get_children(&self, id: Uuid) -> Result<Vec<Category>, CategoryServiceError> {
        self.get_category(id).await?;
        self.category_repo
            .get_children_of(id)
            .await
            .map_err(CategoryServiceError::from)
    }

    /// The category followed by all of its descendants, level by level.
    pub async fn get_descendants(
        &self,
        id: Uuid,
    ) -> Result<Vec<CategoryResponse>, CategoryServiceError> {
        let categories = self.resolver.resolve(id).await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<Category, CategoryServiceError> {
        let name = self.validate_name(&request.name)?;

        if let Some(parent_id) = request.parent_id {
            if !self.category_exists(parent_id).await {
                return Err(CategoryServiceError::Invalid(
                    "Parent category does not exist".to_string(),
                ));
            }
        }

        let category = Category {
            id: Uuid::new_v4(),
            name,
            parent_id: request.parent_id,
            created_at: self.clock.now(),
        };

        self.category_repo
            .create(&category)
            .await?;

        self.invalidate_cache().await;

        tracing::info!(
            category_id = %category.id,
            parent_id = ?category.parent_id,
            "Category created"
        );

        Ok(category)
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<(), CategoryServiceError> {
        self.get_category(id).await?;

        self.invalidate_cache().await;

        let deleted = self
            .category_repo
            .delete(id)
            .await?;

        if !deleted {
            return Err(CategoryServiceError::NotFound);
        }

        tracing::info!(category_id = %id, "Category deleted");

        Ok(())
    }

    /// Existence probe for validators. Any failure reads as `false`.
    pub async fn category_exists(&self, id: Uuid) -> bool {
        match self.get_category(id).await {
            Ok(_) => true,
            Err(CategoryServiceError::NotFound) => false,
            Err(e) => {
                tracing::warn!(category_id = %id, error = %e, "Category existence check failed");
                false
            }
        }
    }
}

impl CategoryService {
    async fn cached_categories(&self) -> Option<Vec<Category>> {
        let snapshot = match self.cache.get_string(ALL_CATEGORIES_CACHE_KEY).await {
            Ok(Some(snapshot)) if !snapshot.is_empty() => snapshot,
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Category cache unavailable, reading from store");
                return None;
            }
        };

        match serde_json::from_str(&snapshot) {
            Ok(categories) => Some(categories),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding undecodable category snapshot");
                None
            }
        }
    }

    async fn invalidate_cache(&self) {
        if let Err(e) = self.cache.remove(ALL_CATEGORIES_CACHE_KEY).await {
            tracing::warn!(error = %e, "Failed to invalidate category cache");
        } else {
            tracing::debug!("Category cache invalidated");
        }
    }

    fn validate_name(&self, name: &str) -> Result<String, CategoryServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryServiceError::Invalid(
                "Category name is required".to_string(),
            ));
        }
        if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
            return Err(CategoryServiceError::Invalid(format!(
                "Category name must be at most {} characters",
                MAX_CATEGORY_NAME_LENGTH
            )));
        }
        Ok(name.to_string())
    }
}
