//! Process-local stores with the same contracts as the Postgres ones.
//!
//! Used by the test suites and by `STORAGE=memory` for local runs.

use super::{BulletinRepository, CategoryRepository};
use crate::domain::bulletin::{Bulletin, Specification};
use crate::domain::category::Category;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

type SharedBulletins = Arc<RwLock<BTreeMap<Uuid, Bulletin>>>;

/// Categories in insertion order.
///
/// Deleting a category removes its whole subtree and, when linked to a
/// bulletin store, every bulletin filed under a removed category.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    categories: RwLock<Vec<Category>>,
    bulletins: Option<SharedBulletins>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bulletins(bulletins: &InMemoryBulletinRepository) -> Self {
        Self {
            categories: RwLock::default(),
            bulletins: Some(bulletins.bulletins.clone()),
        }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.iter().find(|c| c.id == id).cloned())
    }

    async fn get_children_of(&self, parent_id: Uuid) -> AppResult<Vec<Category>> {
        self.get_children_of_many(&[parent_id]).await
    }

    async fn get_children_of_many(&self, parent_ids: &[Uuid]) -> AppResult<Vec<Category>> {
        let parents: HashSet<&Uuid> = parent_ids.iter().collect();
        let categories = self.categories.read().await;
        Ok(categories
            .iter()
            .filter(|c| c.parent_id.as_ref().is_some_and(|p| parents.contains(p)))
            .cloned()
            .collect())
    }

    async fn get_all(&self) -> AppResult<Vec<Category>> {
        Ok(self.categories.read().await.clone())
    }

    async fn create(&self, category: &Category) -> AppResult<()> {
        let mut categories = self.categories.write().await;
        if categories.iter().any(|c| c.id == category.id) {
            return Err(AppError::Conflict("Category already exists".to_string()));
        }
        categories.push(category.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut categories = self.categories.write().await;
        if !categories.iter().any(|c| c.id == id) {
            return Ok(false);
        }

        let mut removed = HashSet::from([id]);
        let mut frontier = vec![id];
        while let Some(parent) = frontier.pop() {
            for child in categories.iter().filter(|c| c.parent_id == Some(parent)) {
                if removed.insert(child.id) {
                    frontier.push(child.id);
                }
            }
        }
        categories.retain(|c| !removed.contains(&c.id));

        if let Some(bulletins) = &self.bulletins {
            bulletins
                .write()
                .await
                .retain(|_, b| !removed.contains(&b.category_id));
        }

        Ok(true)
    }
}

/// Bulletins keyed (and therefore ordered) by id.
#[derive(Default)]
pub struct InMemoryBulletinRepository {
    bulletins: SharedBulletins,
}

impl InMemoryBulletinRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BulletinRepository for InMemoryBulletinRepository {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Bulletin>> {
        Ok(self.bulletins.read().await.get(&id).cloned())
    }

    async fn find_by_specification(
        &self,
        spec: &Specification,
        take: i64,
        skip: i64,
    ) -> AppResult<Vec<Bulletin>> {
        let bulletins = self.bulletins.read().await;
        Ok(bulletins
            .values()
            .filter(|b| spec.is_satisfied_by(b))
            .skip(skip.max(0) as usize)
            .take(take.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, bulletin: &Bulletin) -> AppResult<()> {
        let mut bulletins = self.bulletins.write().await;
        if bulletins.contains_key(&bulletin.id) {
            return Err(AppError::Conflict("Bulletin already exists".to_string()));
        }
        bulletins.insert(bulletin.id, bulletin.clone());
        Ok(())
    }

    async fn update(&self, bulletin: &Bulletin) -> AppResult<()> {
        let mut bulletins = self.bulletins.write().await;
        match bulletins.get_mut(&bulletin.id) {
            Some(existing) => {
                *existing = bulletin.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("Bulletin not found".to_string())),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.bulletins.write().await.remove(&id).is_some())
    }
}
