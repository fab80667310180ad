use super::error::CategoryServiceError;
use super::model::Category;
use crate::infrastructure::repositories::CategoryRepository;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Expands a category into itself plus every transitive descendant.
///
/// The walk is breadth-first over the parent -> children relation: the root
/// comes first, then every level-1 child, then level 2, and so on. Each level
/// costs one batched children query against the store. Order inside a level
/// is whatever the store returns.
///
/// Categories form a forest, so the walk terminates once a level has no
/// children. A visited set still guards against a corrupted store that
/// contains a cycle.
pub struct CategoryHierarchyResolver {
    category_repo: Arc<dyn CategoryRepository>,
}

impl CategoryHierarchyResolver {
    pub fn new(category_repo: Arc<dyn CategoryRepository>) -> Self {
        Self { category_repo }
    }

    pub async fn resolve(&self, root_id: Uuid) -> Result<Vec<Category>, CategoryServiceError> {
        let root = self
            .category_repo
            .get_by_id(root_id)
            .await?
            .ok_or(CategoryServiceError::NotFound)?;

        let mut visited = HashSet::from([root.id]);
        let mut result = vec![root];
        let mut frontier = self.children_of(&[root_id], &mut visited).await?;
        let mut depth = 0usize;

        while !frontier.is_empty() {
            depth += 1;
            let parent_ids: Vec<Uuid> = frontier.iter().map(|c| c.id).collect();
            let next_frontier = self.children_of(&parent_ids, &mut visited).await?;

            tracing::debug!(
                root_id = %root_id,
                depth,
                level_size = frontier.len(),
                "Resolved category hierarchy level"
            );

            result.append(&mut frontier);
            frontier = next_frontier;
        }

        Ok(result)
    }

    /// Ids of the root and all of its descendants.
    pub async fn resolve_ids(&self, root_id: Uuid) -> Result<HashSet<Uuid>, CategoryServiceError> {
        let categories = self.resolve(root_id).await?;
        Ok(categories.into_iter().map(|c| c.id).collect())
    }

    async fn children_of(
        &self,
        parent_ids: &[Uuid],
        visited: &mut HashSet<Uuid>,
    ) -> Result<Vec<Category>, CategoryServiceError> {
        let children = self
            .category_repo
            .get_children_of_many(parent_ids)
            .await?;

        let mut fresh = Vec::with_capacity(children.len());
        for child in children {
            if visited.insert(child.id) {
                fresh.push(child);
            } else {
                tracing::warn!(
                    category_id = %child.id,
                    "Category reached twice while resolving hierarchy, skipping"
                );
            }
        }
        Ok(fresh)
    }
}
