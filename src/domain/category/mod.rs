pub mod error;
pub mod hierarchy;
pub mod model;
pub mod service;

pub use error::CategoryServiceError;
pub use hierarchy::CategoryHierarchyResolver;
pub use model::{Category, CategoryResponse, CreateCategoryRequest};
pub use service::{CategoryService, ALL_CATEGORIES_CACHE_KEY, DEFAULT_CATEGORY_CACHE_TTL};
