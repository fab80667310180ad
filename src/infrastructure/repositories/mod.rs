pub mod bulletin_repository;
pub mod category_repository;
pub mod in_memory;

pub use bulletin_repository::{BulletinRepository, PgBulletinRepository};
pub use category_repository::{CategoryRepository, PgCategoryRepository};
pub use in_memory::{InMemoryBulletinRepository, InMemoryCategoryRepository};
