pub mod builder;
pub mod dto;
pub mod error;
pub mod model;
pub mod service;
pub mod specification;

pub use builder::SpecificationBuilder;
pub use dto::{
    BulletinResponse, BulletinsByCategoryQuery, CreateBulletinRequest, SearchBulletinsRequest,
    UpdateBulletinRequest,
};
pub use error::BulletinServiceError;
pub use model::Bulletin;
pub use service::{BulletinService, BulletinServiceApi, MAX_PAGE_SIZE};
pub use specification::{BulletinFilter, Conjunct, Specification};
