use crate::domain::category::CategoryServiceError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum BulletinServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for BulletinServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => BulletinServiceError::Invalid(msg),
            AppError::NotFound(_) => BulletinServiceError::NotFound("Bulletin"),
            AppError::Forbidden(msg) => BulletinServiceError::Forbidden(msg),
            _ => BulletinServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<CategoryServiceError> for BulletinServiceError {
    fn from(err: CategoryServiceError) -> Self {
        match err {
            CategoryServiceError::NotFound => BulletinServiceError::NotFound("Category"),
            CategoryServiceError::Invalid(msg) => BulletinServiceError::Invalid(msg),
            CategoryServiceError::Dependency(msg) => BulletinServiceError::Dependency(msg),
            CategoryServiceError::Other(e) => BulletinServiceError::Other(e),
        }
    }
}

impl From<BulletinServiceError> for AppError {
    fn from(err: BulletinServiceError) -> Self {
        match err {
            BulletinServiceError::Invalid(msg) => AppError::BadRequest(msg),
            BulletinServiceError::NotFound(entity) => {
                AppError::NotFound(format!("{} not found", entity))
            }
            BulletinServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            BulletinServiceError::Dependency(msg) => AppError::Internal(msg),
            BulletinServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
