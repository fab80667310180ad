use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("category not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for CategoryServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => CategoryServiceError::Invalid(msg),
            AppError::NotFound(_) => CategoryServiceError::NotFound,
            _ => CategoryServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<CategoryServiceError> for AppError {
    fn from(err: CategoryServiceError) -> Self {
        match err {
            CategoryServiceError::Invalid(msg) => AppError::BadRequest(msg),
            CategoryServiceError::NotFound => AppError::NotFound("Category not found".to_string()),
            CategoryServiceError::Dependency(msg) => AppError::Internal(msg),
            CategoryServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
