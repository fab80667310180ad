use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::category::{CategoryResponse, CategoryService, CreateCategoryRequest};
use crate::infrastructure::http::extract::{AppJson, AppPath};
use crate::{error::AppResult, infrastructure::auth::AuthUser};

pub struct CategoryController {
    category_service: Arc<CategoryService>,
}

impl CategoryController {
    pub fn new(category_service: Arc<CategoryService>) -> Self {
        Self { category_service }
    }

    /// GET /api/category - All categories
    pub async fn list(
        State(controller): State<Arc<CategoryController>>,
    ) -> AppResult<Json<Vec<CategoryResponse>>> {
        let categories = controller.category_service.get_all_categories().await?;
        Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
    }

    /// GET /api/category/{id}
    pub async fn get_category(
        State(controller): State<Arc<CategoryController>>,
        AppPath(category_id): AppPath<Uuid>,
    ) -> AppResult<Json<CategoryResponse>> {
        let category = controller.category_service.get_category(category_id).await?;
        Ok(Json(category.into()))
    }

    /// GET /api/category/{id}/children
    pub async fn children(
        State(controller): State<Arc<CategoryController>>,
        AppPath(category_id): AppPath<Uuid>,
    ) -> AppResult<Json<Vec<CategoryResponse>>> {
        let children = controller.category_service.get_children(category_id).await?;
        Ok(Json(children.into_iter().map(CategoryResponse::from).collect()))
    }

    /// GET /api/category/{id}/descendants - The category and everything below it
    pub async fn descendants(
        State(controller): State<Arc<CategoryController>>,
        AppPath(category_id): AppPath<Uuid>,
    ) -> AppResult<Json<Vec<CategoryResponse>>> {
        let categories = controller
            .category_service
            .get_descendants(category_id)
            .await?;
        Ok(Json(categories))
    }

    /// POST /api/category - Admin only
    pub async fn create(
        State(controller): State<Arc<CategoryController>>,
        Extension(auth_user): Extension<AuthUser>,
        AppJson(request): AppJson<CreateCategoryRequest>,
    ) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
        auth_user.require_admin()?;
        let category = controller.category_service.create_category(request).await?;
        Ok((StatusCode::CREATED, Json(category.into())))
    }

    /// DELETE /api/category/{id} - Admin only
    pub async fn delete(
        State(controller): State<Arc<CategoryController>>,
        Extension(auth_user): Extension<AuthUser>,
        AppPath(category_id): AppPath<Uuid>,
    ) -> AppResult<StatusCode> {
        auth_user.require_admin()?;
        controller.category_service.delete_category(category_id).await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
