use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::bulletin::{
    BulletinResponse, BulletinService, BulletinServiceApi, BulletinsByCategoryQuery,
    CreateBulletinRequest, SearchBulletinsRequest, UpdateBulletinRequest,
};
use crate::infrastructure::http::extract::{AppJson, AppPath, AppQuery};
use crate::{error::AppResult, infrastructure::auth::AuthUser};

pub struct BulletinController {
    bulletin_service: Arc<BulletinService>,
}

impl BulletinController {
    pub fn new(bulletin_service: Arc<BulletinService>) -> Self {
        Self { bulletin_service }
    }

    /// POST /api/bulletin/search - Paginated search
    pub async fn search(
        State(controller): State<Arc<BulletinController>>,
        AppJson(request): AppJson<SearchBulletinsRequest>,
    ) -> AppResult<Json<Vec<BulletinResponse>>> {
        let bulletins = controller.bulletin_service.search_bulletins(request).await?;
        Ok(Json(bulletins))
    }

    /// GET /api/bulletin/by-category - Bulletins in a category and its descendants
    pub async fn by_category(
        State(controller): State<Arc<BulletinController>>,
        AppQuery(query): AppQuery<BulletinsByCategoryQuery>,
    ) -> AppResult<Json<Vec<BulletinResponse>>> {
        let bulletins = controller
            .bulletin_service
            .get_by_category(query.bulletin_category_id, query.take, query.skip)
            .await?;
        Ok(Json(bulletins))
    }

    /// GET /api/bulletin/{id}
    pub async fn get_bulletin(
        State(controller): State<Arc<BulletinController>>,
        AppPath(bulletin_id): AppPath<Uuid>,
    ) -> AppResult<Json<BulletinResponse>> {
        let bulletin = controller.bulletin_service.get_bulletin(bulletin_id).await?;
        Ok(Json(bulletin))
    }

    /// POST /api/bulletin - Create a bulletin owned by the caller
    pub async fn create(
        State(controller): State<Arc<BulletinController>>,
        Extension(auth_user): Extension<AuthUser>,
        AppJson(request): AppJson<CreateBulletinRequest>,
    ) -> AppResult<(StatusCode, Json<BulletinResponse>)> {
        let bulletin = controller
            .bulletin_service
            .create(auth_user.user_id, request)
            .await?;
        Ok((StatusCode::CREATED, Json(bulletin)))
    }

    /// PUT /api/bulletin/{id}
    pub async fn update(
        State(controller): State<Arc<BulletinController>>,
        Extension(auth_user): Extension<AuthUser>,
        AppPath(bulletin_id): AppPath<Uuid>,
        AppJson(request): AppJson<UpdateBulletinRequest>,
    ) -> AppResult<StatusCode> {
        controller
            .bulletin_service
            .update(bulletin_id, auth_user.user_id, request)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// DELETE /api/bulletin/{id}
    pub async fn delete(
        State(controller): State<Arc<BulletinController>>,
        Extension(auth_user): Extension<AuthUser>,
        AppPath(bulletin_id): AppPath<Uuid>,
    ) -> AppResult<StatusCode> {
        controller
            .bulletin_service
            .delete(bulletin_id, auth_user.user_id, auth_user.role)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
