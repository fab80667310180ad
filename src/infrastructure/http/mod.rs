pub mod extract;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::controllers::{bulletin::BulletinController, category::CategoryController, health};
use crate::infrastructure::auth::{auth_middleware, request_id_middleware};
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;

/// Build the application router with all routes configured
pub fn build_router(
    pool: Option<Arc<DbPool>>,
    config: Arc<Config>,
    bulletin_controller: Arc<BulletinController>,
    category_controller: Arc<CategoryController>,
) -> Router {
    // Bulletin reads (public)
    let bulletin_public_routes = Router::new()
        .route("/api/bulletin/search", post(BulletinController::search))
        .route("/api/bulletin/by-category", get(BulletinController::by_category))
        .route("/api/bulletin/:bulletinId", get(BulletinController::get_bulletin))
        .with_state(bulletin_controller.clone());

    // Bulletin mutations (require authentication)
    let bulletin_protected_routes = Router::new()
        .route("/api/bulletin", post(BulletinController::create))
        .route(
            "/api/bulletin/:bulletinId",
            axum::routing::put(BulletinController::update).delete(BulletinController::delete),
        )
        .with_state(bulletin_controller)
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware));

    // Category reads (public)
    let category_public_routes = Router::new()
        .route("/api/category", get(CategoryController::list))
        .route("/api/category/:categoryId", get(CategoryController::get_category))
        .route(
            "/api/category/:categoryId/children",
            get(CategoryController::children),
        )
        .route(
            "/api/category/:categoryId/descendants",
            get(CategoryController::descendants),
        )
        .with_state(category_controller.clone());

    // Category mutations (require authentication, admin checked in handlers)
    let category_protected_routes = Router::new()
        .route("/api/category", post(CategoryController::create))
        .route("/api/category/:categoryId", delete(CategoryController::delete))
        .with_state(category_controller)
        .layer(middleware::from_fn_with_state(config, auth_middleware));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool)
        .merge(bulletin_public_routes)
        .merge(bulletin_protected_routes)
        .merge(category_public_routes)
        .merge(category_protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
