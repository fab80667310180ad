use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use marketplace_backend::controllers::{bulletin::BulletinController, category::CategoryController};
use marketplace_backend::domain::bulletin::BulletinService;
use marketplace_backend::domain::category::CategoryService;
use marketplace_backend::domain::shared::{Clock, SystemClock};
use marketplace_backend::infrastructure::cache::{CacheStore, MokaCacheStore};
use marketplace_backend::infrastructure::config::{Config, LogFormat, StorageBackend};
use marketplace_backend::infrastructure::db::{check_connection, create_pool, run_migrations, DbPool};
use marketplace_backend::infrastructure::http::{build_router, start_http_server};
use marketplace_backend::infrastructure::repositories::{
    BulletinRepository, CategoryRepository, InMemoryBulletinRepository,
    InMemoryCategoryRepository, PgBulletinRepository, PgCategoryRepository,
};

type Repositories = (
    Option<Arc<DbPool>>,
    Arc<dyn CategoryRepository>,
    Arc<dyn BulletinRepository>,
);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        storage = ?config.storage,
        environment = ?config.environment,
        "Starting marketplace backend on {}:{}",
        config.host,
        config.port
    );

    let (pool, category_repo, bulletin_repo) = create_repositories(&config).await?;

    let config = Arc::new(config);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache: Arc<dyn CacheStore> = Arc::new(MokaCacheStore::new(config.category_cache_capacity));

    // === DEPENDENCY INJECTION SETUP ===
    tracing::info!("Instantiating services...");
    let category_service = Arc::new(CategoryService::new(
        category_repo,
        cache,
        clock.clone(),
        config.category_cache_ttl(),
    ));
    let bulletin_service = Arc::new(BulletinService::new(
        bulletin_repo,
        category_service.clone(),
        clock,
    ));

    tracing::info!("Instantiating controllers...");
    let bulletin_controller = Arc::new(BulletinController::new(bulletin_service));
    let category_controller = Arc::new(CategoryController::new(category_service));

    let app = build_router(pool, config.clone(), bulletin_controller, category_controller);

    start_http_server(config, app).await?;

    Ok(())
}

async fn create_repositories(config: &Config) -> Result<Repositories, Box<dyn std::error::Error>> {
    match (&config.storage, &config.database_url) {
        (StorageBackend::Postgres, Some(database_url)) => {
            // Create database connection pool
            let pool = create_pool(database_url).await?;
            tracing::info!("Database connection pool created");

            // Verify database connection
            check_connection(&pool).await?;
            tracing::info!("Database connection verified");

            run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");

            let pool = Arc::new(pool);
            let category_repo: Arc<dyn CategoryRepository> =
                Arc::new(PgCategoryRepository::new(pool.clone()));
            let bulletin_repo: Arc<dyn BulletinRepository> =
                Arc::new(PgBulletinRepository::new(pool.clone()));
            Ok((Some(pool), category_repo, bulletin_repo))
        }
        (StorageBackend::Postgres, None) => {
            Err("DATABASE_URL is required when STORAGE=postgres".into())
        }
        (StorageBackend::Memory, _) => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            let bulletins = InMemoryBulletinRepository::new();
            let category_repo: Arc<dyn CategoryRepository> =
                Arc::new(InMemoryCategoryRepository::with_bulletins(&bulletins));
            let bulletin_repo: Arc<dyn BulletinRepository> = Arc::new(bulletins);
            Ok((None, category_repo, bulletin_repo))
        }
    }
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "marketplace_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "marketplace_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
