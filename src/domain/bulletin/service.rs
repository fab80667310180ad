use super::builder::SpecificationBuilder;
use super::dto::{
    BulletinResponse, CreateBulletinRequest, SearchBulletinsRequest, UpdateBulletinRequest,
};
use super::error::BulletinServiceError;
use super::model::Bulletin;
use crate::domain::auth::Role;
use crate::domain::category::CategoryService;
use crate::domain::shared::Clock;
use crate::infrastructure::repositories::BulletinRepository;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

pub const MAX_PAGE_SIZE: i64 = 100;
const MAX_TITLE_LENGTH: usize = 200;

/// Prices are stored as NUMERIC(18, 2).
const PRICE_SCALE: u32 = 2;
const PRICE_INTEGER_DIGITS: u32 = 16;

pub struct BulletinService {
    bulletin_repo: Arc<dyn BulletinRepository>,
    category_service: Arc<CategoryService>,
    clock: Arc<dyn Clock>,
}

impl BulletinService {
    pub fn new(
        bulletin_repo: Arc<dyn BulletinRepository>,
        category_service: Arc<CategoryService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bulletin_repo,
            category_service,
            clock,
        }
    }
}

#[async_trait]
pub trait BulletinServiceApi: Send + Sync {
    /// Page of bulletins matching the search request, ordered by id.
    async fn search_bulletins(
        &self,
        request: SearchBulletinsRequest,
    ) -> Result<Vec<BulletinResponse>, BulletinServiceError>;

    /// Page of bulletins in the category or any of its descendants.
    async fn get_by_category(
        &self,
        category_id: Uuid,
        take: i64,
        skip: Option<i64>,
    ) -> Result<Vec<BulletinResponse>, BulletinServiceError>;

    async fn get_bulletin(&self, bulletin_id: Uuid)
        -> Result<BulletinResponse, BulletinServiceError>;

    async fn create(
        &self,
        owner_id: Uuid,
        request: CreateBulletinRequest,
    ) -> Result<BulletinResponse, BulletinServiceError>;

    /// Only the owner may update.
    async fn update(
        &self,
        bulletin_id: Uuid,
        user_id: Uuid,
        request: UpdateBulletinRequest,
    ) -> Result<(), BulletinServiceError>;

    /// The owner or an admin may delete.
    async fn delete(
        &self,
        bulletin_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<(), BulletinServiceError>;

    async fn is_user_bulletins_owner(
        &self,
        bulletin_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, BulletinServiceError>;
}

#[async_trait]
impl BulletinServiceApi for BulletinService {
    async fn search_bulletins(
        &self,
        request: SearchBulletinsRequest,
    ) -> Result<Vec<BulletinResponse>, BulletinServiceError> {
        let (take, skip) = self.validate_page(request.take, request.skip)?;
        let spec = SpecificationBuilder::from_search(&request);

        tracing::debug!(?spec, take, skip, "Searching bulletins");

        let bulletins = self
            .bulletin_repo
            .find_by_specification(&spec, take, skip)
            .await?;
        Ok(bulletins.into_iter().map(BulletinResponse::from).collect())
    }

    async fn get_by_category(
        &self,
        category_id: Uuid,
        take: i64,
        skip: Option<i64>,
    ) -> Result<Vec<BulletinResponse>, BulletinServiceError> {
        let (take, skip) = self.validate_page(take, skip)?;
        let category_ids = self
            .category_service
            .resolver()
            .resolve_ids(category_id)
            .await?;

        tracing::debug!(
            category_id = %category_id,
            resolved_categories = category_ids.len(),
            "Fetching bulletins by category"
        );

        let spec = SpecificationBuilder::from_category_ids(category_ids);
        let bulletins = self
            .bulletin_repo
            .find_by_specification(&spec, take, skip)
            .await?;
        Ok(bulletins.into_iter().map(BulletinResponse::from).collect())
    }

    async fn get_bulletin(
        &self,
        bulletin_id: Uuid,
    ) -> Result<BulletinResponse, BulletinServiceError> {
        self.find_bulletin(bulletin_id)
            .await
            .map(BulletinResponse::from)
    }

    async fn create(
        &self,
        owner_id: Uuid,
        request: CreateBulletinRequest,
    ) -> Result<BulletinResponse, BulletinServiceError> {
        let title = self.validate_title(&request.title)?;
        self.validate_price(request.price)?;
        self.validate_category(request.category_id).await?;

        let bulletin = Bulletin {
            id: Uuid::new_v4(),
            owner_id,
            title,
            description: request.description.trim().to_string(),
            category_id: request.category_id,
            price: request.price,
            created_at: self.clock.now(),
        };

        self.bulletin_repo
            .create(&bulletin)
            .await?;

        tracing::info!(
            bulletin_id = %bulletin.id,
            owner_id = %owner_id,
            category_id = %bulletin.category_id,
            "Bulletin created"
        );

        Ok(BulletinResponse::from(bulletin))
    }

    async fn update(
        &self,
        bulletin_id: Uuid,
        user_id: Uuid,
        request: UpdateBulletinRequest,
    ) -> Result<(), BulletinServiceError> {
        let mut bulletin = self.find_bulletin(bulletin_id).await?;

        if bulletin.owner_id != user_id {
            return Err(BulletinServiceError::Forbidden(
                "Only the owner can update this bulletin".to_string(),
            ));
        }

        bulletin.title = self.validate_title(&request.title)?;
        self.validate_price(request.price)?;
        if request.category_id != bulletin.category_id {
            self.validate_category(request.category_id).await?;
        }
        bulletin.description = request.description.trim().to_string();
        bulletin.category_id = request.category_id;
        bulletin.price = request.price;

        self.bulletin_repo
            .update(&bulletin)
            .await?;

        tracing::info!(bulletin_id = %bulletin_id, "Bulletin updated");

        Ok(())
    }

    async fn delete(
        &self,
        bulletin_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<(), BulletinServiceError> {
        let bulletin = self.find_bulletin(bulletin_id).await?;

        if bulletin.owner_id != user_id && role != Role::Admin {
            return Err(BulletinServiceError::Forbidden(
                "Only the owner or an admin can delete this bulletin".to_string(),
            ));
        }

        let deleted = self
            .bulletin_repo
            .delete(bulletin_id)
            .await?;

        if !deleted {
            return Err(BulletinServiceError::NotFound("Bulletin"));
        }

        tracing::info!(
            bulletin_id = %bulletin_id,
            deleted_by = %user_id,
            role = %role,
            "Bulletin deleted"
        );

        Ok(())
    }

    async fn is_user_bulletins_owner(
        &self,
        bulletin_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, BulletinServiceError> {
        let bulletin = self.find_bulletin(bulletin_id).await?;
        Ok(bulletin.owner_id == user_id)
    }
}

impl BulletinService {
    async fn find_bulletin(&self, bulletin_id: Uuid) -> Result<Bulletin, BulletinServiceError> {
        self.bulletin_repo
            .get_by_id(bulletin_id)
            .await?
            .ok_or(BulletinServiceError::NotFound("Bulletin"))
    }

    fn validate_page(&self, take: i64, skip: Option<i64>) -> Result<(i64, i64), BulletinServiceError> {
        if take < 1 || take > MAX_PAGE_SIZE {
            return Err(BulletinServiceError::Invalid(format!(
                "take must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        let skip = skip.unwrap_or(0);
        if skip < 0 {
            return Err(BulletinServiceError::Invalid(
                "skip cannot be negative".to_string(),
            ));
        }
        Ok((take, skip))
    }

    fn validate_title(&self, title: &str) -> Result<String, BulletinServiceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BulletinServiceError::Invalid("Title is required".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(BulletinServiceError::Invalid(format!(
                "Title must be at most {} characters",
                MAX_TITLE_LENGTH
            )));
        }
        Ok(title.to_string())
    }

    fn validate_price(&self, price: Decimal) -> Result<(), BulletinServiceError> {
        if price <= Decimal::ZERO {
            return Err(BulletinServiceError::Invalid(
                "Price must be greater than zero".to_string(),
            ));
        }
        if price.normalize().scale() > PRICE_SCALE {
            return Err(BulletinServiceError::Invalid(format!(
                "Price must have at most {} decimal places",
                PRICE_SCALE
            )));
        }
        if price.trunc() >= Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS)) {
            return Err(BulletinServiceError::Invalid(format!(
                "Price must be less than 10^{}",
                PRICE_INTEGER_DIGITS
            )));
        }
        Ok(())
    }

    async fn validate_category(&self, category_id: Uuid) -> Result<(), BulletinServiceError> {
        if !self.category_service.category_exists(category_id).await {
            return Err(BulletinServiceError::Invalid(
                "Category does not exist".to_string(),
            ));
        }
        Ok(())
    }
}
