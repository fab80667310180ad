use super::model::Bulletin;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/bulletin/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBulletinsRequest {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub take: i64,
    #[serde(default)]
    pub skip: Option<i64>,
}

/// Query of `GET /api/bulletin/by-category`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletinsByCategoryQuery {
    pub bulletin_category_id: Uuid,
    pub take: i64,
    #[serde(default)]
    pub skip: Option<i64>,
}

/// Request to create a bulletin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBulletinRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category_id: Uuid,
    pub price: Decimal,
}

/// Request to update a bulletin; every field is replaced
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBulletinRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category_id: Uuid,
    pub price: Decimal,
}

/// Response for bulletin endpoints
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletinResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<Bulletin> for BulletinResponse {
    fn from(bulletin: Bulletin) -> Self {
        Self {
            id: bulletin.id,
            owner_id: bulletin.owner_id,
            title: bulletin.title,
            description: bulletin.description,
            category_id: bulletin.category_id,
            price: bulletin.price,
            created_at: bulletin.created_at,
        }
    }
}
