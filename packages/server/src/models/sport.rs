use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::validate_short_text;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSportRequest {
    pub name: String,
    pub emoji: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SportResponse {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub emoji: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub sport_id: i32,
}

impl From<crate::entity::sport::Model> for SportResponse {
    fn from(m: crate::entity::sport::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            emoji: m.emoji,
            active: m.active,
            created_at: m.created_at,
        }
    }
}

impl From<crate::entity::category::Model> for CategoryResponse {
    fn from(m: crate::entity::category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            sport_id: m.sport_id,
        }
    }
}

pub fn validate_create_sport(req: &CreateSportRequest) -> Result<(), AppError> {
    validate_short_text(&req.name, "Sport name")?;
    if let Some(ref emoji) = req.emoji
        && emoji.chars().count() > 10
    {
        return Err(AppError::Validation("Emoji must be at most 10 characters".into()));
    }
    Ok(())
}

pub fn validate_create_category(req: &CreateCategoryRequest) -> Result<(), AppError> {
    validate_short_text(&req.name, "Category name")
}
