use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use super::shared::Pagination;
use super::shared::validate_short_text;
use super::sport::CategoryResponse;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTermRequest {
    pub text: String,
    pub sport_id: i32,
    /// Categories to attach; must all belong to the same sport.
    #[serde(default)]
    pub category_ids: Vec<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TermResponse {
    pub id: i32,
    pub text: String,
    pub slug: String,
    pub sport_id: i32,
    pub user_id: Option<i32>,
    pub approved: bool,
    pub suggested_term_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct TermListItem {
    pub id: i32,
    pub text: String,
    pub slug: String,
    pub sport_id: i32,
    /// Count of approved, non-deleted definitions.
    pub num_definitions: i64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TermListResponse {
    pub data: Vec<TermListItem>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct TermListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Case-insensitive substring match on term text.
    pub search: Option<String>,
    /// Sport slug filter.
    pub sport: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct SportTermsQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Comma-separated category names; terms must carry all of them.
    pub categories: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TermDetailResponse {
    #[serde(flatten)]
    pub term: TermResponse,
    pub categories: Vec<CategoryResponse>,
    pub definitions: Vec<super::definition::DefinitionResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TermOfTheDayResponse {
    pub day: chrono::NaiveDate,
    pub term: TermResponse,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TermOfTheDayListResponse {
    pub data: Vec<TermOfTheDayResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct PopulateTermOfTheDayRequest {
    /// Number of days from today to fill, inclusive of today.
    pub days: Option<u32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PopulateTermOfTheDayResponse {
    /// Number of new term-of-the-day rows created.
    pub created: u32,
}

impl From<crate::entity::term::Model> for TermResponse {
    fn from(m: crate::entity::term::Model) -> Self {
        Self {
            id: m.id,
            text: m.text,
            slug: m.slug,
            sport_id: m.sport_id,
            user_id: m.user_id,
            approved: m.approved,
            suggested_term_id: m.suggested_term_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_term(req: &CreateTermRequest) -> Result<(), AppError> {
    validate_short_text(&req.text, "Term text")?;
    if req.category_ids.len() > 20 {
        return Err(AppError::Validation("Too many categories: max 20".into()));
    }
    Ok(())
}

pub fn validate_populate(req: &PopulateTermOfTheDayRequest) -> Result<(), AppError> {
    if let Some(days) = req.days
        && !(1..=365).contains(&days)
    {
        return Err(AppError::Validation("days must be 1-365".into()));
    }
    Ok(())
}
