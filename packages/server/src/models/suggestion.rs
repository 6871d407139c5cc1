use chrono::{DateTime, Utc};
use common::ReviewStatus;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use super::shared::Pagination;
use super::shared::{validate_long_text, validate_short_text};
use super::term::TermResponse;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSuggestionRequest {
    pub text: String,
    pub definition_text: String,
    pub example_usage: Option<String>,
    pub sport_id: i32,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ReviewRequest {
    pub status: ReviewStatus,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SuggestionResponse {
    pub id: i32,
    pub text: String,
    pub definition_text: String,
    pub example_usage: Option<String>,
    pub sport_id: i32,
    pub user_id: Option<i32>,
    pub review_status: ReviewStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SuggestionListResponse {
    pub data: Vec<SuggestionResponse>,
    pub pagination: Pagination,
}

/// Result of a review. `term` is present only when this call performed
/// the promotion; re-accepting an already-promoted suggestion returns
/// the updated status with `term: null`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ReviewResponse {
    pub suggestion: SuggestionResponse,
    pub term: Option<TermResponse>,
}

impl From<crate::entity::suggested_term::Model> for SuggestionResponse {
    fn from(m: crate::entity::suggested_term::Model) -> Self {
        Self {
            id: m.id,
            text: m.text,
            definition_text: m.definition_text,
            example_usage: m.example_usage,
            sport_id: m.sport_id,
            user_id: m.user_id,
            review_status: m.review_status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_suggestion(req: &CreateSuggestionRequest) -> Result<(), AppError> {
    validate_short_text(&req.text, "Term text")?;
    validate_long_text(&req.definition_text, "Definition text")?;
    if let Some(ref example) = req.example_usage {
        validate_long_text(example, "Example usage")?;
    }
    Ok(())
}
