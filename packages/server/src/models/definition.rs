use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::validate_long_text;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateDefinitionRequest {
    pub text: String,
    pub example_usage: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DefinitionResponse {
    pub id: i32,
    pub text: String,
    pub example_usage: Option<String>,
    pub term_id: i32,
    pub user_id: i32,
    pub approved: bool,
    pub num_upvotes: i32,
    pub num_downvotes: i32,
    pub net_votes: i32,
    pub created_at: DateTime<Utc>,
}

/// Counter snapshot returned by every vote mutation.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VoteCountsResponse {
    pub definition_id: i32,
    pub num_upvotes: i32,
    pub num_downvotes: i32,
    pub net_votes: i32,
}

impl From<crate::entity::definition::Model> for DefinitionResponse {
    fn from(m: crate::entity::definition::Model) -> Self {
        Self {
            id: m.id,
            text: m.text,
            example_usage: m.example_usage,
            term_id: m.term_id,
            user_id: m.user_id,
            approved: m.approved,
            num_upvotes: m.num_upvotes,
            num_downvotes: m.num_downvotes,
            net_votes: m.net_votes,
            created_at: m.created_at,
        }
    }
}

impl From<&crate::entity::definition::Model> for VoteCountsResponse {
    fn from(m: &crate::entity::definition::Model) -> Self {
        Self {
            definition_id: m.id,
            num_upvotes: m.num_upvotes,
            num_downvotes: m.num_downvotes,
            net_votes: m.net_votes,
        }
    }
}

pub fn validate_create_definition(req: &CreateDefinitionRequest) -> Result<(), AppError> {
    validate_long_text(&req.text, "Definition text")?;
    if let Some(ref example) = req.example_usage {
        validate_long_text(example, "Example usage")?;
    }
    Ok(())
}
