use common::ReviewStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user-submitted candidate term awaiting moderation.
///
/// On the first transition into `Accepted`, a term and its first
/// definition are created from this row inside the same transaction
/// (see `handlers::suggestion`).
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suggested_term")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub text: String,
    pub definition_text: String,
    pub example_usage: Option<String>,
    pub review_status: ReviewStatus,

    pub sport_id: i32,
    #[sea_orm(belongs_to, from = "sport_id", to = "id")]
    pub sport: HasOne<super::sport::Entity>,

    /// Opaque identity reference to the submitter.
    pub user_id: Option<i32>,

    #[sea_orm(has_one)]
    pub term: HasOne<super::term::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
