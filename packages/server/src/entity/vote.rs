use common::VoteType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One user's vote on one definition.
///
/// The unique index on (user_id, definition_id), created in
/// `seed::ensure_indexes`, is the hard one-vote-per-user invariant and
/// the authoritative detector of concurrent same-pair votes.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vote")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Opaque identity reference to the voter.
    pub user_id: i32,

    pub definition_id: i32,
    #[sea_orm(belongs_to, from = "definition_id", to = "id")]
    pub definition: HasOne<super::definition::Entity>,

    pub vote_type: VoteType,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
