use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A definition of a term, with denormalized vote counters.
///
/// `num_upvotes`, `num_downvotes` and `net_votes` are the source of
/// truth for ranking; they are adjusted inside each vote transaction and
/// never recomputed from the vote table on read.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "definition")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub text: String,
    pub example_usage: Option<String>,
    pub approved: bool,
    /// Soft-delete flag; deleted definitions keep their rows but vanish
    /// from listings, ranking and random selection.
    pub deleted: bool,

    pub num_upvotes: i32,
    pub num_downvotes: i32,
    /// Always equals `num_upvotes - num_downvotes`.
    pub net_votes: i32,

    pub term_id: i32,
    #[sea_orm(belongs_to, from = "term_id", to = "id")]
    pub term: HasOne<super::term::Entity>,

    /// Opaque identity reference to the author.
    pub user_id: i32,

    #[sea_orm(has_many)]
    pub votes: HasMany<super::vote::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
