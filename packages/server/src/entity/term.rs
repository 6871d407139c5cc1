use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An approved vocabulary entry, unique per (sport, text).
///
/// The slug is unique within the sport only; two sports may both have a
/// "rebound". Both composite constraints live in `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "term")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub text: String,
    pub slug: String,
    pub approved: bool,

    pub sport_id: i32,
    #[sea_orm(belongs_to, from = "sport_id", to = "id")]
    pub sport: HasOne<super::sport::Entity>,

    /// Opaque identity reference; NULL for seeded or admin-created terms.
    pub user_id: Option<i32>,

    /// Back-reference to the suggestion this term was promoted from.
    /// Unique when present: at most one term per suggestion.
    pub suggested_term_id: Option<i32>,
    #[sea_orm(belongs_to, from = "suggested_term_id", to = "id")]
    pub suggested_term: HasOne<super::suggested_term::Entity>,

    #[sea_orm(has_many)]
    pub definitions: HasMany<super::definition::Entity>,
    #[sea_orm(has_many, via = "term_category")]
    pub categories: HasMany<super::category::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
