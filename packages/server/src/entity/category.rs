use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A grouping of terms within one sport (e.g. "Offense" in Basketball).
/// (sport_id, name) is unique; see `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub sport_id: i32,
    #[sea_orm(belongs_to, from = "sport_id", to = "id")]
    pub sport: HasOne<super::sport::Entity>,

    #[sea_orm(has_many, via = "term_category")]
    pub terms: HasMany<super::term::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
