use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sport")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
    /// Computed once at creation, never regenerated. Part of public URLs.
    #[sea_orm(unique)]
    pub slug: String,
    pub emoji: Option<String>,
    /// Inactive sports are hidden from the public sport index.
    pub active: bool,

    #[sea_orm(has_many)]
    pub terms: HasMany<super::term::Entity>,
    #[sea_orm(has_many)]
    pub categories: HasMany<super::category::Entity>,
    #[sea_orm(has_many)]
    pub suggested_terms: HasMany<super::suggested_term::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
