use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "term_category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub term_id: i32,
    #[sea_orm(primary_key)]
    pub category_id: i32,
    #[sea_orm(belongs_to, from = "term_id", to = "id")]
    pub term: HasOne<super::term::Entity>,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: HasOne<super::category::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
