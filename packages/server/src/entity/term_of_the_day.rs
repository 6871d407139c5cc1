use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A date-keyed featured term, written by the populate job.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "term_of_the_day")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub day: Date,

    pub term_id: i32,
    #[sea_orm(belongs_to, from = "term_id", to = "id")]
    pub term: HasOne<super::term::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
