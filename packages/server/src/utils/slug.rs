use common::slug::{MAX_SLUG_LEN, candidates};
use sea_orm::*;

use crate::entity::{sport, term};
use crate::error::AppError;

// Suffix probing is unbounded in principle; cap it so a pathological data
// set cannot turn slug generation into an infinite query loop.
const MAX_PROBES: usize = 1000;

/// First slug derived from `name` that no sport currently uses.
pub async fn unique_sport_slug(
    conn: &impl ConnectionTrait,
    name: &str,
) -> Result<String, AppError> {
    for candidate in candidates(name, MAX_SLUG_LEN).take(MAX_PROBES) {
        let taken = sport::Entity::find()
            .filter(sport::Column::Slug.eq(&candidate))
            .one(conn)
            .await?
            .is_some();
        if !taken {
            return Ok(candidate);
        }
    }
    Err(AppError::Internal("slug space exhausted".into()))
}

/// First slug derived from `text` that no term within the sport uses.
pub async fn unique_term_slug(
    conn: &impl ConnectionTrait,
    sport_id: i32,
    text: &str,
) -> Result<String, AppError> {
    for candidate in candidates(text, MAX_SLUG_LEN).take(MAX_PROBES) {
        let taken = term::Entity::find()
            .filter(term::Column::SportId.eq(sport_id))
            .filter(term::Column::Slug.eq(&candidate))
            .one(conn)
            .await?
            .is_some();
        if !taken {
            return Ok(candidate);
        }
    }
    Err(AppError::Internal("slug space exhausted".into()))
}
