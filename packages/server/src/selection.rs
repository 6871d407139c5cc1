//! Uniform random picks over the approved corpus.
//!
//! Count-then-offset keeps the pick uniform without loading the whole
//! table; the id ordering pins a stable enumeration between the two
//! queries.

use std::sync::{Arc, Mutex};

use rand::Rng;
use rand::rngs::StdRng;
use sea_orm::*;

use crate::entity::{definition, term};
use crate::error::AppError;

fn pick_index(rng: &Arc<Mutex<StdRng>>, count: u64) -> u64 {
    let mut rng = rng.lock().unwrap_or_else(|e| e.into_inner());
    rng.random_range(0..count)
}

/// A uniformly random approved term, or `NoContent` when none exist.
pub async fn random_approved_term(
    conn: &impl ConnectionTrait,
    rng: &Arc<Mutex<StdRng>>,
) -> Result<term::Model, AppError> {
    let select = term::Entity::find().filter(term::Column::Approved.eq(true));

    let count = select.clone().count(conn).await?;
    if count == 0 {
        return Err(AppError::NoContent("No approved terms available".into()));
    }

    let index = pick_index(rng, count);
    select
        .order_by_asc(term::Column::Id)
        .offset(Some(index))
        .limit(Some(1))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NoContent("No approved terms available".into()))
}

/// A uniformly random approved, non-deleted definition.
pub async fn random_approved_definition(
    conn: &impl ConnectionTrait,
    rng: &Arc<Mutex<StdRng>>,
) -> Result<definition::Model, AppError> {
    let select = definition::Entity::find()
        .filter(definition::Column::Approved.eq(true))
        .filter(definition::Column::Deleted.eq(false));

    let count = select.clone().count(conn).await?;
    if count == 0 {
        return Err(AppError::NoContent("No approved definitions available".into()));
    }

    let index = pick_index(rng, count);
    select
        .order_by_asc(definition::Column::Id)
        .offset(Some(index))
        .limit(Some(1))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NoContent("No approved definitions available".into()))
}
