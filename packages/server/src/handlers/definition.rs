use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::VoteType;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{definition, term, vote};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::definition::*;
use crate::selection;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/{id}/definitions",
    tag = "Definitions & Votes",
    operation_id = "createDefinition",
    summary = "Add a definition to a term",
    description = "Adds an approved definition to an existing term. Any authenticated user may contribute.",
    params(("id" = i32, Path, description = "Term ID")),
    request_body = CreateDefinitionRequest,
    responses(
        (status = 201, description = "Definition created", body = DefinitionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Term not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn create_definition(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CreateDefinitionRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_definition(&payload)?;

    term::Entity::find_by_id(id)
        .filter(term::Column::Approved.eq(true))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Term {id} not found")))?;

    let now = chrono::Utc::now();
    let new_definition = definition::ActiveModel {
        text: Set(payload.text.trim().to_string()),
        example_usage: Set(payload.example_usage),
        approved: Set(true),
        deleted: Set(false),
        num_upvotes: Set(0),
        num_downvotes: Set(0),
        net_votes: Set(0),
        term_id: Set(id),
        user_id: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_definition.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(DefinitionResponse::from(model))))
}

/// Fetch a votable definition: present, approved, not soft-deleted.
async fn find_votable(
    conn: &impl ConnectionTrait,
    id: i32,
) -> Result<definition::Model, AppError> {
    definition::Entity::find_by_id(id)
        .filter(definition::Column::Approved.eq(true))
        .filter(definition::Column::Deleted.eq(false))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Definition {id} not found")))
}

/// Apply counter deltas in a single SQL-level update so concurrent votes
/// by different users never lose increments.
async fn adjust_counters(
    conn: &impl ConnectionTrait,
    definition_id: i32,
    up_delta: i32,
    down_delta: i32,
) -> Result<(), AppError> {
    definition::Entity::update_many()
        .col_expr(
            definition::Column::NumUpvotes,
            Expr::col(definition::Column::NumUpvotes).add(up_delta),
        )
        .col_expr(
            definition::Column::NumDownvotes,
            Expr::col(definition::Column::NumDownvotes).add(down_delta),
        )
        .col_expr(
            definition::Column::NetVotes,
            Expr::col(definition::Column::NetVotes).add(up_delta - down_delta),
        )
        .filter(definition::Column::Id.eq(definition_id))
        .exec(conn)
        .await?;
    Ok(())
}

fn deltas(vote_type: VoteType) -> (i32, i32) {
    match vote_type {
        VoteType::Up => (1, 0),
        VoteType::Down => (0, 1),
    }
}

/// Cast a vote, switching direction if the user already voted the other
/// way. A repeated same-direction vote is a no-op. One transaction; the
/// (user_id, definition_id) unique index backstops same-pair races.
async fn cast_vote(
    state: &AppState,
    definition_id: i32,
    user_id: i32,
    vote_type: VoteType,
) -> Result<VoteCountsResponse, AppError> {
    let txn = state.db.begin().await?;

    let def = find_votable(&txn, definition_id).await?;

    let existing = vote::Entity::find()
        .filter(vote::Column::UserId.eq(user_id))
        .filter(vote::Column::DefinitionId.eq(definition_id))
        .one(&txn)
        .await?;

    let mut up_delta = 0;
    let mut down_delta = 0;

    match existing {
        Some(v) if v.vote_type == vote_type => {
            // Already voted this way; counters are current as read.
            txn.commit().await?;
            return Ok(VoteCountsResponse::from(&def));
        }
        Some(v) => {
            let res = vote::Entity::delete_many()
                .filter(vote::Column::Id.eq(v.id))
                .exec(&txn)
                .await?;
            if res.rows_affected == 0 {
                // Someone else removed or replaced the vote mid-flight.
                return Err(AppError::Conflict(
                    "Vote changed concurrently; retry".into(),
                ));
            }
            let (u, d) = deltas(v.vote_type);
            up_delta -= u;
            down_delta -= d;
        }
        None => {}
    }

    let new_vote = vote::ActiveModel {
        user_id: Set(user_id),
        definition_id: Set(definition_id),
        vote_type: Set(vote_type),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    if let Err(e) = new_vote.insert(&txn).await {
        // Dropping the transaction rolls back the delete and leaves the
        // counters untouched.
        return match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::AlreadyVoted),
            _ => Err(e.into()),
        };
    }

    let (u, d) = deltas(vote_type);
    up_delta += u;
    down_delta += d;

    adjust_counters(&txn, definition_id, up_delta, down_delta).await?;

    // Re-read inside the transaction: an unfiltered lookup after commit
    // could race a moderator's soft delete and turn a committed vote
    // into a 404.
    let def = reread_counters(&txn, definition_id).await?;
    txn.commit().await?;

    Ok(def)
}

async fn reread_counters(
    conn: &impl ConnectionTrait,
    definition_id: i32,
) -> Result<VoteCountsResponse, AppError> {
    let def = definition::Entity::find_by_id(definition_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::Internal(format!("definition {definition_id} vanished")))?;
    Ok(VoteCountsResponse::from(&def))
}

/// Remove a vote of the given direction. Absence is a silent no-op.
async fn retract_vote(
    state: &AppState,
    definition_id: i32,
    user_id: i32,
    vote_type: VoteType,
) -> Result<VoteCountsResponse, AppError> {
    let txn = state.db.begin().await?;

    find_votable(&txn, definition_id).await?;

    let res = vote::Entity::delete_many()
        .filter(vote::Column::UserId.eq(user_id))
        .filter(vote::Column::DefinitionId.eq(definition_id))
        .filter(vote::Column::VoteType.eq(vote_type))
        .exec(&txn)
        .await?;

    if res.rows_affected > 0 {
        let (u, d) = deltas(vote_type);
        adjust_counters(&txn, definition_id, -u, -d).await?;
    }

    let def = reread_counters(&txn, definition_id).await?;
    txn.commit().await?;

    Ok(def)
}

#[utoipa::path(
    post,
    path = "/{id}/upvote",
    tag = "Definitions & Votes",
    operation_id = "upvoteDefinition",
    summary = "Upvote a definition",
    description = "Casts an upvote. An existing downvote by the same user is switched; a repeated upvote is a no-op. Returns the updated counters.",
    params(("id" = i32, Path, description = "Definition ID")),
    responses(
        (status = 200, description = "Updated vote counters", body = VoteCountsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Definition not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Concurrent vote detected (ALREADY_VOTED, CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn upvote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<VoteCountsResponse>, AppError> {
    Ok(Json(
        cast_vote(&state, id, auth_user.user_id, VoteType::Up).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/{id}/downvote",
    tag = "Definitions & Votes",
    operation_id = "downvoteDefinition",
    summary = "Downvote a definition",
    description = "Casts a downvote. An existing upvote by the same user is switched; a repeated downvote is a no-op. Returns the updated counters.",
    params(("id" = i32, Path, description = "Definition ID")),
    responses(
        (status = 200, description = "Updated vote counters", body = VoteCountsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Definition not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Concurrent vote detected (ALREADY_VOTED, CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn downvote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<VoteCountsResponse>, AppError> {
    Ok(Json(
        cast_vote(&state, id, auth_user.user_id, VoteType::Down).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/{id}/upvote",
    tag = "Definitions & Votes",
    operation_id = "removeUpvote",
    summary = "Remove an upvote",
    description = "Deletes the caller's upvote if present; removing an absent vote is a no-op. Returns the updated counters.",
    params(("id" = i32, Path, description = "Definition ID")),
    responses(
        (status = 200, description = "Updated vote counters", body = VoteCountsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Definition not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn remove_upvote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<VoteCountsResponse>, AppError> {
    Ok(Json(
        retract_vote(&state, id, auth_user.user_id, VoteType::Up).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/{id}/downvote",
    tag = "Definitions & Votes",
    operation_id = "removeDownvote",
    summary = "Remove a downvote",
    description = "Deletes the caller's downvote if present; removing an absent vote is a no-op. Returns the updated counters.",
    params(("id" = i32, Path, description = "Definition ID")),
    responses(
        (status = 200, description = "Updated vote counters", body = VoteCountsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Definition not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn remove_downvote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<VoteCountsResponse>, AppError> {
    Ok(Json(
        retract_vote(&state, id, auth_user.user_id, VoteType::Down).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Definitions & Votes",
    operation_id = "deleteDefinition",
    summary = "Soft-delete a definition",
    description = "Marks a definition as deleted, hiding it from listings, ranking, and random selection. The row and its votes are kept. Requires `definition:moderate` permission. Idempotent.",
    params(("id" = i32, Path, description = "Definition ID")),
    responses(
        (status = 204, description = "Definition deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Definition not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_definition(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("definition:moderate")?;

    let model = definition::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Definition {id} not found")))?;

    if !model.deleted {
        let mut active: definition::ActiveModel = model.into();
        active.deleted = Set(true);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&state.db).await?;
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/random",
    tag = "Definitions & Votes",
    operation_id = "randomDefinition",
    summary = "Get a random approved definition",
    description = "Returns a uniformly random approved, non-deleted definition. Public endpoint.",
    responses(
        (status = 200, description = "A random definition", body = DefinitionResponse),
        (status = 404, description = "No approved definitions exist (NO_CONTENT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn random_definition(
    State(state): State<AppState>,
) -> Result<Json<DefinitionResponse>, AppError> {
    let model = selection::random_approved_definition(&state.db, &state.rng).await?;
    Ok(Json(model.into()))
}
