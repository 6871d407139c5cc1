use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::ReviewStatus;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{definition, sport, suggested_term, term};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::{Pagination, clamp_pagination};
use crate::models::suggestion::*;
use crate::models::term::PageQuery;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Suggestions",
    operation_id = "createSuggestion",
    summary = "Suggest a new term",
    description = "Submits a term suggestion with its initial definition. The suggestion enters the moderation queue as `pending`. Any authenticated user may suggest.",
    request_body = CreateSuggestionRequest,
    responses(
        (status = 201, description = "Suggestion created", body = SuggestionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Sport not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(text = %payload.text))]
pub async fn create_suggestion(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSuggestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_suggestion(&payload)?;

    sport::Entity::find_by_id(payload.sport_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sport {} not found", payload.sport_id)))?;

    let now = chrono::Utc::now();
    let new_suggestion = suggested_term::ActiveModel {
        text: Set(payload.text.trim().to_string()),
        definition_text: Set(payload.definition_text),
        example_usage: Set(payload.example_usage),
        review_status: Set(ReviewStatus::Pending),
        sport_id: Set(payload.sport_id),
        user_id: Set(Some(auth_user.user_id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_suggestion.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(SuggestionResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Suggestions",
    operation_id = "listSuggestions",
    summary = "List pending suggestions",
    description = "Returns the moderation queue: pending suggestions, oldest first, paginated. Requires `suggestion:review` permission.",
    params(PageQuery),
    responses(
        (status = 200, description = "Pending suggestions", body = SuggestionListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_suggestions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<SuggestionListResponse>, AppError> {
    auth_user.require_permission("suggestion:review")?;
    let (page, per_page) = clamp_pagination(query.page, query.per_page);

    let select = suggested_term::Entity::find()
        .filter(suggested_term::Column::ReviewStatus.eq(ReviewStatus::Pending));

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_asc(suggested_term::Column::CreatedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    Ok(Json(SuggestionListResponse {
        data: data.into_iter().map(Into::into).collect(),
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    put,
    path = "/{id}/review",
    tag = "Suggestions",
    operation_id = "reviewSuggestion",
    summary = "Review a suggestion",
    description = "Sets the review status. The first transition to `accepted` promotes the suggestion: a term and its first definition are created in the same transaction. Re-accepting an already-promoted suggestion only updates the status. Requires `suggestion:review` permission.",
    params(("id" = i32, Path, description = "Suggestion ID")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review applied", body = ReviewResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Suggestion not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Term exists or promotion raced (DUPLICATE_TERM_IN_SPORT, CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, status = %payload.status))]
pub async fn review_suggestion(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<ReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    auth_user.require_permission("suggestion:review")?;

    let txn = state.db.begin().await?;

    let suggestion = suggested_term::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Suggestion {id} not found")))?;

    let mut active: suggested_term::ActiveModel = suggestion.clone().into();
    active.review_status = Set(payload.status);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(&txn).await?;

    let mut created_term = None;
    if payload.status == ReviewStatus::Accepted {
        let already_promoted = term::Entity::find()
            .filter(term::Column::SuggestedTermId.eq(id))
            .one(&txn)
            .await?
            .is_some();

        if !already_promoted {
            // Promotion failures roll the status change back with them.
            let model = super::term::insert_term(
                &txn,
                &suggestion.text,
                suggestion.sport_id,
                suggestion.user_id,
                Some(id),
            )
            .await?;

            let now = chrono::Utc::now();
            definition::ActiveModel {
                text: Set(suggestion.definition_text.clone()),
                example_usage: Set(suggestion.example_usage.clone()),
                approved: Set(true),
                deleted: Set(false),
                num_upvotes: Set(0),
                num_downvotes: Set(0),
                net_votes: Set(0),
                term_id: Set(model.id),
                user_id: Set(suggestion.user_id.unwrap_or(auth_user.user_id)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            created_term = Some(model);
        }
    }

    txn.commit().await?;

    Ok(Json(ReviewResponse {
        suggestion: updated.into(),
        term: created_term.map(Into::into),
    }))
}
