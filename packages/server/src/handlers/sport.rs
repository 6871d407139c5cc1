use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{category, sport};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::sport::*;
use crate::state::AppState;
use crate::utils::slug::unique_sport_slug;

#[utoipa::path(
    get,
    path = "/",
    tag = "Sports",
    operation_id = "listSports",
    summary = "List active sports",
    description = "Returns all active sports in name order. Public endpoint.",
    responses(
        (status = 200, description = "List of active sports", body = Vec<SportResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_sports(
    State(state): State<AppState>,
) -> Result<Json<Vec<SportResponse>>, AppError> {
    let sports = sport::Entity::find()
        .filter(sport::Column::Active.eq(true))
        .order_by_asc(sport::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(sports.into_iter().map(SportResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Sports",
    operation_id = "createSport",
    summary = "Create a new sport",
    description = "Creates a sport with a freshly derived slug. Requires `sport:create` permission.",
    request_body = CreateSportRequest,
    responses(
        (status = 201, description = "Sport created", body = SportResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Name already taken (DUPLICATE_NAME)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_sport(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSportRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("sport:create")?;
    validate_create_sport(&payload)?;

    let name = payload.name.trim().to_string();

    let exists = sport::Entity::find()
        .filter(sport::Column::Name.eq(&name))
        .one(&state.db)
        .await?
        .is_some();
    if exists {
        return Err(AppError::DuplicateName);
    }

    let slug = unique_sport_slug(&state.db, &name).await?;

    let new_sport = sport::ActiveModel {
        name: Set(name),
        slug: Set(slug),
        emoji: Set(payload.emoji),
        active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    // The unique columns catch any insert that raced past the pre-check.
    let model = match new_sport.insert(&state.db).await {
        Ok(model) => model,
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => return Err(AppError::DuplicateName),
            _ => return Err(e.into()),
        },
    };

    Ok((StatusCode::CREATED, Json(SportResponse::from(model))))
}

#[utoipa::path(
    post,
    path = "/{slug}/categories",
    tag = "Sports",
    operation_id = "createCategory",
    summary = "Create a category within a sport",
    description = "Creates a category. Category names are unique per sport. Requires `sport:create` permission.",
    params(("slug" = String, Path, description = "Sport slug")),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Sport not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Category already exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(slug, name = %payload.name))]
pub async fn create_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("sport:create")?;
    validate_create_category(&payload)?;

    let sport = find_sport_by_slug(&state.db, &slug).await?;
    let name = payload.name.trim().to_string();

    let new_category = category::ActiveModel {
        name: Set(name),
        sport_id: Set(sport.id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = match new_category.insert(&state.db).await {
        Ok(model) => model,
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                return Err(AppError::Conflict(
                    "A category with this name already exists for this sport".into(),
                ));
            }
            _ => return Err(e.into()),
        },
    };

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(model))))
}

pub async fn find_sport_by_slug(
    conn: &impl ConnectionTrait,
    slug: &str,
) -> Result<sport::Model, AppError> {
    sport::Entity::find()
        .filter(sport::Column::Slug.eq(slug))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sport '{slug}' not found")))
}
