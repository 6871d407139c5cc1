use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, Query as SeaQuery};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{category, definition, sport, term, term_category};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::{Pagination, clamp_pagination, escape_like};
use crate::models::term::*;
use crate::selection;
use crate::state::AppState;
use crate::utils::slug::unique_term_slug;

// Approved-definition count annotated onto term listings. Correlated on
// the outer `term` table, so this only works in term queries.
const NUM_DEFINITIONS_SQL: &str = "(SELECT COUNT(*) FROM definition WHERE definition.term_id = term.id AND definition.approved = TRUE AND definition.deleted = FALSE)";

#[utoipa::path(
    post,
    path = "/",
    tag = "Terms",
    operation_id = "createTerm",
    summary = "Create a term directly",
    description = "Creates an approved term, bypassing the suggestion queue. Requires `term:create` permission. Categories must belong to the term's sport.",
    request_body = CreateTermRequest,
    responses(
        (status = 201, description = "Term created", body = TermResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Sport not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Term exists for sport (DUPLICATE_TERM_IN_SPORT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(text = %payload.text))]
pub async fn create_term(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTermRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("term:create")?;
    validate_create_term(&payload)?;

    let text = payload.text.trim().to_string();

    sport::Entity::find_by_id(payload.sport_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sport {} not found", payload.sport_id)))?;

    // Every category must exist and belong to the same sport.
    if !payload.category_ids.is_empty() {
        let found = category::Entity::find()
            .filter(category::Column::Id.is_in(payload.category_ids.clone()))
            .filter(category::Column::SportId.eq(payload.sport_id))
            .count(&state.db)
            .await?;
        if found != payload.category_ids.len() as u64 {
            return Err(AppError::Validation(
                "All categories must exist and belong to the term's sport".into(),
            ));
        }
    }

    let txn = state.db.begin().await?;

    let model = insert_term(
        &txn,
        &text,
        payload.sport_id,
        Some(auth_user.user_id),
        None,
    )
    .await?;

    for category_id in payload.category_ids {
        term_category::ActiveModel {
            term_id: Set(model.id),
            category_id: Set(category_id),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(TermResponse::from(model))))
}

/// Insert a term with a freshly probed slug. Shared by direct creation
/// and suggestion promotion; runs on the caller's transaction.
pub async fn insert_term(
    conn: &impl ConnectionTrait,
    text: &str,
    sport_id: i32,
    user_id: Option<i32>,
    suggested_term_id: Option<i32>,
) -> Result<term::Model, AppError> {
    let exists = term::Entity::find()
        .filter(term::Column::SportId.eq(sport_id))
        .filter(term::Column::Text.eq(text))
        .one(conn)
        .await?
        .is_some();
    if exists {
        return Err(AppError::DuplicateTermInSport);
    }

    let slug = unique_term_slug(conn, sport_id, text).await?;
    let now = chrono::Utc::now();

    let new_term = term::ActiveModel {
        text: Set(text.to_string()),
        slug: Set(slug),
        approved: Set(true),
        sport_id: Set(sport_id),
        user_id: Set(user_id),
        suggested_term_id: Set(suggested_term_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_term.insert(conn).await {
        Ok(model) => Ok(model),
        // A concurrent insert of the same (sport, text) or slug raced
        // past the pre-check and lost to the composite index.
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::DuplicateTermInSport),
            _ => Err(e.into()),
        },
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Terms",
    operation_id = "listTerms",
    summary = "List approved terms",
    description = "Returns approved terms in text order with their approved-definition counts. Supports case-insensitive substring search and filtering by sport slug. Public endpoint.",
    params(TermListQuery),
    responses(
        (status = 200, description = "List of terms", body = TermListResponse),
        (status = 404, description = "Unknown sport slug (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_terms(
    State(state): State<AppState>,
    Query(query): Query<TermListQuery>,
) -> Result<Json<TermListResponse>, AppError> {
    let (page, per_page) = clamp_pagination(query.page, query.per_page);

    let mut select = term::Entity::find().filter(term::Column::Approved.eq(true));

    if let Some(ref sport_slug) = query.sport {
        let sport = super::sport::find_sport_by_slug(&state.db, sport_slug).await?;
        select = select.filter(term::Column::SportId.eq(sport.id));
    }

    if let Some(ref search) = query.search {
        let needle = escape_like(search.trim());
        if !needle.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(term::Column::Text)))
                    .like(LikeExpr::new(format!("%{}%", needle.to_lowercase())).escape('\\')),
            );
        }
    }

    paginate_term_list(&state.db, select, page, per_page).await
}

#[utoipa::path(
    get,
    path = "/{slug}/terms",
    tag = "Sports",
    operation_id = "listSportTerms",
    summary = "List a sport's approved terms",
    description = "Returns a sport's approved terms in text order. The `categories` parameter takes comma-separated category names; only terms carrying every named category are returned. Public endpoint.",
    params(("slug" = String, Path, description = "Sport slug"), SportTermsQuery),
    responses(
        (status = 200, description = "List of terms", body = TermListResponse),
        (status = 404, description = "Sport not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(slug))]
pub async fn list_sport_terms(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<SportTermsQuery>,
) -> Result<Json<TermListResponse>, AppError> {
    let (page, per_page) = clamp_pagination(query.page, query.per_page);
    let sport = super::sport::find_sport_by_slug(&state.db, &slug).await?;

    let mut select = term::Entity::find()
        .filter(term::Column::Approved.eq(true))
        .filter(term::Column::SportId.eq(sport.id));

    let names: Vec<String> = query
        .categories
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if !names.is_empty() {
        // Terms carrying ALL named categories: group the junction rows by
        // term and demand one distinct match per requested name.
        let wanted = names.len() as i64;
        select = select.filter(
            term::Column::Id.in_subquery(
                SeaQuery::select()
                    .column(term_category::Column::TermId)
                    .from(term_category::Entity)
                    .inner_join(
                        category::Entity,
                        Expr::col((category::Entity, category::Column::Id))
                            .equals((term_category::Entity, term_category::Column::CategoryId)),
                    )
                    .and_where(Expr::col((category::Entity, category::Column::SportId)).eq(sport.id))
                    .and_where(Expr::col((category::Entity, category::Column::Name)).is_in(names))
                    .group_by_col(term_category::Column::TermId)
                    .and_having(
                        Expr::expr(Func::count_distinct(Expr::col((
                            category::Entity,
                            category::Column::Id,
                        ))))
                        .eq(wanted),
                    )
                    .to_owned(),
            ),
        );
    }

    paginate_term_list(&state.db, select, page, per_page).await
}

async fn paginate_term_list(
    db: &DatabaseConnection,
    select: Select<term::Entity>,
    page: u64,
    per_page: u64,
) -> Result<Json<TermListResponse>, AppError> {
    let total = select.clone().paginate(db, per_page).num_items().await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_asc(term::Column::Text)
        .select_only()
        .column(term::Column::Id)
        .column(term::Column::Text)
        .column(term::Column::Slug)
        .column(term::Column::SportId)
        .column_as(Expr::cust(NUM_DEFINITIONS_SQL), "num_definitions")
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .into_model::<TermListItem>()
        .all(db)
        .await?;

    Ok(Json(TermListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{slug}/terms/{term_slug}",
    tag = "Sports",
    operation_id = "getTerm",
    summary = "Get a term with its ranked definitions",
    description = "Returns a term, its categories, and its approved definitions ranked by net votes (ties broken by newest first). Definitions are paginated. Public endpoint.",
    params(
        ("slug" = String, Path, description = "Sport slug"),
        ("term_slug" = String, Path, description = "Term slug"),
        PageQuery,
    ),
    responses(
        (status = 200, description = "Term details", body = TermDetailResponse),
        (status = 404, description = "Sport or term not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(slug, term_slug))]
pub async fn get_term(
    State(state): State<AppState>,
    Path((slug, term_slug)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TermDetailResponse>, AppError> {
    let (page, per_page) = clamp_pagination(query.page, query.per_page);

    let sport = super::sport::find_sport_by_slug(&state.db, &slug).await?;
    let model = term::Entity::find()
        .filter(term::Column::SportId.eq(sport.id))
        .filter(term::Column::Slug.eq(&term_slug))
        .filter(term::Column::Approved.eq(true))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Term '{term_slug}' not found")))?;

    let categories = model
        .find_related(category::Entity)
        .order_by_asc(category::Column::Name)
        .all(&state.db)
        .await?;

    let definitions = definition::Entity::find()
        .filter(definition::Column::TermId.eq(model.id))
        .filter(definition::Column::Approved.eq(true))
        .filter(definition::Column::Deleted.eq(false));

    let total = definitions
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let definitions = definitions
        .order_by_desc(definition::Column::NetVotes)
        .order_by_desc(definition::Column::CreatedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    Ok(Json(TermDetailResponse {
        term: TermResponse::from(model),
        categories: categories.into_iter().map(Into::into).collect(),
        definitions: definitions.into_iter().map(Into::into).collect(),
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/random",
    tag = "Terms",
    operation_id = "randomTerm",
    summary = "Get a random approved term",
    description = "Returns a uniformly random approved term. Public endpoint.",
    responses(
        (status = 200, description = "A random term", body = TermResponse),
        (status = 404, description = "No approved terms exist (NO_CONTENT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn random_term(State(state): State<AppState>) -> Result<Json<TermResponse>, AppError> {
    let model = selection::random_approved_term(&state.db, &state.rng).await?;
    Ok(Json(model.into()))
}
