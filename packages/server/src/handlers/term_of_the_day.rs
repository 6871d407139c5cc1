use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use chrono::Duration;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{term, term_of_the_day};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::{Pagination, clamp_pagination};
use crate::models::term::*;
use crate::selection;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Term of the Day",
    operation_id = "todaysTerm",
    summary = "Get today's featured term",
    description = "Returns the term featured for the current UTC date. Public endpoint.",
    responses(
        (status = 200, description = "Today's term", body = TermOfTheDayResponse),
        (status = 404, description = "No term featured today (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn todays_term(
    State(state): State<AppState>,
) -> Result<Json<TermOfTheDayResponse>, AppError> {
    let today = chrono::Utc::now().date_naive();

    let (entry, featured) = term_of_the_day::Entity::find()
        .filter(term_of_the_day::Column::Day.eq(today))
        .find_also_related(term::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No term of the day for today".into()))?;

    let featured =
        featured.ok_or_else(|| AppError::Internal(format!("dangling term {}", entry.term_id)))?;

    Ok(Json(TermOfTheDayResponse {
        day: entry.day,
        term: featured.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/history",
    tag = "Term of the Day",
    operation_id = "termOfTheDayHistory",
    summary = "List past featured terms",
    description = "Returns featured terms for today and earlier dates, newest first, paginated. Future entries written by the populate job stay hidden until their date arrives. Public endpoint.",
    params(PageQuery),
    responses(
        (status = 200, description = "Featured term history", body = TermOfTheDayListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TermOfTheDayListResponse>, AppError> {
    let (page, per_page) = clamp_pagination(query.page, query.per_page);
    let today = chrono::Utc::now().date_naive();

    let select = term_of_the_day::Entity::find()
        .filter(term_of_the_day::Column::Day.lte(today));

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let rows = select
        .order_by_desc(term_of_the_day::Column::Day)
        .find_also_related(term::Entity)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let data = rows
        .into_iter()
        .filter_map(|(entry, featured)| {
            featured.map(|t| TermOfTheDayResponse {
                day: entry.day,
                term: t.into(),
            })
        })
        .collect();

    Ok(Json(TermOfTheDayListResponse {
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
    post,
    path = "/populate",
    tag = "Term of the Day",
    operation_id = "populateTermsOfTheDay",
    summary = "Fill upcoming days with random terms",
    description = "For each of the next `days` dates (default 7, starting today) without a featured term, picks a random approved term and inserts it. `ON CONFLICT (day) DO NOTHING` keeps concurrent runs duplicate-free. Requires `totd:manage` permission.",
    request_body = PopulateTermOfTheDayRequest,
    responses(
        (status = 200, description = "Days filled", body = PopulateTermOfTheDayResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No approved terms to pick from (NO_CONTENT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn populate(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<PopulateTermOfTheDayRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("totd:manage")?;
    validate_populate(&payload)?;

    let days = payload.days.unwrap_or(7);
    let today = chrono::Utc::now().date_naive();
    let mut created = 0;

    for offset in 0..days {
        let day = today + Duration::days(i64::from(offset));

        let taken = term_of_the_day::Entity::find()
            .filter(term_of_the_day::Column::Day.eq(day))
            .one(&state.db)
            .await?
            .is_some();
        if taken {
            continue;
        }

        let pick = selection::random_approved_term(&state.db, &state.rng).await?;

        let entry = term_of_the_day::ActiveModel {
            day: Set(day),
            term_id: Set(pick.id),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        // A concurrent populate run may have claimed the day after our
        // existence check; losing that race is not an error.
        let res = term_of_the_day::Entity::insert(entry)
            .on_conflict(
                OnConflict::column(term_of_the_day::Column::Day)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&state.db)
            .await;

        match res {
            Ok(_) => created += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Json(PopulateTermOfTheDayResponse { created }))
}
