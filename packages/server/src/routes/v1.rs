use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/sports", sport_routes())
        .nest("/terms", term_routes())
        .nest("/suggestions", suggestion_routes())
        .nest("/definitions", definition_routes())
        .nest("/term-of-the-day", term_of_the_day_routes())
}

fn sport_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::sport::list_sports).post(handlers::sport::create_sport),
        )
        .route("/{slug}/categories", post(handlers::sport::create_category))
        .route("/{slug}/terms", get(handlers::term::list_sport_terms))
        .route("/{slug}/terms/{term_slug}", get(handlers::term::get_term))
}

fn term_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::term::list_terms).post(handlers::term::create_term),
        )
        .route("/random", get(handlers::term::random_term))
        .route(
            "/{id}/definitions",
            post(handlers::definition::create_definition),
        )
}

fn suggestion_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::suggestion::list_suggestions).post(handlers::suggestion::create_suggestion),
        )
        .route(
            "/{id}/review",
            put(handlers::suggestion::review_suggestion),
        )
}

fn definition_routes() -> Router<AppState> {
    Router::new()
        .route("/random", get(handlers::definition::random_definition))
        .route("/{id}", delete(handlers::definition::delete_definition))
        .route(
            "/{id}/upvote",
            post(handlers::definition::upvote).delete(handlers::definition::remove_upvote),
        )
        .route(
            "/{id}/downvote",
            post(handlers::definition::downvote).delete(handlers::definition::remove_downvote),
        )
}

fn term_of_the_day_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::term_of_the_day::todays_term))
        .route("/history", get(handlers::term_of_the_day::history))
        .route("/populate", post(handlers::term_of_the_day::populate))
}
