//! HTTP surface: router assembly, handlers, and shared middleware.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::cache::{CacheState, response_cache_layer};

/// Assemble the full application router. The response cache sits inside the
/// logging layers so hits and misses are logged like any other response.
pub fn build_router(state: AppState, cache: CacheState) -> Router {
    Router::new()
        .route("/subjects/", get(handlers::subjects::list))
        .route("/subjects/addsubject", post(handlers::subjects::create))
        .route(
            "/subjects/{id}",
            get(handlers::subjects::find)
                .put(handlers::subjects::update)
                .delete(handlers::subjects::remove),
        )
        .route("/subtopics/addsubtopic", post(handlers::subtopics::create))
        .route(
            "/subtopics/{id}",
            get(handlers::subtopics::list)
                .put(handlers::subtopics::rename)
                .delete(handlers::subtopics::remove),
        )
        .route("/questions/addquestion", post(handlers::questions::create))
        .route(
            "/questions/{id}",
            get(handlers::questions::list)
                .put(handlers::questions::update)
                .delete(handlers::questions::remove),
        )
        .route("/interview/public", get(handlers::experiences::list_public))
        .route(
            "/interview/unpublished",
            get(handlers::experiences::list_unpublished),
        )
        .route("/interview/add", post(handlers::experiences::submit))
        .route(
            "/interview/approve/{id}",
            put(handlers::experiences::approve),
        )
        .route("/interview/{id}", delete(handlers::experiences::remove))
        .route(
            "/progress/{user_id}/{subject_id}",
            get(handlers::progress::summary),
        )
        .route("/progress/mark", post(handlers::progress::mark))
        .route("/progress/unmark", post(handlers::progress::unmark))
        .route("/healthz", get(handlers::health))
        .layer(axum_middleware::from_fn_with_state(
            cache,
            response_cache_layer,
        ))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
        .with_state(state)
}
