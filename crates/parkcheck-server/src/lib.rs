//! parkcheck-server
//!
//! HTTP surface for the three screening panels: clinical data test, self
//! assessment and chat helper. Every panel works on an explicit session
//! created with `POST /sessions`.

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        // Static instrument definitions
        .route("/clinical/fields", get(routes::clinical::list_fields))
        .route("/assessment", get(routes::assessment::get_questionnaire))
        // Sessions
        .route("/sessions", post(routes::sessions::create_session))
        .route("/sessions/{id}", delete(routes::sessions::delete_session))
        // Clinical data test
        .route(
            "/sessions/{id}/clinical",
            get(routes::clinical::get_form)
                .post(routes::clinical::submit_form)
                .delete(routes::clinical::clear_form),
        )
        // Self assessment
        .route(
            "/sessions/{id}/assessment",
            get(routes::assessment::get_answers)
                .post(routes::assessment::complete_assessment)
                .delete(routes::assessment::reset_answers),
        )
        .route(
            "/sessions/{id}/assessment/{question}",
            put(routes::assessment::select_answer),
        )
        // Chat helper
        .route(
            "/sessions/{id}/chat",
            get(routes::chat::get_chat)
                .post(routes::chat::send_message)
                .delete(routes::chat::clear_chat),
        )
        .layer(axum_mw::from_fn(middleware::request_log::log_request))
        .layer(cors)
        .with_state(state)
}
