pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;
use crate::ui;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // UI shell
        .route("/", get(ui::handle_index))
        .route("/screen", post(ui::handle_screen))
        // Screening API
        .route("/api/v1/screenings", post(handlers::handle_screening))
        .route("/api/v1/resumes/parse", post(handlers::handle_parse_resume))
        .route("/api/v1/candidates", get(handlers::handle_list_candidates))
        .route(
            "/api/v1/candidates/:id",
            get(handlers::handle_get_candidate).delete(handlers::handle_delete_candidate),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
