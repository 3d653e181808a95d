pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::documents::handlers as documents;
use crate::generation::handlers as generation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/generate-product",
            post(generation::handle_generate_product),
        )
        .route(
            "/api/list-documents",
            get(documents::handle_list_documents),
        )
        .route(
            "/api/download-document",
            get(documents::handle_download_document),
        )
        .route(
            "/api/regenerate-document",
            post(documents::handle_regenerate_document),
        )
        .route(
            "/api/delete-document",
            delete(documents::handle_delete_document),
        )
        .route(
            "/api/generate-all-documents",
            post(documents::handle_generate_all_documents),
        )
        .route(
            "/api/render-status",
            get(documents::handle_render_status),
        )
        .with_state(state)
}
