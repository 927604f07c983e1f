use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::features::submissions::handlers::{self, SubmissionState};
use crate::features::submissions::services::{DraftService, SubmissionService};

/// Multipart framing allowance on top of the photo itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Report submission and draft routes
///
/// All routes require a session; the caller applies the session middleware.
pub fn routes(
    submission_service: Arc<SubmissionService>,
    draft_service: Arc<DraftService>,
    max_photo_bytes: usize,
) -> Router {
    let state = SubmissionState {
        submission_service,
        draft_service,
    };

    Router::new()
        .route("/api/reports", post(handlers::submit_report))
        .route("/api/drafts", post(handlers::create_draft))
        .route(
            "/api/drafts/{id}",
            get(handlers::get_draft)
                .patch(handlers::update_draft)
                .delete(handlers::discard_draft),
        )
        .route(
            "/api/drafts/{id}/photo",
            put(handlers::upload_draft_photo)
                .layer(DefaultBodyLimit::max(max_photo_bytes + MULTIPART_OVERHEAD)),
        )
        .route("/api/drafts/{id}/photo", delete(handlers::clear_draft_photo))
        .route("/api/drafts/{id}/locate", post(handlers::locate_draft))
        .route("/api/drafts/{id}/submit", post(handlers::submit_draft))
        .with_state(state)
}
