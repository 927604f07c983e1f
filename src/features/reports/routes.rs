use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::{PresentationService, ReportService};

/// Public read routes for the reports feature
pub fn routes(
    report_service: Arc<ReportService>,
    presentation_service: Arc<PresentationService>,
) -> Router {
    let state = ReportState {
        report_service,
        presentation_service,
    };

    Router::new()
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/reports/buckets", get(handlers::list_buckets))
        .route("/api/reports/map", get(handlers::map_view))
        .route("/api/reports/{id}", get(handlers::get_report))
        .with_state(state)
}

/// Status changes; session middleware must be applied by the caller
pub fn admin_routes(
    report_service: Arc<ReportService>,
    presentation_service: Arc<PresentationService>,
) -> Router {
    let state = ReportState {
        report_service,
        presentation_service,
    };

    Router::new()
        .route(
            "/api/reports/{id}/status",
            patch(handlers::update_report_status),
        )
        .with_state(state)
}
