use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::JsonBody;
use crate::features::auth::guards::RequireAdmin;
use crate::features::reports::dtos::{
    parse_status_filter, ListReportsQuery, MapQuery, MapViewDto, ReportBucketsDto,
    ReportDetailResponseDto, ReportResponseDto, UpdateReportStatusDto,
};
use crate::features::reports::services::{PresentationService, ReportService};
use crate::shared::types::{ApiResponse, Meta};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub presentation_service: Arc<PresentationService>,
}

/// List reports, optionally filtered by status
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "Reports in insertion order", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Unknown status filter")
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let status = parse_status_filter(query.status.as_deref())?;
    let reports = state.report_service.list(status).await?;
    let total = reports.len();
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::total(total)),
    )))
}

/// Reports grouped into status tabs
#[utoipa::path(
    get,
    path = "/api/reports/buckets",
    responses(
        (status = 200, description = "Status buckets with counts", body = ApiResponse<ReportBucketsDto>)
    ),
    tag = "reports"
)]
pub async fn list_buckets(
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<ReportBucketsDto>>> {
    let buckets = state.presentation_service.buckets().await?;
    Ok(Json(ApiResponse::success(Some(buckets), None, None)))
}

/// Map markers and the selected report's info card
#[utoipa::path(
    get,
    path = "/api/reports/map",
    params(MapQuery),
    responses(
        (status = 200, description = "Map view", body = ApiResponse<MapViewDto>),
        (status = 400, description = "Unknown status filter"),
        (status = 404, description = "Selected report not found")
    ),
    tag = "reports"
)]
pub async fn map_view(
    State(state): State<ReportState>,
    Query(query): Query<MapQuery>,
) -> Result<Json<ApiResponse<MapViewDto>>> {
    let status = parse_status_filter(query.status.as_deref())?;
    let view = state
        .presentation_service
        .map_view(status, query.selected.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(Some(view), None, None)))
}

/// Get report by ID with its status timeline
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report reference number")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportDetailResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<ReportState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReportDetailResponseDto>>> {
    let detail = state.presentation_service.detail(&id).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Update report status (admin only)
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(
        ("id" = String, Path, description = "Report reference number")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Status can only move forward")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_status(
    RequireAdmin(session): RequireAdmin,
    State(state): State<ReportState>,
    Path(id): Path<String>,
    JsonBody(dto): JsonBody<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .report_service
        .update_status(&id, &dto, &session.profile.email)
        .await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}
