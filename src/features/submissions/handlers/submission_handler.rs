use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::JsonBody;
use crate::features::auth::model::Session;
use crate::features::reports::models::Report;
use crate::features::submissions::dtos::{
    DraftResponseDto, SubmitReportResponseDto, UpdateDraftDto, UploadPhotoDto,
};
use crate::features::submissions::models::ReportDraft;
use crate::features::submissions::services::{DraftService, SubmissionService};
use crate::shared::constants::{MSG_LOCATION_DETECTED, MSG_REPORT_SUBMITTED, REPORTS_PATH};
use crate::shared::types::ApiResponse;

/// State for submission and draft handlers
#[derive(Clone)]
pub struct SubmissionState {
    pub submission_service: Arc<SubmissionService>,
    pub draft_service: Arc<DraftService>,
}

fn submitted(report: Report) -> (StatusCode, Json<ApiResponse<SubmitReportResponseDto>>) {
    let dto = SubmitReportResponseDto {
        report: report.into(),
        redirect_to: REPORTS_PATH.to_string(),
    };
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(dto),
            Some(MSG_REPORT_SUBMITTED.to_string()),
            None,
        )),
    )
}

/// Submit a complete report in one request
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = ReportDraft,
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<SubmitReportResponseDto>),
        (status = 400, description = "Missing location or invalid field"),
        (status = 401, description = "Sign-in required")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn submit_report(
    session: Session,
    State(state): State<SubmissionState>,
    JsonBody(draft): JsonBody<ReportDraft>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitReportResponseDto>>)> {
    draft
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    debug!("Direct submission from {}", session.profile.email);
    let report = state.submission_service.submit(&draft).await?;
    Ok(submitted(report))
}

/// Start a new draft
#[utoipa::path(
    post,
    path = "/api/drafts",
    responses(
        (status = 201, description = "Draft created", body = ApiResponse<DraftResponseDto>),
        (status = 401, description = "Sign-in required")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn create_draft(
    session: Session,
    State(state): State<SubmissionState>,
) -> (StatusCode, Json<ApiResponse<DraftResponseDto>>) {
    let draft = state.draft_service.create(&session.profile.email).await;
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(draft.into()), None, None)),
    )
}

#[utoipa::path(
    get,
    path = "/api/drafts/{id}",
    params(("id" = Uuid, Path, description = "Draft ID")),
    responses(
        (status = 200, description = "Draft found", body = ApiResponse<DraftResponseDto>),
        (status = 404, description = "Draft not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn get_draft(
    session: Session,
    State(state): State<SubmissionState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DraftResponseDto>>> {
    let draft = state.draft_service.get(id, &session.profile.email).await?;
    Ok(Json(ApiResponse::success(Some(draft.into()), None, None)))
}

/// Edit draft fields
#[utoipa::path(
    patch,
    path = "/api/drafts/{id}",
    params(("id" = Uuid, Path, description = "Draft ID")),
    request_body = UpdateDraftDto,
    responses(
        (status = 200, description = "Draft updated", body = ApiResponse<DraftResponseDto>),
        (status = 400, description = "Invalid field"),
        (status = 404, description = "Draft not found"),
        (status = 409, description = "Draft is being submitted")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn update_draft(
    session: Session,
    State(state): State<SubmissionState>,
    Path(id): Path<Uuid>,
    JsonBody(dto): JsonBody<UpdateDraftDto>,
) -> Result<Json<ApiResponse<DraftResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let draft = state
        .draft_service
        .update(id, &session.profile.email, dto.try_into()?)
        .await?;
    Ok(Json(ApiResponse::success(Some(draft.into()), None, None)))
}

/// Upload the draft's photo
///
/// Accepts multipart/form-data with a single `photo` file field.
#[utoipa::path(
    put,
    path = "/api/drafts/{id}/photo",
    params(("id" = Uuid, Path, description = "Draft ID")),
    request_body(content = UploadPhotoDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo attached", body = ApiResponse<DraftResponseDto>),
        (status = 404, description = "Draft not found or discarded"),
        (status = 409, description = "Superseded by a newer upload"),
        (status = 413, description = "Photo too large"),
        (status = 422, description = "Photo rejected or upload failed")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn upload_draft_photo(
    session: Session,
    State(state): State<SubmissionState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<DraftResponseDto>>> {
    let mut photo: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("photo") {
            debug!("Ignoring unknown field: {:?}", field.name());
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "photo".to_string());
        let data = field.bytes().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read photo data: {}", e))
        })?;

        photo = Some((file_name, content_type, data.to_vec()));
    }

    let (file_name, content_type, data) =
        photo.ok_or_else(|| AppError::BadRequest("Photo is required".to_string()))?;

    let draft = state
        .draft_service
        .attach_photo(id, &session.profile.email, &file_name, &content_type, data)
        .await?;
    Ok(Json(ApiResponse::success(Some(draft.into()), None, None)))
}

/// Remove the draft's photo
#[utoipa::path(
    delete,
    path = "/api/drafts/{id}/photo",
    params(("id" = Uuid, Path, description = "Draft ID")),
    responses(
        (status = 200, description = "Photo cleared", body = ApiResponse<DraftResponseDto>),
        (status = 404, description = "Draft not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn clear_draft_photo(
    session: Session,
    State(state): State<SubmissionState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DraftResponseDto>>> {
    let draft = state
        .draft_service
        .clear_photo(id, &session.profile.email)
        .await?;
    Ok(Json(ApiResponse::success(Some(draft.into()), None, None)))
}

/// Fill the draft's location from the current position
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/locate",
    params(("id" = Uuid, Path, description = "Draft ID")),
    responses(
        (status = 200, description = "Location detected", body = ApiResponse<DraftResponseDto>),
        (status = 404, description = "Draft not found"),
        (status = 422, description = "Position unavailable; enter an address instead")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn locate_draft(
    session: Session,
    State(state): State<SubmissionState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DraftResponseDto>>> {
    let draft = state
        .draft_service
        .locate(id, &session.profile.email)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(draft.into()),
        Some(MSG_LOCATION_DETECTED.to_string()),
        None,
    )))
}

/// Submit the draft as a new report
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/submit",
    params(("id" = Uuid, Path, description = "Draft ID")),
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<SubmitReportResponseDto>),
        (status = 400, description = "Missing location or invalid field"),
        (status = 404, description = "Draft not found or discarded"),
        (status = 409, description = "Submission already in progress"),
        (status = 422, description = "Photo upload failed")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn submit_draft(
    session: Session,
    State(state): State<SubmissionState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitReportResponseDto>>)> {
    let report = state
        .draft_service
        .submit(id, &session.profile.email)
        .await?;
    Ok(submitted(report))
}

/// Discard the draft
#[utoipa::path(
    delete,
    path = "/api/drafts/{id}",
    params(("id" = Uuid, Path, description = "Draft ID")),
    responses(
        (status = 204, description = "Draft discarded"),
        (status = 404, description = "Draft not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn discard_draft(
    session: Session,
    State(state): State<SubmissionState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state
        .draft_service
        .discard(id, &session.profile.email)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
