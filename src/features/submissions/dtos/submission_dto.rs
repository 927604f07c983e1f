use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::ReportResponseDto;
use crate::features::reports::models::ReportCategory;
use crate::features::submissions::models::{DraftLocation, PhotoState};
use crate::features::submissions::services::{DraftPatch, DraftSnapshot};
use crate::shared::constants::MAX_DESCRIPTION_LEN;

/// Response DTO for a submitted report
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitReportResponseDto {
    pub report: ReportResponseDto,
    /// Where the client should navigate next
    pub redirect_to: String,
}

/// Response DTO for a draft
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DraftResponseDto {
    pub id: Uuid,
    pub category: Option<ReportCategory>,
    pub description: Option<String>,
    pub location: DraftLocation,
    pub photo: PhotoState,
    /// True while a submission is pending; edits are rejected meanwhile
    pub submitting: bool,
}

impl From<DraftSnapshot> for DraftResponseDto {
    fn from(s: DraftSnapshot) -> Self {
        Self {
            id: s.id,
            category: s.draft.category,
            description: s.draft.description,
            location: s.draft.location,
            photo: s.photo,
            submitting: s.submitting,
        }
    }
}

/// DTO for editing draft fields; omitted fields are left as they are
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDraftDto {
    pub category: Option<ReportCategory>,
    #[validate(length(max = MAX_DESCRIPTION_LEN))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
}

impl TryFrom<UpdateDraftDto> for DraftPatch {
    type Error = AppError;

    fn try_from(dto: UpdateDraftDto) -> Result<Self> {
        let position = match (dto.lat, dto.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "Latitude and longitude must be provided together".to_string(),
                ))
            }
        };

        Ok(DraftPatch {
            category: dto.category,
            description: dto.description,
            address: dto.address,
            position,
        })
    }
}

/// Upload DTO for OpenAPI documentation
///
/// The handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotoDto {
    /// JPEG, PNG, GIF or WebP image
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photo: String,
}
