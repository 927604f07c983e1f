use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::reports::lifecycle::StatusUpdate;
use crate::features::reports::models::{
    CategoryDisplay, Report, ReportCategory, ReportStatus, StatusBadge,
};

/// Icon and marker styling for a category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDisplayDto {
    pub label: String,
    pub icon: String,
    pub marker_class: String,
    pub color: String,
}

impl From<CategoryDisplay> for CategoryDisplayDto {
    fn from(d: CategoryDisplay) -> Self {
        Self {
            label: d.label.to_string(),
            icon: d.icon.to_string(),
            marker_class: d.marker_class.to_string(),
            color: d.color.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusBadgeDto {
    pub class: String,
    pub icon: String,
}

impl From<StatusBadge> for StatusBadgeDto {
    fn from(b: StatusBadge) -> Self {
        Self {
            class: b.class.to_string(),
            icon: b.icon.to_string(),
        }
    }
}

/// Response DTO for report, with its display attributes
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    #[serde(flatten)]
    pub report: Report,
    pub category_display: CategoryDisplayDto,
    pub status_badge: StatusBadgeDto,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            category_display: r.category.display().into(),
            status_badge: r.status.badge().into(),
            report: r,
        }
    }
}

/// One status tab: its badge count and its reports
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportBucketDto {
    pub count: usize,
    pub reports: Vec<ReportResponseDto>,
}

impl From<Vec<Report>> for ReportBucketDto {
    fn from(reports: Vec<Report>) -> Self {
        Self {
            count: reports.len(),
            reports: reports.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportBucketsDto {
    pub all: ReportBucketDto,
    pub pending: ReportBucketDto,
    pub in_progress: ReportBucketDto,
    pub fixed: ReportBucketDto,
}

/// Response DTO for the report detail page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetailResponseDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    pub timeline: Vec<StatusUpdate>,
    pub address_label: String,
    pub coordinates_label: String,
    pub description_label: String,
    pub photo_url: String,
    /// Present only when a team has been assigned
    pub assigned_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapMarkerDto {
    pub id: String,
    pub category: ReportCategory,
    pub marker_class: String,
    pub color: String,
    /// Percent of map width from the left edge
    pub x: f64,
    /// Percent of map height from the top edge
    pub y: f64,
    pub selected: bool,
}

/// Info card for the selected marker
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MapSelectionDto {
    pub id: String,
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MapViewDto {
    pub markers: Vec<MapMarkerDto>,
    pub selection: Option<MapSelectionDto>,
}

/// Request DTO for an administrative status change
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
    #[validate(length(min = 1, max = 100))]
    pub assigned_to: Option<String>,
}

/// Query parameters for listing reports
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListReportsQuery {
    /// "Pending", "In Progress" or "Fixed"; omit for all reports
    pub status: Option<String>,
}

/// Query parameters for the map view
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct MapQuery {
    pub status: Option<String>,
    /// Report id whose info card should be shown
    pub selected: Option<String>,
}

/// Parse a user-supplied status filter; blank means no filter
///
/// Unknown values are the caller's mistake here, so they become `BadRequest`
/// rather than the data-integrity `InvalidStatusKind`.
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<ReportStatus>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Unknown status filter: {}", raw))),
    }
}
