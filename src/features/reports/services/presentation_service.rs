use std::sync::Arc;

use crate::core::error::Result;
use crate::features::reports::dtos::{
    MapMarkerDto, MapSelectionDto, MapViewDto, ReportBucketsDto, ReportDetailResponseDto,
};
use crate::features::reports::lifecycle::timeline_for;
use crate::features::reports::models::{Report, ReportLocation, ReportStatus};
use crate::features::reports::projection::project;
use crate::features::reports::repository::ReportRepository;
use crate::shared::constants::{
    ASSIGNED_TEAM_LABEL, MSG_NO_ADDRESS, MSG_NO_DESCRIPTION, PLACEHOLDER_PHOTO,
};

/// Builds the list, map and detail views over the report repository
///
/// Every view is recomputed from the repository on each call.
pub struct PresentationService {
    repository: Arc<dyn ReportRepository>,
}

impl PresentationService {
    pub fn new(repository: Arc<dyn ReportRepository>) -> Self {
        Self { repository }
    }

    /// Tabs for the report list: all, pending, in progress, fixed
    pub async fn buckets(&self) -> Result<ReportBucketsDto> {
        Ok(ReportBucketsDto {
            all: self.repository.by_status(None).await?.into(),
            pending: self
                .repository
                .by_status(Some(ReportStatus::Pending))
                .await?
                .into(),
            in_progress: self
                .repository
                .by_status(Some(ReportStatus::InProgress))
                .await?
                .into(),
            fixed: self
                .repository
                .by_status(Some(ReportStatus::Fixed))
                .await?
                .into(),
        })
    }

    /// Markers for the static map, plus the info card of `selected` if given
    pub async fn map_view(
        &self,
        status: Option<ReportStatus>,
        selected: Option<&str>,
    ) -> Result<MapViewDto> {
        let selection = match selected {
            Some(id) => Some(selection_card(&self.repository.by_id(id).await?)),
            None => None,
        };

        let markers = self
            .repository
            .by_status(status)
            .await?
            .into_iter()
            .map(|report| {
                let display = report.category.display();
                let point = project(report.location.lat, report.location.lng);
                MapMarkerDto {
                    selected: selected == Some(report.id.as_str()),
                    id: report.id,
                    category: report.category,
                    marker_class: display.marker_class.to_string(),
                    color: display.color.to_string(),
                    x: point.x,
                    y: point.y,
                }
            })
            .collect();

        Ok(MapViewDto { markers, selection })
    }

    pub async fn detail(&self, id: &str) -> Result<ReportDetailResponseDto> {
        let report = self.repository.by_id(id).await?;

        Ok(ReportDetailResponseDto {
            timeline: timeline_for(&report),
            address_label: address_label(&report.location),
            coordinates_label: coordinates_label(&report.location),
            description_label: description_label(&report),
            photo_url: photo_url(&report),
            assigned_label: assigned_label(&report),
            report: report.into(),
        })
    }
}

fn selection_card(report: &Report) -> MapSelectionDto {
    let subtitle = match report.location.address.as_deref() {
        Some(address) if !address.trim().is_empty() => address.to_string(),
        _ => format!(
            "{:.4}, {:.4}",
            report.location.lat, report.location.lng
        ),
    };

    MapSelectionDto {
        id: report.id.clone(),
        title: format!("{} Issue", report.category),
        subtitle,
    }
}

pub fn address_label(location: &ReportLocation) -> String {
    match location.address.as_deref() {
        Some(address) if !address.trim().is_empty() => address.to_string(),
        _ => MSG_NO_ADDRESS.to_string(),
    }
}

pub fn coordinates_label(location: &ReportLocation) -> String {
    format!("{:.6}, {:.6}", location.lat, location.lng)
}

pub fn description_label(report: &Report) -> String {
    match report.description.as_deref() {
        Some(description) if !description.trim().is_empty() => description.to_string(),
        _ => MSG_NO_DESCRIPTION.to_string(),
    }
}

pub fn photo_url(report: &Report) -> String {
    report
        .photo
        .clone()
        .unwrap_or_else(|| PLACEHOLDER_PHOTO.to_string())
}

/// Assigned teams are shown under one public label
pub fn assigned_label(report: &Report) -> Option<String> {
    report
        .assigned_to
        .as_ref()
        .map(|_| ASSIGNED_TEAM_LABEL.to_string())
}
