use chrono::Utc;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{check_coordinates, NewReport, Report, ReportLocation};
use crate::features::reports::repository::ReportRepository;
use crate::features::submissions::models::ReportDraft;
use crate::modules::geolocation::Geocoder;
use crate::shared::constants::{MAX_DESCRIPTION_LEN, MSG_LOCATION_REQUIRED};

/// Turns a completed draft into a new Pending report
pub struct SubmissionService {
    repository: Arc<dyn ReportRepository>,
    geocoder: Option<Arc<dyn Geocoder>>,
}

impl SubmissionService {
    pub fn new(repository: Arc<dyn ReportRepository>, geocoder: Option<Arc<dyn Geocoder>>) -> Self {
        Self {
            repository,
            geocoder,
        }
    }

    /// Validate `draft` and persist it as a Pending report
    ///
    /// Nothing is stored when validation fails.
    pub async fn submit(&self, draft: &ReportDraft) -> Result<Report> {
        let category = draft.category.unwrap_or_default();
        let description = normalize_description(draft.description.as_deref())?;
        let mut location = resolve_location(draft)?;

        if !location.has_coordinates() {
            if let Some(address) = location.address.as_deref() {
                if let Some((lat, lng)) = self.lookup(address).await {
                    location.lat = lat;
                    location.lng = lng;
                }
            }
        }

        let photo = draft
            .photo
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let report = self
            .repository
            .insert(NewReport {
                category,
                description,
                photo,
                location,
                timestamp: Utc::now(),
            })
            .await?;

        tracing::info!(
            "Report {} submitted ({}, photo: {})",
            report.id,
            report.category,
            report.photo.is_some()
        );

        Ok(report)
    }

    /// Best-effort geocoding; failures leave the coordinates unset
    async fn lookup(&self, address: &str) -> Option<(f64, f64)> {
        let geocoder = self.geocoder.as_ref()?;
        match geocoder.geocode(address).await {
            Ok(Some((lat, lng))) if check_coordinates(lat, lng).is_ok() => Some((lat, lng)),
            Ok(_) => {
                tracing::debug!("No coordinates found for address: {}", address);
                None
            }
            Err(e) => {
                tracing::warn!("Geocoding failed for {}: {}", address, e);
                None
            }
        }
    }
}

fn normalize_description(raw: Option<&str>) -> Result<Option<String>> {
    let Some(description) = raw.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };

    if description.chars().count() as u64 > MAX_DESCRIPTION_LEN {
        return Err(AppError::Validation(format!(
            "Description must be at most {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }

    Ok(Some(description.to_string()))
}

/// Requires an address or non-origin coordinates; `(0, 0)` means "not captured"
fn resolve_location(draft: &ReportDraft) -> Result<ReportLocation> {
    let (lat, lng) = match (draft.location.lat, draft.location.lng) {
        (Some(lat), Some(lng)) => (lat, lng),
        (None, None) => (0.0, 0.0),
        _ => {
            return Err(AppError::Validation(
                "Latitude and longitude must be provided together".to_string(),
            ))
        }
    };
    check_coordinates(lat, lng)?;

    let address = draft
        .location
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    let location = ReportLocation { lat, lng, address };
    if !location.has_coordinates() && !location.has_address() {
        return Err(AppError::Validation(MSG_LOCATION_REQUIRED.to_string()));
    }

    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{ReportCategory, ReportStatus};
    use crate::features::reports::repository::InMemoryReportRepository;
    use crate::features::submissions::models::DraftLocation;
    use async_trait::async_trait;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;

    struct FixedGeocoder(Result<Option<(f64, f64)>>);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, _address: &str) -> Result<Option<(f64, f64)>> {
            match &self.0 {
                Ok(found) => Ok(*found),
                Err(_) => Err(AppError::ExternalServiceError("down".to_string())),
            }
        }
    }

    fn setup(
        geocoder: Option<Arc<dyn Geocoder>>,
    ) -> (SubmissionService, Arc<InMemoryReportRepository>) {
        let repository = Arc::new(InMemoryReportRepository::from_seed("[]").unwrap());
        (
            SubmissionService::new(repository.clone(), geocoder),
            repository,
        )
    }

    fn draft(lat: Option<f64>, lng: Option<f64>, address: Option<&str>) -> ReportDraft {
        ReportDraft {
            category: None,
            description: None,
            photo: None,
            location: DraftLocation {
                lat,
                lng,
                address: address.map(str::to_string),
            },
        }
    }

    #[tokio::test]
    async fn test_submit_origin_without_address_is_rejected() {
        let (service, repository) = setup(None);
        let mut d = draft(Some(0.0), Some(0.0), Some(""));
        d.category = Some(ReportCategory::Pothole);

        match service.submit(&d).await {
            Err(AppError::Validation(msg)) => assert_eq!(msg, MSG_LOCATION_REQUIRED),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(repository.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_valid_draft_creates_pending_report() {
        let (service, repository) = setup(None);
        let mut d = draft(Some(40.7128), Some(-74.006), Some("5th Ave"));
        d.category = Some(ReportCategory::Waste);
        d.description = Some(Sentence(3..8).fake());

        let before = Utc::now();
        let report = service.submit(&d).await.unwrap();
        let after = Utc::now();

        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.category, ReportCategory::Waste);
        assert!(report.timestamp >= before && report.timestamp <= after);
        assert_eq!(report.updated_at, None);
        assert_eq!(repository.by_id(&report.id).await.unwrap(), report);
    }

    #[tokio::test]
    async fn test_submit_defaults_category_and_drops_blank_description() {
        let (service, _) = setup(None);
        let mut d = draft(None, None, Some("Main St"));
        d.description = Some("   ".to_string());

        let report = service.submit(&d).await.unwrap();
        assert_eq!(report.category, ReportCategory::Waste);
        assert_eq!(report.description, None);
        assert!(!report.location.has_coordinates());
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_coordinates() {
        let (service, _) = setup(None);

        let out_of_range = draft(Some(95.0), Some(0.0), None);
        assert!(matches!(
            service.submit(&out_of_range).await,
            Err(AppError::Validation(_))
        ));

        let half = draft(Some(40.0), None, Some("Main St"));
        assert!(matches!(
            service.submit(&half).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_rejects_long_description() {
        let (service, _) = setup(None);
        let mut d = draft(None, None, Some("Main St"));
        d.description = Some("x".repeat(MAX_DESCRIPTION_LEN as usize + 1));

        assert!(matches!(
            service.submit(&d).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_address_only_is_geocoded_best_effort() {
        let (service, _) = setup(Some(Arc::new(FixedGeocoder(Ok(Some((40.75, -73.98)))))));
        let report = service
            .submit(&draft(None, None, Some("Times Square")))
            .await
            .unwrap();
        assert_eq!((report.location.lat, report.location.lng), (40.75, -73.98));

        let (failing, _) = setup(Some(Arc::new(FixedGeocoder(Err(AppError::Internal(
            String::new(),
        ))))));
        let report = failing
            .submit(&draft(None, None, Some("Times Square")))
            .await
            .unwrap();
        assert!(!report.location.has_coordinates());
    }
}
