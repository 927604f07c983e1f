//! Report storage port and its in-memory implementation.
//!
//! The in-memory repository holds the session's canonical snapshot of reports,
//! seeded from `data/mock_reports.json`. Reads preserve insertion order.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::core::error::{AppError, Result};
use crate::features::reports::lifecycle::check_transition;
use crate::features::reports::models::{
    NewReport, Report, ReportCategory, ReportLocation, ReportStatus,
};

const SEED_REPORTS: &str = include_str!("../../../data/mock_reports.json");

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Every report, in insertion order
    async fn all(&self) -> Result<Vec<Report>>;

    async fn by_id(&self, id: &str) -> Result<Report>;

    /// Reports with exactly `status`, in `all()` order; `None` is `all()`
    async fn by_status(&self, status: Option<ReportStatus>) -> Result<Vec<Report>> {
        let reports = self.all().await?;
        Ok(match status {
            Some(status) => reports.into_iter().filter(|r| r.status == status).collect(),
            None => reports,
        })
    }

    /// Persist a new report in the Pending state
    async fn insert(&self, data: NewReport) -> Result<Report>;

    /// Record a status change made by the administrative backend
    ///
    /// The forward-only rule is checked against the stored status in the same
    /// critical section as the write; backward or same-status moves are `Conflict`.
    async fn set_status(
        &self,
        id: &str,
        status: ReportStatus,
        changed_at: DateTime<Utc>,
        assigned_to: Option<String>,
    ) -> Result<Report>;
}

/// Seed record as stored on disk; status is still raw text
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    id: String,
    category: ReportCategory,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    photo: Option<String>,
    location: ReportLocation,
    status: String,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    assigned_to: Option<String>,
}

impl TryFrom<RawReport> for Report {
    type Error = AppError;

    fn try_from(raw: RawReport) -> Result<Self> {
        let report = Report {
            status: raw.status.parse()?,
            id: raw.id,
            category: raw.category,
            description: raw.description,
            photo: raw.photo,
            location: raw.location,
            timestamp: raw.timestamp,
            updated_at: raw.updated_at,
            assigned_to: raw.assigned_to,
        };
        report.check_invariants()?;
        Ok(report)
    }
}

pub struct InMemoryReportRepository {
    reports: RwLock<Vec<Report>>,
    sequence: AtomicU64,
}

impl InMemoryReportRepository {
    pub fn new(reports: Vec<Report>) -> Self {
        let sequence = AtomicU64::new(reports.len() as u64);
        Self {
            reports: RwLock::new(reports),
            sequence,
        }
    }

    /// Repository loaded with the bundled mock reports
    pub fn seeded() -> Result<Self> {
        Self::from_seed(SEED_REPORTS)
    }

    pub fn from_seed(json: &str) -> Result<Self> {
        let raw: Vec<RawReport> = serde_json::from_str(json)
            .map_err(|e| AppError::Internal(format!("Malformed report seed data: {}", e)))?;

        let reports = raw
            .into_iter()
            .map(Report::try_from)
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Loaded {} seed reports", reports.len());
        Ok(Self::new(reports))
    }

    /// Reference number in format: RPT-YYYY-NNNNNNN
    fn next_reference_number(&self, at: DateTime<Utc>) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        format!("RPT-{}-{:07}", at.year(), seq)
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn all(&self) -> Result<Vec<Report>> {
        Ok(self.reports.read().await.clone())
    }

    async fn by_id(&self, id: &str) -> Result<Report> {
        self.reports
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    async fn insert(&self, data: NewReport) -> Result<Report> {
        let report = Report {
            id: self.next_reference_number(data.timestamp),
            category: data.category,
            description: data.description,
            photo: data.photo,
            location: data.location,
            status: ReportStatus::Pending,
            timestamp: data.timestamp,
            updated_at: None,
            assigned_to: None,
        };
        report.check_invariants()?;

        self.reports.write().await.push(report.clone());
        tracing::debug!("Inserted report {}", report.id);
        Ok(report)
    }

    async fn set_status(
        &self,
        id: &str,
        status: ReportStatus,
        changed_at: DateTime<Utc>,
        assigned_to: Option<String>,
    ) -> Result<Report> {
        let mut reports = self.reports.write().await;
        let report = reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        check_transition(report.status, status)?;
        if changed_at < report.timestamp {
            return Err(AppError::Validation(format!(
                "Status change for {} predates its submission",
                id
            )));
        }

        report.status = status;
        report.updated_at = Some(changed_at);
        if assigned_to.is_some() {
            report.assigned_to = assigned_to;
        }

        Ok(report.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_seed_loads_in_insertion_order() {
        let repo = InMemoryReportRepository::seeded().unwrap();
        let all = repo.all().await.unwrap();

        assert!(!all.is_empty());
        assert_eq!(all[0].id, "RPT-2024-0000001");
        let ids: HashSet<_> = all.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids.len(), all.len(), "ids must be unique");
    }

    #[tokio::test]
    async fn test_by_status_partitions_all() {
        let repo = InMemoryReportRepository::seeded().unwrap();
        let all = repo.all().await.unwrap();

        let mut seen = Vec::new();
        for status in ReportStatus::ALL {
            let subset = repo.by_status(Some(status)).await.unwrap();
            assert!(subset.iter().all(|r| r.status == status));
            seen.extend(subset.into_iter().map(|r| r.id));
        }

        let distinct: HashSet<_> = seen.iter().cloned().collect();
        assert_eq!(distinct.len(), seen.len(), "buckets must be disjoint");
        assert_eq!(seen.len(), all.len(), "buckets must cover all()");

        assert_eq!(repo.by_status(None).await.unwrap(), all);
    }

    #[tokio::test]
    async fn test_by_status_preserves_order() {
        let repo = InMemoryReportRepository::seeded().unwrap();
        let all_ids: Vec<_> = repo.all().await.unwrap().into_iter().map(|r| r.id).collect();
        let pending_ids: Vec<_> = repo
            .by_status(Some(ReportStatus::Pending))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();

        let positions: Vec<_> = pending_ids
            .iter()
            .map(|id| all_ids.iter().position(|a| a == id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_by_id_nonexistent_is_not_found() {
        let repo = InMemoryReportRepository::seeded().unwrap();
        assert!(matches!(
            repo.by_id("nonexistent").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_assigns_next_reference_number() {
        let repo = InMemoryReportRepository::from_seed("[]").unwrap();
        let timestamp = Utc::now();
        let report = repo
            .insert(NewReport {
                category: ReportCategory::Leak,
                description: None,
                photo: None,
                location: ReportLocation {
                    lat: 1.0,
                    lng: 2.0,
                    address: None,
                },
                timestamp,
            })
            .await
            .unwrap();

        assert_eq!(
            report.id,
            format!("RPT-{}-{:07}", timestamp.year(), 1)
        );
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(repo.by_id(&report.id).await.unwrap(), report);
    }

    #[test]
    fn test_seed_with_unknown_status_fails_loudly() {
        let json = r#"[{
            "id": "x",
            "category": "Waste",
            "location": { "lat": 0.0, "lng": 0.0 },
            "status": "Archived",
            "timestamp": "2024-01-01T00:00:00Z"
        }]"#;

        match InMemoryReportRepository::from_seed(json) {
            Err(AppError::InvalidStatusKind(kind)) => assert_eq!(kind, "Archived"),
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("seed with unknown status must not load"),
        }
    }

    #[test]
    fn test_seed_with_update_before_submission_is_rejected() {
        let json = r#"[{
            "id": "x",
            "category": "Leak",
            "location": { "lat": 1.0, "lng": 1.0 },
            "status": "Fixed",
            "timestamp": "2024-01-02T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }]"#;

        assert!(matches!(
            InMemoryReportRepository::from_seed(json),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_set_status_records_change_time() {
        let repo = InMemoryReportRepository::seeded().unwrap();
        let changed_at = Utc::now();
        let updated = repo
            .set_status(
                "RPT-2024-0000001",
                ReportStatus::InProgress,
                changed_at,
                Some("sanitation-team-1".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(updated.status, ReportStatus::InProgress);
        assert_eq!(updated.updated_at, Some(changed_at));
        assert_eq!(updated.assigned_to.as_deref(), Some("sanitation-team-1"));
    }

    #[tokio::test]
    async fn test_set_status_rejects_backward_move_against_stored_status() {
        let repo = InMemoryReportRepository::seeded().unwrap();
        repo.set_status("RPT-2024-0000001", ReportStatus::Fixed, Utc::now(), None)
            .await
            .unwrap();

        let result = repo
            .set_status(
                "RPT-2024-0000001",
                ReportStatus::InProgress,
                Utc::now(),
                None,
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(
            repo.by_id("RPT-2024-0000001").await.unwrap().status,
            ReportStatus::Fixed
        );
    }
}
