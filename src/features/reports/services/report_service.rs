use chrono::Utc;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::reports::dtos::UpdateReportStatusDto;
use crate::features::reports::models::{Report, ReportStatus};
use crate::features::reports::repository::ReportRepository;

/// Service for report reads and administrative status changes
pub struct ReportService {
    repository: Arc<dyn ReportRepository>,
}

impl ReportService {
    pub fn new(repository: Arc<dyn ReportRepository>) -> Self {
        Self { repository }
    }

    /// List reports, optionally narrowed to one status
    pub async fn list(&self, status: Option<ReportStatus>) -> Result<Vec<Report>> {
        self.repository.by_status(status).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Report> {
        self.repository.by_id(id).await
    }

    /// Move a report forward along Pending → In Progress → Fixed
    ///
    /// Backward and same-status transitions are rejected with `Conflict`. The
    /// rule is enforced by the repository against the stored status, so two
    /// concurrent changes cannot move a report backward.
    pub async fn update_status(
        &self,
        id: &str,
        dto: &UpdateReportStatusDto,
        actor: &str,
    ) -> Result<Report> {
        let report = self
            .repository
            .set_status(id, dto.status, Utc::now(), dto.assigned_to.clone())
            .await
            .inspect_err(|e| {
                tracing::warn!("Rejected status change for {} by {}: {}", id, actor, e);
            })?;

        tracing::info!("Report {} moved to {} by {}", id, report.status, actor);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::features::reports::models::NewReport;
    use crate::features::reports::repository::InMemoryReportRepository;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::time::Duration;

    /// Holds back In Progress writes so a later Fixed write lands first
    struct SlowInProgressWrites(InMemoryReportRepository);

    #[async_trait]
    impl ReportRepository for SlowInProgressWrites {
        async fn all(&self) -> Result<Vec<Report>> {
            self.0.all().await
        }

        async fn by_id(&self, id: &str) -> Result<Report> {
            self.0.by_id(id).await
        }

        async fn insert(&self, data: NewReport) -> Result<Report> {
            self.0.insert(data).await
        }

        async fn set_status(
            &self,
            id: &str,
            status: ReportStatus,
            changed_at: DateTime<Utc>,
            assigned_to: Option<String>,
        ) -> Result<Report> {
            if status == ReportStatus::InProgress {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            self.0.set_status(id, status, changed_at, assigned_to).await
        }
    }

    fn service() -> ReportService {
        ReportService::new(Arc::new(InMemoryReportRepository::seeded().unwrap()))
    }

    #[tokio::test]
    async fn test_update_status_moves_forward() {
        let service = service();
        let dto = UpdateReportStatusDto {
            status: ReportStatus::Fixed,
            assigned_to: None,
        };

        let report = service
            .update_status("RPT-2024-0000002", &dto, "admin@example.com")
            .await
            .unwrap();

        assert_eq!(report.status, ReportStatus::Fixed);
        assert!(report.updated_at.unwrap() >= report.timestamp);
        assert_eq!(report.assigned_to.as_deref(), Some("roads-team-3"));
    }

    #[tokio::test]
    async fn test_update_status_rejects_backward_transition() {
        let service = service();
        let dto = UpdateReportStatusDto {
            status: ReportStatus::Pending,
            assigned_to: None,
        };

        let result = service
            .update_status("RPT-2024-0000003", &dto, "admin@example.com")
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let unchanged = service.get_by_id("RPT-2024-0000003").await.unwrap();
        assert_eq!(unchanged.status, ReportStatus::Fixed);
    }

    #[tokio::test]
    async fn test_update_status_unknown_report() {
        let dto = UpdateReportStatusDto {
            status: ReportStatus::Fixed,
            assigned_to: None,
        };
        let result = service()
            .update_status("nonexistent", &dto, "admin@example.com")
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_changes_never_move_backward() {
        let service = ReportService::new(Arc::new(SlowInProgressWrites(
            InMemoryReportRepository::seeded().unwrap(),
        )));
        let to_in_progress = UpdateReportStatusDto {
            status: ReportStatus::InProgress,
            assigned_to: None,
        };
        let to_fixed = UpdateReportStatusDto {
            status: ReportStatus::Fixed,
            assigned_to: None,
        };

        let (in_progress, fixed) = tokio::join!(
            service.update_status("RPT-2024-0000001", &to_in_progress, "admin-a@example.com"),
            service.update_status("RPT-2024-0000001", &to_fixed, "admin-b@example.com"),
        );

        assert_eq!(fixed.unwrap().status, ReportStatus::Fixed);
        assert!(matches!(in_progress, Err(AppError::Conflict(_))));
        let stored = service.get_by_id("RPT-2024-0000001").await.unwrap();
        assert_eq!(stored.status, ReportStatus::Fixed);
    }
}
