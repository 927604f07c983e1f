//! Status lifecycle: ordering over statuses and the status-update timeline
//! shown on the report detail page.
//!
//! The timeline is derived from the report's current fields on every call.
//! It is not an audit log: a report stored directly as `Fixed` still yields
//! all three entries, with the fallback dates collapsing onto `timestamp`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{Report, ReportStatus};

impl ReportStatus {
    /// Display ordering: Pending=0, In Progress=1, Fixed=2
    pub fn rank(&self) -> u8 {
        match self {
            ReportStatus::Pending => 0,
            ReportStatus::InProgress => 1,
            ReportStatus::Fixed => 2,
        }
    }
}

/// Timeline entry label; `Submitted` stands in for the initial Pending state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TimelineStage {
    Submitted,
    #[serde(rename = "In Progress")]
    InProgress,
    Fixed,
}

#[cfg(test)]
impl TimelineStage {
    pub fn rank(&self) -> u8 {
        match self {
            TimelineStage::Submitted => ReportStatus::Pending.rank(),
            TimelineStage::InProgress => ReportStatus::InProgress.rank(),
            TimelineStage::Fixed => ReportStatus::Fixed.rank(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdate {
    pub status: TimelineStage,
    pub date: DateTime<Utc>,
    pub description: String,
}

pub const SUBMITTED_DESCRIPTION: &str = "Report has been submitted successfully.";
pub const IN_PROGRESS_DESCRIPTION: &str = "Your report has been assigned to the maintenance team.";
pub const FIXED_DESCRIPTION: &str = "The issue has been resolved. Thank you for your report.";

pub fn timeline_for(report: &Report) -> Vec<StatusUpdate> {
    let rank = report.status.rank();
    let changed_at = report.updated_at.unwrap_or(report.timestamp);

    let mut timeline = vec![StatusUpdate {
        status: TimelineStage::Submitted,
        date: report.timestamp,
        description: SUBMITTED_DESCRIPTION.to_string(),
    }];

    if rank >= ReportStatus::InProgress.rank() {
        timeline.push(StatusUpdate {
            status: TimelineStage::InProgress,
            date: changed_at,
            description: IN_PROGRESS_DESCRIPTION.to_string(),
        });
    }

    if rank == ReportStatus::Fixed.rank() {
        timeline.push(StatusUpdate {
            status: TimelineStage::Fixed,
            date: changed_at,
            description: FIXED_DESCRIPTION.to_string(),
        });
    }

    timeline
}

/// Write-boundary rule for status changes: forward only, skips allowed
pub fn check_transition(from: ReportStatus, to: ReportStatus) -> Result<()> {
    if to.rank() <= from.rank() {
        return Err(AppError::Conflict(format!(
            "Cannot move a report from {} to {}",
            from, to
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{ReportCategory, ReportLocation};
    use chrono::{Duration, TimeZone};

    fn report(status: ReportStatus, updated_at: Option<DateTime<Utc>>) -> Report {
        Report {
            id: "RPT-2024-0000042".to_string(),
            category: ReportCategory::Pothole,
            description: None,
            photo: None,
            location: ReportLocation {
                lat: 40.7128,
                lng: -74.006,
                address: Some("5th Ave".to_string()),
            },
            status,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            updated_at,
            assigned_to: None,
        }
    }

    #[test]
    fn test_timeline_length_follows_rank() {
        for (status, expected) in [
            (ReportStatus::Pending, 1),
            (ReportStatus::InProgress, 2),
            (ReportStatus::Fixed, 3),
        ] {
            let timeline = timeline_for(&report(status, None));
            assert_eq!(timeline.len(), expected, "status {}", status);
            assert!(timeline
                .windows(2)
                .all(|pair| pair[0].status.rank() <= pair[1].status.rank()));
        }
    }

    #[test]
    fn test_fixed_without_updated_at_falls_back_to_timestamp() {
        let r = report(ReportStatus::Fixed, None);
        let timeline = timeline_for(&r);

        assert_eq!(timeline[0].status, TimelineStage::Submitted);
        assert_eq!(timeline[1].status, TimelineStage::InProgress);
        assert_eq!(timeline[2].status, TimelineStage::Fixed);
        assert!(timeline.iter().all(|entry| entry.date == r.timestamp));
        assert_eq!(timeline[2].description, FIXED_DESCRIPTION);
    }

    #[test]
    fn test_in_progress_uses_updated_at() {
        let r = report(ReportStatus::InProgress, None);
        let updated = r.timestamp + Duration::days(2);
        let r = Report {
            updated_at: Some(updated),
            ..r
        };

        let timeline = timeline_for(&r);
        assert_eq!(timeline[0].date, r.timestamp);
        assert_eq!(timeline[1].date, updated);
        assert_eq!(timeline[1].description, IN_PROGRESS_DESCRIPTION);
    }

    #[test]
    fn test_check_transition_is_forward_only() {
        assert!(check_transition(ReportStatus::Pending, ReportStatus::InProgress).is_ok());
        assert!(check_transition(ReportStatus::Pending, ReportStatus::Fixed).is_ok());
        assert!(check_transition(ReportStatus::InProgress, ReportStatus::Fixed).is_ok());

        assert!(matches!(
            check_transition(ReportStatus::Fixed, ReportStatus::Pending),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            check_transition(ReportStatus::InProgress, ReportStatus::InProgress),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_rank_matches_declaration_order() {
        let ranks: Vec<u8> = ReportStatus::ALL.iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
    }
}
