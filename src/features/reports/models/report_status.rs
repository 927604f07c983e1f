use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::core::error::AppError;

/// Report status, ordered Pending → In Progress → Fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ReportStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Fixed,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 3] = [
        ReportStatus::Pending,
        ReportStatus::InProgress,
        ReportStatus::Fixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Fixed => "Fixed",
        }
    }

    /// Badge styling for list and detail views
    pub fn badge(&self) -> StatusBadge {
        match self {
            ReportStatus::Pending => StatusBadge {
                class: "status-pending",
                icon: "clock",
            },
            ReportStatus::InProgress => StatusBadge {
                class: "status-in-progress",
                icon: "loader",
            },
            ReportStatus::Fixed => StatusBadge {
                class: "status-fixed",
                icon: "check-circle",
            },
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::InvalidStatusKind(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub class: &'static str,
    pub icon: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip_through_from_str() {
        for status in ReportStatus::ALL {
            assert_eq!(status.as_str().parse::<ReportStatus>().unwrap(), status);
        }
        assert_eq!(
            serde_json::to_string(&ReportStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
    }

    #[test]
    fn test_unknown_status_is_invalid_status_kind() {
        for raw in ["pending", "InProgress", "Resolved", ""] {
            match raw.parse::<ReportStatus>() {
                Err(AppError::InvalidStatusKind(kind)) => assert_eq!(kind, raw),
                other => panic!("expected InvalidStatusKind for {:?}, got {:?}", raw, other),
            }
        }
    }
}
