use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ReportCategory, ReportLocation, ReportStatus};
use crate::core::error::{AppError, Result};

/// A single civic issue report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub category: ReportCategory,
    pub description: Option<String>,
    /// URL or embedded `data:` reference
    pub photo: Option<String>,
    pub location: ReportLocation,
    pub status: ReportStatus,
    pub timestamp: DateTime<Utc>,
    /// Last status change; absent if the report never left its initial state
    pub updated_at: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
}

impl Report {
    pub fn check_invariants(&self) -> Result<()> {
        self.location.check_range()?;
        if let Some(updated_at) = self.updated_at {
            if updated_at < self.timestamp {
                return Err(AppError::Validation(format!(
                    "Report {} was updated before it was submitted",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// Data for creating a new report
#[derive(Debug, Clone)]
pub struct NewReport {
    pub category: ReportCategory,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub location: ReportLocation,
    pub timestamp: DateTime<Utc>,
}
