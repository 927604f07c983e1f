use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};

/// Where a report was filed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ReportLocation {
    /// `(0, 0)` stands for "no coordinates were captured"
    pub fn has_coordinates(&self) -> bool {
        !(self.lat == 0.0 && self.lng == 0.0)
    }

    pub fn has_address(&self) -> bool {
        self.address
            .as_deref()
            .is_some_and(|address| !address.trim().is_empty())
    }

    pub fn check_range(&self) -> Result<()> {
        check_coordinates(self.lat, self.lng)
    }
}

pub fn check_coordinates(lat: f64, lng: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::Validation(format!(
            "Latitude {} is outside [-90, 90]",
            lat
        )));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(AppError::Validation(format!(
            "Longitude {} is outside [-180, 180]",
            lng
        )));
    }
    Ok(())
}
