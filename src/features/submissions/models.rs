use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::reports::models::ReportCategory;
use crate::shared::constants::MAX_DESCRIPTION_LEN;

/// Location fields as entered on the form; any of them may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DraftLocation {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: Option<String>,
}

/// A report being assembled by a resident
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReportDraft {
    /// Defaults to the first category when unset
    pub category: Option<ReportCategory>,
    #[validate(length(max = MAX_DESCRIPTION_LEN))]
    pub description: Option<String>,
    /// URL or embedded `data:` reference
    pub photo: Option<String>,
    #[serde(default)]
    pub location: DraftLocation,
}

/// Photo acquisition for a draft
///
/// `Empty → Uploading → Ready | Failed`; clearing returns to `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PhotoState {
    Empty,
    Uploading { generation: u64 },
    Ready { reference: String, digest: String },
    Failed { reason: String },
}

impl PhotoState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, PhotoState::Uploading { .. })
    }
}
