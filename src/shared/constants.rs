/// Maximum length of a report description
pub const MAX_DESCRIPTION_LEN: u64 = 2000;

/// Where the frontend lands after a successful submission
pub const REPORTS_PATH: &str = "/reports";

/// Image shown when a report has no photo
pub const PLACEHOLDER_PHOTO: &str = "/placeholder.svg";

/// Display name for any assigned handling team
pub const ASSIGNED_TEAM_LABEL: &str = "City Maintenance Team";

/// Address recorded when the location comes from the device position
pub const CURRENT_LOCATION_ADDRESS: &str = "Current location";

// =============================================================================
// USER-FACING MESSAGES
// =============================================================================

pub const MSG_REPORT_SUBMITTED: &str = "Your report has been successfully submitted.";

pub const MSG_LOCATION_DETECTED: &str = "Your current location has been added to the report.";

pub const MSG_LOCATION_UNAVAILABLE: &str =
    "Could not detect your location. Please enter it manually.";

pub const MSG_LOCATION_REQUIRED: &str = "Please enter an address or use your current location";

pub const MSG_NO_ADDRESS: &str = "No address provided";

pub const MSG_NO_DESCRIPTION: &str = "No description provided.";
