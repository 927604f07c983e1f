mod report;
mod report_category;
mod report_location;
mod report_status;

pub use report::{NewReport, Report};
pub use report_category::{CategoryDisplay, ReportCategory};
pub use report_location::{check_coordinates, ReportLocation};
pub use report_status::{ReportStatus, StatusBadge};
