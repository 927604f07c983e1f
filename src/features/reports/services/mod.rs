mod presentation_service;
mod report_service;

pub use presentation_service::PresentationService;
pub use report_service::ReportService;
