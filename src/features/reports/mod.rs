pub mod dtos;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod projection;
pub mod repository;
pub mod routes;
pub mod services;

pub use repository::{InMemoryReportRepository, ReportRepository};
pub use services::{PresentationService, ReportService};
