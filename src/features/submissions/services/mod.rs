mod draft_service;
mod submission_service;

pub use draft_service::{DraftPatch, DraftService, DraftSnapshot};
pub use submission_service::SubmissionService;
