use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dto as auth_dto, handler as auth_handler, model as auth_model};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, lifecycle as reports_lifecycle,
    models as reports_models,
};
use crate::features::submissions::{
    dtos as submissions_dtos, handlers as submissions_handlers, models as submissions_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handler::sign_in_with_google,
        auth_handler::sign_out,
        auth_handler::get_me,
        // Reports (public reads, admin status changes)
        reports_handlers::list_reports,
        reports_handlers::list_buckets,
        reports_handlers::map_view,
        reports_handlers::get_report,
        reports_handlers::update_report_status,
        // Submissions
        submissions_handlers::submit_report,
        submissions_handlers::create_draft,
        submissions_handlers::get_draft,
        submissions_handlers::update_draft,
        submissions_handlers::upload_draft_photo,
        submissions_handlers::clear_draft_photo,
        submissions_handlers::locate_draft,
        submissions_handlers::submit_draft,
        submissions_handlers::discard_draft,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth_model::IdentityProfile,
            auth_dto::GoogleSignInDto,
            auth_dto::SessionResponseDto,
            auth_dto::MeResponseDto,
            ApiResponse<auth_dto::SessionResponseDto>,
            ApiResponse<auth_dto::MeResponseDto>,
            // Reports
            reports_models::Report,
            reports_models::ReportCategory,
            reports_models::ReportStatus,
            reports_models::ReportLocation,
            reports_lifecycle::TimelineStage,
            reports_lifecycle::StatusUpdate,
            reports_dtos::CategoryDisplayDto,
            reports_dtos::StatusBadgeDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReportBucketDto,
            reports_dtos::ReportBucketsDto,
            reports_dtos::ReportDetailResponseDto,
            reports_dtos::MapMarkerDto,
            reports_dtos::MapSelectionDto,
            reports_dtos::MapViewDto,
            reports_dtos::UpdateReportStatusDto,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<reports_dtos::ReportBucketsDto>,
            ApiResponse<reports_dtos::ReportDetailResponseDto>,
            ApiResponse<reports_dtos::MapViewDto>,
            // Submissions
            submissions_models::ReportDraft,
            submissions_models::DraftLocation,
            submissions_models::PhotoState,
            submissions_dtos::SubmitReportResponseDto,
            submissions_dtos::DraftResponseDto,
            submissions_dtos::UpdateDraftDto,
            submissions_dtos::UploadPhotoDto,
            ApiResponse<submissions_dtos::SubmitReportResponseDto>,
            ApiResponse<submissions_dtos::DraftResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Google sign-in and sessions"),
        (name = "reports", description = "Browsing reports and changing their status"),
        (name = "submissions", description = "Drafting and submitting new reports"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Urban Fix API",
        version = "0.1.0",
        description = "API documentation for Urban Fix civic issue reporting",
    )
)]
pub struct ApiDoc;

/// Adds the session bearer token security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("opaque")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
