use crate::core::error::{AppError, Result};
use crate::core::extractor::JsonBody;
use crate::features::auth::dto::{GoogleSignInDto, MeResponseDto, SessionResponseDto};
use crate::features::auth::model::Session;
use crate::features::auth::service::AuthService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/auth/google",
    request_body = GoogleSignInDto,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<SessionResponseDto>),
        (status = 400, description = "Missing credential"),
        (status = 401, description = "Credential rejected by the identity provider")
    ),
    tag = "auth"
)]
pub async fn sign_in_with_google(
    State(service): State<Arc<AuthService>>,
    JsonBody(dto): JsonBody<GoogleSignInDto>,
) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let session = service.sign_in(&dto.credential).await?;
    Ok(Json(ApiResponse::success(
        Some(session.into()),
        Some("Signed in".to_string()),
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn sign_out(
    session: Session,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<()>>> {
    service.sign_out(&session).await;
    Ok(Json(ApiResponse::success(
        None,
        Some("Signed out".to_string()),
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current session retrieved successfully", body = ApiResponse<MeResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(session: Session) -> Result<Json<ApiResponse<MeResponseDto>>> {
    Ok(Json(ApiResponse::success(Some(session.into()), None, None)))
}
