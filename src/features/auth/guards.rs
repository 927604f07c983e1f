//! Authorization guards.
//!
//! Residents and administrators share one session type; administrators are
//! the emails listed in `ADMIN_EMAILS` at sign-in time.

use crate::core::error::AppError;
use crate::features::auth::model::Session;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for administrative operations such as status changes.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(session): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub Session);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !session.is_admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(session.clone()))
    }
}
