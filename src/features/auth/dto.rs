use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::model::{IdentityProfile, Session};

/// Credential posted by the Google Identity Services widget
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GoogleSignInDto {
    #[validate(length(min = 1, message = "Credential is required"))]
    pub credential: String,
}

/// DTO returned at sign-in; `token` is the bearer for later requests
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponseDto {
    pub token: String,
    pub profile: IdentityProfile,
    pub is_admin: bool,
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for SessionResponseDto {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            profile: session.profile,
            is_admin: session.is_admin,
            expires_at: session.expires_at,
        }
    }
}

/// DTO for /auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub profile: IdentityProfile,
    pub is_admin: bool,
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for MeResponseDto {
    fn from(session: Session) -> Self {
        Self {
            profile: session.profile,
            is_admin: session.is_admin,
            expires_at: session.expires_at,
        }
    }
}
