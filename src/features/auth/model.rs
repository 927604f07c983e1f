use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Decoded identity returned by the identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IdentityProfile {
    /// Provider-stable subject identifier
    pub subject: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// A signed-in resident or administrator
///
/// Created at sign-in, removed at sign-out; handlers receive it explicitly
/// through the `Session` extractor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Session {
    /// Opaque bearer token identifying this session
    pub token: String,
    pub profile: IdentityProfile,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_admin: bool,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// User profile document kept in the document store, keyed by email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub subject: String,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
    pub last_signed_in_at: DateTime<Utc>,
}

impl ProfileDocument {
    pub fn from_profile(profile: &IdentityProfile, signed_in_at: DateTime<Utc>) -> Self {
        Self {
            subject: profile.subject.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            picture: profile.picture.clone(),
            last_signed_in_at: signed_in_at,
        }
    }
}
