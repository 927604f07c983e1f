#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::features::auth::identity::IdentityProvider;
#[cfg(test)]
use crate::features::auth::model::{IdentityProfile, Session};

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub const TEST_RESIDENT_EMAIL: &str = "resident@example.com";

#[cfg(test)]
pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";

#[cfg(test)]
fn create_session(email: &str, is_admin: bool) -> Session {
    let now = chrono::Utc::now();
    Session {
        token: format!("test-session-{}", email),
        profile: IdentityProfile {
            subject: format!("sub-{}", email),
            name: "Test Resident".to_string(),
            email: email.to_string(),
            picture: None,
        },
        created_at: now,
        expires_at: now + chrono::Duration::hours(1),
        is_admin,
    }
}

#[cfg(test)]
pub fn create_resident_session() -> Session {
    create_session(TEST_RESIDENT_EMAIL, false)
}

#[cfg(test)]
pub fn create_admin_session() -> Session {
    create_session(TEST_ADMIN_EMAIL, true)
}

#[cfg(test)]
async fn inject_resident_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_resident_session());
    next.run(request).await
}

#[cfg(test)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_session());
    next.run(request).await
}

#[cfg(test)]
pub fn with_resident_session(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_resident_middleware))
}

#[cfg(test)]
pub fn with_admin_session(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

/// Identity provider that accepts only the credential "valid"
#[cfg(test)]
pub struct StubIdentityProvider;

#[cfg(test)]
#[async_trait::async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn verify(&self, credential: &str) -> Result<IdentityProfile> {
        if credential != "valid" {
            return Err(AppError::Auth("Invalid credential".to_string()));
        }
        Ok(IdentityProfile {
            subject: format!("sub-{}", TEST_RESIDENT_EMAIL),
            name: "Test Resident".to_string(),
            email: TEST_RESIDENT_EMAIL.to_string(),
            picture: None,
        })
    }
}
