use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::identity::IdentityProvider;
use crate::features::auth::model::{ProfileDocument, Session};
use crate::features::auth::profile_store::ProfileStore;
use crate::features::auth::session_store::SessionStore;

/// Runs after a resident's last live session is closed
#[async_trait]
pub trait SignOutHook: Send + Sync {
    async fn signed_out(&self, email: &str);
}

pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    sessions: Arc<SessionStore>,
    sign_out_hooks: Vec<Arc<dyn SignOutHook>>,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            identity,
            profiles,
            sessions,
            sign_out_hooks: Vec::new(),
        }
    }

    pub fn on_sign_out(mut self, hook: Arc<dyn SignOutHook>) -> Self {
        self.sign_out_hooks.push(hook);
        self
    }

    /// Verify the provider credential and open a session
    ///
    /// The profile document upsert is best-effort and never blocks sign-in.
    pub async fn sign_in(&self, credential: &str) -> Result<Session> {
        let profile = self.identity.verify(credential).await.inspect_err(|e| {
            tracing::warn!("Sign-in rejected: {}", e);
        })?;

        let document = ProfileDocument::from_profile(&profile, Utc::now());
        if let Err(e) = self.profiles.upsert(&profile.email, document).await {
            tracing::warn!("Failed to save profile for {}: {}", profile.email, e);
        }

        let session = self.sessions.create(profile).await;

        tracing::info!(
            "Signed in {} (admin: {})",
            session.profile.email,
            session.is_admin
        );
        Ok(session)
    }

    pub async fn sign_out(&self, session: &Session) {
        if !self.sessions.remove(&session.token).await {
            return;
        }
        tracing::info!("Signed out {}", session.profile.email);

        let email = &session.profile.email;
        if self.sessions.has_session_for(email).await {
            return;
        }
        for hook in &self.sign_out_hooks {
            hook.signed_out(email).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::features::auth::profile_store::InMemoryProfileStore;
    use crate::shared::test_helpers::StubIdentityProvider;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingHook(Mutex<Vec<String>>);

    #[async_trait]
    impl SignOutHook for RecordingHook {
        async fn signed_out(&self, email: &str) {
            self.0.lock().await.push(email.to_string());
        }
    }

    fn service() -> (AuthService, Arc<InMemoryProfileStore>, Arc<SessionStore>) {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let sessions = Arc::new(SessionStore::new(Duration::from_secs(60), Vec::new()));
        let service = AuthService::new(
            Arc::new(StubIdentityProvider),
            profiles.clone(),
            sessions.clone(),
        );
        (service, profiles, sessions)
    }

    #[tokio::test]
    async fn test_sign_in_saves_profile_and_opens_session() {
        let (service, profiles, sessions) = service();

        let session = service.sign_in("valid").await.unwrap();

        assert!(sessions.resolve(&session.token).await.is_some());
        let document = profiles.get("resident@example.com").await.unwrap();
        assert_eq!(document.subject, "sub-resident@example.com");
    }

    #[tokio::test]
    async fn test_failed_sign_in_opens_nothing() {
        let (service, profiles, _) = service();

        let result = service.sign_in("forged").await;
        assert!(matches!(result, Err(AppError::Auth(_))));
        assert!(profiles.get("resident@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_sign_out_removes_session() {
        let (service, _, sessions) = service();
        let session = service.sign_in("valid").await.unwrap();

        service.sign_out(&session).await;
        assert!(sessions.resolve(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn test_sign_out_hooks_wait_for_last_session() {
        let (service, _, _) = service();
        let hook = Arc::new(RecordingHook::default());
        let service = service.on_sign_out(hook.clone());

        let first = service.sign_in("valid").await.unwrap();
        let second = service.sign_in("valid").await.unwrap();

        service.sign_out(&first).await;
        assert!(hook.0.lock().await.is_empty());

        service.sign_out(&second).await;
        service.sign_out(&second).await;
        assert_eq!(*hook.0.lock().await, vec!["resident@example.com".to_string()]);
    }
}
