use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{IdentityProfile, Session};

/// Live sessions keyed by their opaque token
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: chrono::Duration,
    admin_emails: Vec<String>,
}

impl SessionStore {
    const FALLBACK_TTL_HOURS: i64 = 12;

    /// `admin_emails` are compared case-insensitively
    pub fn new(ttl: Duration, admin_emails: Vec<String>) -> Self {
        let ttl = chrono::Duration::from_std(ttl)
            .unwrap_or_else(|_| chrono::Duration::hours(Self::FALLBACK_TTL_HOURS));

        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            admin_emails: admin_emails
                .into_iter()
                .map(|email| email.to_lowercase())
                .collect(),
        }
    }

    /// Open a session, evicting any that already expired
    pub async fn create(&self, profile: IdentityProfile) -> Session {
        let now = Utc::now();
        let is_admin = self.admin_emails.contains(&profile.email.to_lowercase());
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            profile,
            created_at: now,
            expires_at: now + self.ttl,
            is_admin,
        };

        let mut sessions = self.sessions.write().await;
        evict_expired(&mut sessions, now);
        sessions.insert(session.token.clone(), session.clone());

        session
    }

    /// Live session for `token`; an expired one is evicted
    pub async fn resolve(&self, token: &str) -> Option<Session> {
        self.resolve_at(token, Utc::now()).await
    }

    async fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return None,
                Some(session) if !session.is_expired(now) => return Some(session.clone()),
                Some(_) => {}
            }
        }

        if self.sessions.write().await.remove(token).is_some() {
            tracing::debug!("Evicted expired session");
        }
        None
    }

    /// Returns whether a session was removed
    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Whether `email` still has a live session
    pub async fn has_session_for(&self, email: &str) -> bool {
        let now = Utc::now();
        self.sessions
            .read()
            .await
            .values()
            .any(|session| session.profile.email == email && !session.is_expired(now))
    }

    /// Drop every expired session; returns how many were dropped
    pub async fn evict_expired(&self) -> usize {
        self.evict_expired_at(Utc::now()).await
    }

    async fn evict_expired_at(&self, now: DateTime<Utc>) -> usize {
        evict_expired(&mut *self.sessions.write().await, now)
    }
}

fn evict_expired(sessions: &mut HashMap<String, Session>, now: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, session| !session.is_expired(now));
    let removed = before - sessions.len();
    if removed > 0 {
        tracing::debug!("Evicted {} expired session(s)", removed);
    }
    removed
}
