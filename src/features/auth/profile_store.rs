use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::model::ProfileDocument;
use crate::core::error::Result;

/// Document store for user profiles; only the write path is used
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert or replace the profile document keyed by `email`
    async fn upsert(&self, email: &str, document: ProfileDocument) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryProfileStore {
    documents: RwLock<HashMap<String, ProfileDocument>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn get(&self, email: &str) -> Option<ProfileDocument> {
        self.documents.read().await.get(email).cloned()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn upsert(&self, email: &str, document: ProfileDocument) -> Result<()> {
        self.documents
            .write()
            .await
            .insert(email.to_lowercase(), document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_upsert_replaces_by_email() {
        let store = InMemoryProfileStore::new();
        let mut document = ProfileDocument {
            subject: "1".to_string(),
            name: "Old Name".to_string(),
            email: "resident@example.com".to_string(),
            picture: None,
            last_signed_in_at: Utc::now(),
        };
        store
            .upsert("resident@example.com", document.clone())
            .await
            .unwrap();

        document.name = "New Name".to_string();
        store
            .upsert("Resident@Example.com", document.clone())
            .await
            .unwrap();

        assert_eq!(store.get("resident@example.com").await, Some(document));
    }
}
