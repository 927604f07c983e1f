//! Interactive report drafts.
//!
//! Each draft is owned by one signed-in resident. Photo upload, position
//! lookup and submission run asynchronously against the shared draft:
//!
//! - field edits are last-writer-wins;
//! - a newer photo upload supersedes an older one still in flight;
//! - submission waits for any in-flight upload to settle and is single-flight;
//! - discarding a draft cancels in-flight work so it cannot write into it.
//!
//! Photo progress is published on a `watch` channel per draft. Removing the
//! draft drops the sender, which is how waiters learn it was discarded.
//!
//! Uploads and submissions run on their own task. A caller that goes away
//! mid-request only stops waiting for the outcome; the draft still reaches a
//! settled state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::SignOutHook;
use crate::features::reports::models::{check_coordinates, Report, ReportCategory};
use crate::features::submissions::models::{PhotoState, ReportDraft};
use crate::features::submissions::services::SubmissionService;
use crate::modules::geolocation::Locator;
use crate::modules::storage::PhotoStore;
use crate::shared::constants::CURRENT_LOCATION_ADDRESS;

/// Field edits; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct DraftPatch {
    pub category: Option<ReportCategory>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub position: Option<(f64, f64)>,
}

/// Point-in-time view of a draft
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSnapshot {
    pub id: Uuid,
    pub draft: ReportDraft,
    pub photo: PhotoState,
    pub submitting: bool,
}

struct DraftEntry {
    owner: String,
    draft: ReportDraft,
    photo: watch::Sender<PhotoState>,
    photo_generation: u64,
    submitting: bool,
    created_at: DateTime<Utc>,
}

impl DraftEntry {
    fn snapshot(&self, id: Uuid) -> DraftSnapshot {
        DraftSnapshot {
            id,
            draft: self.draft.clone(),
            photo: self.photo.borrow().clone(),
            submitting: self.submitting,
        }
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.submitting {
            return Err(AppError::Conflict("Draft is being submitted".to_string()));
        }
        Ok(())
    }
}

pub struct DraftService {
    drafts: Mutex<HashMap<Uuid, DraftEntry>>,
    submissions: Arc<SubmissionService>,
    photos: Arc<dyn PhotoStore>,
    locator: Arc<dyn Locator>,
    max_age: chrono::Duration,
}

impl DraftService {
    /// Drafts older than `max_age` are dropped by [`DraftService::evict_stale`]
    pub fn new(
        submissions: Arc<SubmissionService>,
        photos: Arc<dyn PhotoStore>,
        locator: Arc<dyn Locator>,
        max_age: Duration,
    ) -> Self {
        Self {
            drafts: Mutex::new(HashMap::new()),
            submissions,
            photos,
            locator,
            max_age: chrono::Duration::from_std(max_age)
                .unwrap_or_else(|_| chrono::Duration::hours(12)),
        }
    }

    pub async fn create(&self, owner: &str) -> DraftSnapshot {
        self.evict_stale_at(Utc::now()).await;

        let id = Uuid::new_v4();
        let (photo, _) = watch::channel(PhotoState::Empty);
        let entry = DraftEntry {
            owner: owner.to_string(),
            draft: ReportDraft {
                category: Some(ReportCategory::default()),
                ..ReportDraft::default()
            },
            photo,
            photo_generation: 0,
            submitting: false,
            created_at: Utc::now(),
        };

        let snapshot = entry.snapshot(id);
        self.drafts.lock().await.insert(id, entry);
        tracing::debug!("Created draft {} for {}", id, owner);
        snapshot
    }

    pub async fn get(&self, id: Uuid, owner: &str) -> Result<DraftSnapshot> {
        let drafts = self.drafts.lock().await;
        Ok(find(&drafts, id, owner)?.snapshot(id))
    }

    pub async fn update(&self, id: Uuid, owner: &str, patch: DraftPatch) -> Result<DraftSnapshot> {
        if let Some((lat, lng)) = patch.position {
            check_coordinates(lat, lng)?;
        }

        let mut drafts = self.drafts.lock().await;
        let entry = find_mut(&mut drafts, id, owner)?;
        entry.ensure_editable()?;

        if let Some(category) = patch.category {
            entry.draft.category = Some(category);
        }
        if let Some(description) = patch.description {
            entry.draft.description = Some(description);
        }
        if let Some(address) = patch.address {
            entry.draft.location.address = Some(address);
        }
        if let Some((lat, lng)) = patch.position {
            entry.draft.location.lat = Some(lat);
            entry.draft.location.lng = Some(lng);
        }

        Ok(entry.snapshot(id))
    }

    /// Upload a photo; a later upload for the same draft wins
    pub async fn attach_photo(
        self: &Arc<Self>,
        id: Uuid,
        owner: &str,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<DraftSnapshot> {
        let this = Arc::clone(self);
        let owner = owner.to_string();
        let file_name = file_name.to_string();
        let content_type = content_type.to_string();

        detached(async move {
            this.upload(id, &owner, &file_name, &content_type, data)
                .await
        })
        .await
    }

    async fn upload(
        &self,
        id: Uuid,
        owner: &str,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<DraftSnapshot> {
        let (generation, closed) = {
            let mut drafts = self.drafts.lock().await;
            let entry = find_mut(&mut drafts, id, owner)?;
            entry.ensure_editable()?;

            entry.photo_generation += 1;
            let generation = entry.photo_generation;
            entry.photo.send_replace(PhotoState::Uploading { generation });
            (generation, entry.photo.subscribe())
        };

        let result = tokio::select! {
            result = self.photos.store(file_name, content_type, data) => result,
            _ = discarded(closed) => return Err(discarded_error(id)),
        };

        let mut drafts = self.drafts.lock().await;
        let entry = drafts.get_mut(&id).ok_or_else(|| discarded_error(id))?;
        if entry.photo_generation != generation {
            tracing::debug!("Photo upload {} for draft {} was superseded", generation, id);
            return Err(AppError::Conflict(
                "Photo upload was superseded by a newer one".to_string(),
            ));
        }

        match result {
            Ok(stored) => {
                entry.photo.send_replace(PhotoState::Ready {
                    reference: stored.reference,
                    digest: stored.digest,
                });
                Ok(entry.snapshot(id))
            }
            Err(e) => {
                let reason = match e {
                    AppError::UploadFailed(reason) => reason,
                    other => other.to_string(),
                };
                tracing::warn!("Photo upload for draft {} failed: {}", id, reason);
                entry.photo.send_replace(PhotoState::Failed {
                    reason: reason.clone(),
                });
                Err(AppError::UploadFailed(reason))
            }
        }
    }

    /// Skip the photo, discarding any upload in flight
    pub async fn clear_photo(&self, id: Uuid, owner: &str) -> Result<DraftSnapshot> {
        let mut drafts = self.drafts.lock().await;
        let entry = find_mut(&mut drafts, id, owner)?;
        entry.ensure_editable()?;

        entry.photo_generation += 1;
        entry.photo.send_replace(PhotoState::Empty);
        Ok(entry.snapshot(id))
    }

    /// Fill the location from the device position
    ///
    /// Fails with `Conflict` if a submission started while the position was
    /// being looked up.
    pub async fn locate(&self, id: Uuid, owner: &str) -> Result<DraftSnapshot> {
        let closed = {
            let drafts = self.drafts.lock().await;
            let entry = find(&drafts, id, owner)?;
            entry.ensure_editable()?;
            entry.photo.subscribe()
        };

        let (lat, lng) = tokio::select! {
            position = self.locator.current_position() => position?,
            _ = discarded(closed) => return Err(discarded_error(id)),
        };
        check_coordinates(lat, lng)
            .map_err(|e| AppError::LocationUnavailable(e.to_string()))?;

        let mut drafts = self.drafts.lock().await;
        let entry = drafts.get_mut(&id).ok_or_else(|| discarded_error(id))?;
        entry.ensure_editable()?;

        entry.draft.location.lat = Some(lat);
        entry.draft.location.lng = Some(lng);
        entry.draft.location.address = Some(CURRENT_LOCATION_ADDRESS.to_string());
        Ok(entry.snapshot(id))
    }

    /// Submit the draft once any photo upload has settled
    ///
    /// Only one submission per draft runs at a time. On success the draft is
    /// consumed; on failure it is left intact for correction.
    pub async fn submit(self: &Arc<Self>, id: Uuid, owner: &str) -> Result<Report> {
        let this = Arc::clone(self);
        let owner = owner.to_string();

        detached(async move { this.submit_draft(id, &owner).await }).await
    }

    async fn submit_draft(&self, id: Uuid, owner: &str) -> Result<Report> {
        let mut photo = {
            let mut drafts = self.drafts.lock().await;
            let entry = find_mut(&mut drafts, id, owner)?;
            if entry.submitting {
                return Err(AppError::Conflict(
                    "A submission for this draft is already in progress".to_string(),
                ));
            }
            entry.submitting = true;
            entry.photo.subscribe()
        };

        let settled = match photo.wait_for(PhotoState::is_settled).await {
            Ok(state) => (*state).clone(),
            Err(_) => return Err(discarded_error(id)),
        };

        let draft = {
            let mut drafts = self.drafts.lock().await;
            let entry = drafts.get_mut(&id).ok_or_else(|| discarded_error(id))?;

            let photo = match settled {
                PhotoState::Ready { reference, .. } => Some(reference),
                PhotoState::Failed { reason } => {
                    entry.submitting = false;
                    return Err(AppError::UploadFailed(reason));
                }
                PhotoState::Empty | PhotoState::Uploading { .. } => None,
            };

            ReportDraft {
                photo,
                ..entry.draft.clone()
            }
        };

        let result = self.submissions.submit(&draft).await;

        let mut drafts = self.drafts.lock().await;
        match result {
            Ok(report) => {
                drafts.remove(&id);
                tracing::debug!("Draft {} consumed by report {}", id, report.id);
                Ok(report)
            }
            Err(e) => {
                if let Some(entry) = drafts.get_mut(&id) {
                    entry.submitting = false;
                }
                Err(e)
            }
        }
    }

    /// Remove the draft, cancelling anything still in flight for it
    pub async fn discard(&self, id: Uuid, owner: &str) -> Result<()> {
        let mut drafts = self.drafts.lock().await;
        find(&drafts, id, owner)?;
        drafts.remove(&id);
        tracing::debug!("Discarded draft {}", id);
        Ok(())
    }

    /// Remove every draft owned by `owner`; returns how many were dropped
    pub async fn discard_owned_by(&self, owner: &str) -> usize {
        let mut drafts = self.drafts.lock().await;
        let before = drafts.len();
        drafts.retain(|_, entry| entry.owner != owner);
        let removed = before - drafts.len();
        if removed > 0 {
            tracing::debug!("Discarded {} draft(s) for {}", removed, owner);
        }
        removed
    }

    /// Drop drafts that outlived `max_age`; returns how many were dropped
    pub async fn evict_stale(&self) -> usize {
        self.evict_stale_at(Utc::now()).await
    }

    async fn evict_stale_at(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.max_age;
        let mut drafts = self.drafts.lock().await;
        let before = drafts.len();
        drafts.retain(|_, entry| entry.created_at > cutoff);
        let removed = before - drafts.len();
        if removed > 0 {
            tracing::info!("Evicted {} stale draft(s)", removed);
        }
        removed
    }
}

#[async_trait]
impl SignOutHook for DraftService {
    async fn signed_out(&self, email: &str) {
        self.discard_owned_by(email).await;
    }
}

/// Run draft work on its own task so dropping the caller cannot strand it
async fn detached<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| AppError::Internal(format!("Draft task failed: {}", e)))?
}

fn find<'a>(drafts: &'a HashMap<Uuid, DraftEntry>, id: Uuid, owner: &str) -> Result<&'a DraftEntry> {
    drafts
        .get(&id)
        .filter(|entry| entry.owner == owner)
        .ok_or_else(|| AppError::NotFound(format!("Draft {} not found", id)))
}

fn find_mut<'a>(
    drafts: &'a mut HashMap<Uuid, DraftEntry>,
    id: Uuid,
    owner: &str,
) -> Result<&'a mut DraftEntry> {
    drafts
        .get_mut(&id)
        .filter(|entry| entry.owner == owner)
        .ok_or_else(|| AppError::NotFound(format!("Draft {} not found", id)))
}

fn discarded_error(id: Uuid) -> AppError {
    AppError::NotFound(format!("Draft {} was discarded", id))
}

/// Resolves once the draft's sender is dropped
async fn discarded(mut photo: watch::Receiver<PhotoState>) {
    while photo.changed().await.is_ok() {}
}
