//! Storage module for report photos
//!
//! Provides the photo store port and an inline implementation that embeds
//! photos as `data:` references.

mod photo_store;

pub use photo_store::{InlinePhotoStore, PhotoStore};

#[cfg(test)]
pub use photo_store::StoredPhoto;
