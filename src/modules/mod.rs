//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the photo store and geolocation adapters the report flows depend on.

pub mod geolocation;
pub mod storage;
