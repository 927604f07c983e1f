//! Geolocation module
//!
//! Device position lookup and address geocoding used by report drafts.

mod geocoder;
mod locator;

pub use geocoder::{Geocoder, NominatimGeocoder};
pub use locator::{FixedLocator, Locator};
