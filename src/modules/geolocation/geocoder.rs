use async_trait::async_trait;
use serde::Deserialize;

use crate::core::error::{AppError, Result};

/// Address to coordinates lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the address matched nothing
    async fn geocode(&self, address: &str) -> Result<Option<(f64, f64)>>;
}

/// Nominatim search result; only the fields we read
#[derive(Debug, Deserialize)]
struct NominatimResponse {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimResponse {
    fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat.parse().ok()?, self.lon.parse().ok()?))
    }
}

/// Geocoder backed by a Nominatim-compatible search endpoint
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("UrbanFixCore/0.1 (civic-issue-reporting)")
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, address: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(address)
        )
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<(f64, f64)>> {
        let url = self.search_url(address);
        tracing::debug!("Geocoding (free-form): {} -> {}", address, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Nominatim request failed: {:?}", e);
            AppError::ExternalServiceError(format!("Nominatim request failed: {}", e))
        })?;

        if !response.status().is_success() {
            tracing::warn!("Nominatim returned status: {}", response.status());
            return Ok(None);
        }

        let results: Vec<NominatimResponse> = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse Nominatim response: {}", e))
        })?;

        Ok(results.into_iter().next().and_then(|r| {
            tracing::debug!("Geocoded to {:?}", r.display_name);
            r.coordinates()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_address() {
        let geocoder = NominatimGeocoder::new("https://nominatim.example/").unwrap();
        assert_eq!(
            geocoder.search_url("5th Ave & 42nd St"),
            "https://nominatim.example/search?q=5th%20Ave%20%26%2042nd%20St&format=json&limit=1"
        );
    }

    #[test]
    fn test_unparseable_coordinates_are_no_match() {
        let result: NominatimResponse =
            serde_json::from_str(r#"{"lat":"40.7","lon":"abc"}"#).unwrap();
        assert_eq!(result.coordinates(), None);

        let result: NominatimResponse =
            serde_json::from_str(r#"{"lat":"40.7","lon":"-74.0","display_name":"NYC"}"#)
                .unwrap();
        assert_eq!(result.coordinates(), Some((40.7, -74.0)));
    }
}
