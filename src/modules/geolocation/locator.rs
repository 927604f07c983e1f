use async_trait::async_trait;

use crate::core::error::{AppError, Result};
use crate::shared::constants::MSG_LOCATION_UNAVAILABLE;

/// Source of the device's current position
#[async_trait]
pub trait Locator: Send + Sync {
    /// Single-shot lookup returning `(lat, lng)`
    async fn current_position(&self) -> Result<(f64, f64)>;
}

/// Locator answering with a configured position, if any
pub struct FixedLocator {
    position: Option<(f64, f64)>,
}

impl FixedLocator {
    pub fn new(position: Option<(f64, f64)>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Locator for FixedLocator {
    async fn current_position(&self) -> Result<(f64, f64)> {
        self.position
            .ok_or_else(|| AppError::LocationUnavailable(MSG_LOCATION_UNAVAILABLE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_locator() {
        let located = FixedLocator::new(Some((40.7128, -74.006)));
        assert_eq!(located.current_position().await.unwrap(), (40.7128, -74.006));

        let unavailable = FixedLocator::new(None);
        assert!(matches!(
            unavailable.current_position().await,
            Err(AppError::LocationUnavailable(_))
        ));
    }
}
