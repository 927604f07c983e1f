//! Equirectangular projection of coordinates onto the static map image.
//!
//! Both axes are percentages of the image box: `x` grows eastward from
//! longitude -180, `y` grows southward from latitude 90.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

pub fn project(lat: f64, lng: f64) -> MapPoint {
    MapPoint {
        x: (lng + 180.0) / 360.0 * 100.0,
        y: (90.0 - lat) / 180.0 * 100.0,
    }
}

/// Inverse of [`project`], returns `(lat, lng)`
#[cfg(test)]
pub fn unproject(point: MapPoint) -> (f64, f64) {
    let lng = point.x / 100.0 * 360.0 - 180.0;
    let lat = 90.0 - point.y / 100.0 * 180.0;
    (lat, lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPS, "{} != {}", a, b);
    }

    #[test]
    fn test_reference_points() {
        assert_eq!(project(0.0, 0.0), MapPoint { x: 50.0, y: 50.0 });
        assert_eq!(project(90.0, -180.0), MapPoint { x: 0.0, y: 0.0 });
        assert_eq!(project(-90.0, 180.0), MapPoint { x: 100.0, y: 100.0 });
    }

    #[test]
    fn test_unproject_recovers_coordinates() {
        for (lat, lng) in [
            (40.7128, -74.006),
            (-33.8688, 151.2093),
            (51.5074, -0.1278),
            (89.999, 179.999),
        ] {
            let (back_lat, back_lng) = unproject(project(lat, lng));
            assert_close(back_lat, lat);
            assert_close(back_lng, lng);
        }
    }
}
