//! Bounding-box resolution from an explicit box or a center and radius.

use crate::error::{Result, TrafficError};
use geo::Point;
use jartic_types::BoundingBox;

/// Mean Earth radius used by the small-angle approximation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Derive the query box.
///
/// An explicit box wins over a center. The center form needs a positive
/// radius and uses a planar approximation that is fine for a few tens of km.
/// Near the poles `cos(latitude)` approaches zero and the longitude span
/// grows without bound; that case is passed through unchanged.
///
/// # Examples
///
/// ```
/// use jartic::compute::bbox::resolve;
/// use jartic_types::BoundingBox;
/// use geo::Point;
///
/// let explicit = BoundingBox::new(139.15, 35.14, 139.32, 35.56);
/// assert_eq!(resolve(Some(explicit), None, None).unwrap(), explicit);
///
/// let tokyo = Point::new(139.767, 35.681);
/// let bbox = resolve(None, Some(tokyo), Some(5.0)).unwrap();
/// assert!(bbox.strictly_contains(&tokyo));
/// ```
pub fn resolve(
    explicit: Option<BoundingBox>,
    center: Option<Point>,
    radius_km: Option<f64>,
) -> Result<BoundingBox> {
    if let Some(bbox) = explicit {
        return Ok(bbox);
    }

    match (center, radius_km) {
        (Some(center), Some(radius)) if radius > 0.0 => Ok(around(center, radius)),
        _ => Err(TrafficError::MissingAreaSpecification),
    }
}

/// Box of half-width `radius_km` around `center` (x = longitude, y = latitude).
pub fn around(center: Point, radius_km: f64) -> BoundingBox {
    let delta_lat = (radius_km / EARTH_RADIUS_KM).to_degrees();
    let delta_lon = delta_lat / center.y().to_radians().cos();

    BoundingBox::new(
        center.x() - delta_lon,
        center.y() - delta_lat,
        center.x() + delta_lon,
        center.y() + delta_lat,
    )
}
