//! Map center selection
//!
//! The center of a map is the arithmetic mean of the coordinates of every
//! feature placed on it.

use crate::models::Coordinate;
use crate::{OfficeMapError, Result};

/// Arithmetic mean of longitude and latitude.
///
/// Fails with [`OfficeMapError::EmptyResult`] for an empty slice; `place`
/// only names the query in that error.
pub fn aggregate_center(place: &str, coordinates: &[Coordinate]) -> Result<Coordinate> {
    if coordinates.is_empty() {
        return Err(OfficeMapError::empty_result(place));
    }

    let (lon_sum, lat_sum) = coordinates
        .iter()
        .fold((0.0_f64, 0.0_f64), |(lon, lat), c| {
            (lon + c.longitude, lat + c.latitude)
        });
    let count = coordinates.len() as f64;

    Ok(Coordinate::new(lon_sum / count, lat_sum / count))
}
