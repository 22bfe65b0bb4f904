//! Coordinates and the address features returned by the GSI search API

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coordinate pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Latitude in decimal degrees
    pub latitude: f64,
}

impl Coordinate {
    /// Create a new coordinate
    #[must_use]
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Leaflet and folium order: `[lat, lon]`
    #[must_use]
    pub fn lat_lon(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Point geometry of a feature. The API always sends `[lon, lat]`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Geometry {
    pub coordinates: [f64; 2],
}

/// One address record from the search API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationFeature {
    pub geometry: Geometry,
    /// Free-form labels, shown as the marker tooltip without modification
    pub properties: Value,
}

impl LocationFeature {
    #[must_use]
    pub fn new(longitude: f64, latitude: f64, properties: Value) -> Self {
        Self {
            geometry: Geometry {
                coordinates: [longitude, latitude],
            },
            properties,
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        let [longitude, latitude] = self.geometry.coordinates;
        Coordinate::new(longitude, latitude)
    }

    /// Tooltip text: a string is used as-is, anything else as its JSON text
    #[must_use]
    pub fn label(&self) -> String {
        match &self.properties {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Body of an address search response.
///
/// The GSI endpoint answers with a bare array; a GeoJSON
/// `FeatureCollection` wrapper is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Features(Vec<LocationFeature>),
    Collection { features: Vec<LocationFeature> },
}

impl SearchResponse {
    #[must_use]
    pub fn into_features(self) -> Vec<LocationFeature> {
        match self {
            SearchResponse::Features(features) | SearchResponse::Collection { features } => {
                features
            }
        }
    }
}
