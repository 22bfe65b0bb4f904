//! Data models for the OfficeMap application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Coordinates and the address features returned by the search API
//! - Map: Markers, map views and the display objects built from them

pub mod location;
pub mod map;

// Re-export all public types for convenient access
pub use location::{Coordinate, Geometry, LocationFeature, SearchResponse};
pub use map::{DisplayObject, MapSettings, MapView, Marker};
