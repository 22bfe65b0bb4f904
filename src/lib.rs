//! `OfficeMap` - government office locator
//!
//! This library queries the GSI address-search API, centers a map on the
//! mean coordinate of the results, and serves it from a small reactive
//! dashboard bound to one selection control.

pub mod aggregate;
pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod locator;
pub mod models;
pub mod render;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use aggregate::aggregate_center;
pub use config::OfficeMapConfig;
pub use dashboard::{Dashboard, DisplayState, DisplaySurface, QuerySelection, SelectionControl};
pub use error::OfficeMapError;
pub use locator::{AddressSearch, GsiLocator};
pub use models::{Coordinate, DisplayObject, LocationFeature, MapSettings, MapView, Marker};
pub use render::{build_view, render};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, OfficeMapError>;
