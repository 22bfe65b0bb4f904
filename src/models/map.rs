//! Map views and the display objects that carry them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;

const MAP_TEMPLATE: &str = include_str!("../../assets/map.html");

/// Dimensions and zoom of a rendered map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    /// Display width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Display height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
    /// Initial zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_zoom() -> u8 {
    8
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            zoom: default_zoom(),
        }
    }
}

/// A marker placed on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Coordinate,
    pub tooltip: String,
}

/// Center, zoom and markers of one rendered map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub markers: Vec<Marker>,
}

/// What a display surface shows: one map with fixed dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayObject {
    /// Place name the map was rendered for
    pub place: String,
    pub width: u32,
    pub height: u32,
    pub view: MapView,
    pub rendered_at: DateTime<Utc>,
}

impl DisplayObject {
    #[must_use]
    pub fn new(place: impl Into<String>, view: MapView, settings: &MapSettings) -> Self {
        Self {
            place: place.into(),
            width: settings.width,
            height: settings.height,
            view,
            rendered_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.view.markers.len()
    }

    /// Standalone Leaflet document for this map.
    ///
    /// The view is embedded as JSON and tooltips are attached as text nodes,
    /// so property data never becomes markup.
    #[must_use]
    pub fn to_html(&self) -> String {
        let view_json = serde_json::to_string(&self.view)
            .unwrap_or_else(|_| "null".to_string())
            .replace("</", "<\\/");

        MAP_TEMPLATE
            .replace("{{TITLE}}", &escape_html(&self.place))
            .replace("{{WIDTH}}", &self.width.to_string())
            .replace("{{HEIGHT}}", &self.height.to_string())
            .replace("{{VIEW_JSON}}", &view_json)
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
