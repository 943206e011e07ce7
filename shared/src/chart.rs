use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_CENTER, DEFAULT_MAX_ZOOM, DEFAULT_ZOOM, TILE_ATTRIBUTION, TILE_URL};
use crate::data_point::{DataPoint, MarkerDataPoint};
use crate::geo::LatLng;
use crate::geojson::{Feature, FeatureCollection};
use crate::surface::ShapeStyle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSource {
    pub name: String,
    pub url: String,
}

impl ChartSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartIdea {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomControlPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ZoomControlPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            ZoomControlPosition::TopLeft => "topleft",
            ZoomControlPosition::TopRight => "topright",
            ZoomControlPosition::BottomLeft => "bottomleft",
            ZoomControlPosition::BottomRight => "bottomright",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: f64,
    pub max_zoom: f64,
    pub tile_url: String,
    pub attribution: String,
    pub zoom_control_position: ZoomControlPosition,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            tile_url: TILE_URL.to_string(),
            attribution: TILE_ATTRIBUTION.to_string(),
            zoom_control_position: ZoomControlPosition::default(),
        }
    }
}

impl MapOptions {
    pub fn centered(center: LatLng, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            ..Self::default()
        }
    }

    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = max_zoom;
        self
    }
}

/// Default path style for a shape layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerStyle {
    pub base: ShapeStyle,
    /// Take the stroke color from `properties.color` when a feature carries one.
    pub color_from_properties: bool,
}

impl LayerStyle {
    pub fn style_for(&self, feature: &Feature) -> ShapeStyle {
        let mut style = self.base.clone();
        if self.color_from_properties {
            if let Some(color) = feature.properties.color.as_deref().filter(|c| !c.is_empty()) {
                style.color = color.to_string();
            }
        }
        style
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    GeoJson {
        collection: FeatureCollection,
        style: LayerStyle,
    },
    Markers(Vec<MarkerDataPoint>),
}

impl Dataset {
    pub fn markers(&self) -> &[MarkerDataPoint] {
        match self {
            Dataset::Markers(markers) => markers,
            Dataset::GeoJson { .. } => &[],
        }
    }
}

/// Everything the map explorer needs to show one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub id: String,
    pub title: String,
    pub description: String,
    pub ideas: Vec<ChartIdea>,
    pub sources: Vec<ChartSource>,
    pub map_options: MapOptions,
    pub data_points: Vec<DataPoint>,
    pub dataset: Dataset,
}
