//! Rendering-surface seam between the selection logic and a concrete map widget.
//!
//! The browser client implements [`MapBackend`]/[`MapSurface`] on top of Leaflet;
//! tests use the recording fakes in [`testing`]. All handles are opaque ids so
//! controllers never hold references into the widget itself.

use std::rc::Rc;

use serde::Serialize;

use crate::chart::MapOptions;
use crate::data_point::DataPointId;
use crate::geo::{Bounds, LatLng};
use crate::geojson::Feature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

/// Index of a shape inside its layer, in feature order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeKey(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PopupId(pub u32);

/// Path style, serialized with the option names Leaflet expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub color: String,
    pub weight: f64,
    pub fill_opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: "#3388ff".to_string(),
            weight: 3.0,
            fill_opacity: 0.2,
            fill_color: Some("#3388ff".to_string()),
        }
    }
}

impl ShapeStyle {
    pub fn selected() -> Self {
        Self {
            color: "#ff7800".to_string(),
            weight: 4.0,
            fill_opacity: 0.8,
            fill_color: Some("#ffb347".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub title: String,
    pub body: Option<String>,
}

impl PopupContent {
    pub fn text(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
        }
    }
}

/// A free-standing popup anchored at a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub anchor: LatLng,
    pub content: PopupContent,
    pub close_button: bool,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerOptions {
    /// Data point reported in [`MapEvent::MarkerClicked`]; `None` makes the marker inert.
    pub data_point: Option<DataPointId>,
    pub icon_url: Option<String>,
    pub popup: Option<PopupContent>,
    pub open_popup: bool,
}

/// Interaction reported by a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapEvent {
    ShapeClicked {
        layer: LayerId,
        feature_id: Option<String>,
    },
    MarkerClicked {
        id: DataPointId,
    },
}

pub type EventSink = Rc<dyn Fn(MapEvent)>;

/// Primitives the highlight controllers need from a map widget.
pub trait MapSurface {
    fn add_shape_layer(
        &mut self,
        features: &[Feature],
        style: &dyn Fn(&Feature) -> ShapeStyle,
    ) -> Option<LayerId>;

    fn set_shape_style(&mut self, layer: LayerId, shape: ShapeKey, style: &ShapeStyle);

    /// Restore every shape of the layer to the style it was created with.
    fn reset_layer_style(&mut self, layer: LayerId);

    fn shape_bounds(&self, layer: LayerId, shape: ShapeKey) -> Option<Bounds>;

    /// Take every shape of the layer off the map. The id is not reused.
    fn remove_layer(&mut self, layer: LayerId);

    fn add_marker(&mut self, at: LatLng, options: MarkerOptions) -> Option<MarkerId>;

    fn remove_marker(&mut self, marker: MarkerId);

    fn set_view(&mut self, center: LatLng, zoom: f64);

    fn open_popup(&mut self, popup: &Popup) -> Option<PopupId>;

    fn remove_popup(&mut self, popup: PopupId);

    /// Close whatever popup the widget itself currently has open.
    fn close_popup(&mut self);
}

/// Creates and releases map widgets bound to page containers.
pub trait MapBackend {
    type Map: MapSurface;

    /// `None` when the container does not exist or the widget fails to start.
    fn create(&mut self, container_id: &str, options: &MapOptions, events: EventSink)
    -> Option<Self::Map>;

    fn destroy(&mut self, map: Self::Map);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapHandle {
    pub container_id: String,
}

/// Owns at most one live map. Every [`MapSurface`] call is a no-op while no map is live.
pub struct MapAdapter<B: MapBackend> {
    backend: B,
    live: Option<(MapHandle, B::Map)>,
}

impl<B: MapBackend> MapAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            live: None,
        }
    }

    /// Create the map, or return the existing handle if one is already live.
    pub fn create(
        &mut self,
        container_id: &str,
        options: &MapOptions,
        events: EventSink,
    ) -> Option<MapHandle> {
        if let Some((handle, _)) = &self.live {
            return Some(handle.clone());
        }
        let Some(map) = self.backend.create(container_id, options, events) else {
            tracing::warn!(container_id, "map container unavailable");
            return None;
        };
        let handle = MapHandle {
            container_id: container_id.to_string(),
        };
        self.live = Some((handle.clone(), map));
        Some(handle)
    }

    pub fn destroy(&mut self) {
        if let Some((handle, map)) = self.live.take() {
            tracing::debug!(container_id = %handle.container_id, "destroying map");
            self.backend.destroy(map);
        }
    }

    pub fn handle(&self) -> Option<&MapHandle> {
        self.live.as_ref().map(|(handle, _)| handle)
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn map(&self) -> Option<&B::Map> {
        self.live.as_ref().map(|(_, map)| map)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn map_mut(&mut self) -> Option<&mut B::Map> {
        self.live.as_mut().map(|(_, map)| map)
    }
}

impl<B: MapBackend> MapSurface for MapAdapter<B> {
    fn add_shape_layer(
        &mut self,
        features: &[Feature],
        style: &dyn Fn(&Feature) -> ShapeStyle,
    ) -> Option<LayerId> {
        self.map_mut()?.add_shape_layer(features, style)
    }

    fn set_shape_style(&mut self, layer: LayerId, shape: ShapeKey, style: &ShapeStyle) {
        if let Some(map) = self.map_mut() {
            map.set_shape_style(layer, shape, style);
        }
    }

    fn reset_layer_style(&mut self, layer: LayerId) {
        if let Some(map) = self.map_mut() {
            map.reset_layer_style(layer);
        }
    }

    fn shape_bounds(&self, layer: LayerId, shape: ShapeKey) -> Option<Bounds> {
        self.map()?.shape_bounds(layer, shape)
    }

    fn remove_layer(&mut self, layer: LayerId) {
        if let Some(map) = self.map_mut() {
            map.remove_layer(layer);
        }
    }

    fn add_marker(&mut self, at: LatLng, options: MarkerOptions) -> Option<MarkerId> {
        self.map_mut()?.add_marker(at, options)
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        if let Some(map) = self.map_mut() {
            map.remove_marker(marker);
        }
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        if let Some(map) = self.map_mut() {
            map.set_view(center, zoom);
        }
    }

    fn open_popup(&mut self, popup: &Popup) -> Option<PopupId> {
        self.map_mut()?.open_popup(popup)
    }

    fn remove_popup(&mut self, popup: PopupId) {
        if let Some(map) = self.map_mut() {
            map.remove_popup(popup);
        }
    }

    fn close_popup(&mut self) {
        if let Some(map) = self.map_mut() {
            map.close_popup();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::{BTreeMap, HashSet};

    use super::*;

    #[derive(Debug, Clone)]
    pub(crate) struct RecordedShape {
        pub feature: Feature,
        pub default_style: ShapeStyle,
        pub style: ShapeStyle,
    }

    #[derive(Debug, Clone)]
    pub(crate) struct RecordedMarker {
        pub at: LatLng,
        pub options: MarkerOptions,
        pub popup_open: bool,
    }

    /// In-memory surface that records every primitive call.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub layers: Vec<Vec<RecordedShape>>,
        pub markers: BTreeMap<MarkerId, RecordedMarker>,
        pub popups: BTreeMap<PopupId, Popup>,
        pub view: Option<(LatLng, f64)>,
        pub close_popup_calls: usize,
        next_id: u32,
    }

    impl RecordingSurface {
        fn next_id(&mut self) -> u32 {
            self.next_id += 1;
            self.next_id
        }

        pub fn highlighted_shapes(&self) -> Vec<(LayerId, ShapeKey)> {
            let selected = ShapeStyle::selected();
            self.layers
                .iter()
                .enumerate()
                .flat_map(|(layer, shapes)| {
                    shapes
                        .iter()
                        .enumerate()
                        .filter(|(_, shape)| shape.style == selected)
                        .map(move |(key, _)| (LayerId(layer as u32), ShapeKey(key)))
                })
                .collect()
        }

        pub fn live_layer_count(&self) -> usize {
            self.layers.iter().filter(|shapes| !shapes.is_empty()).count()
        }

        /// Free popups plus marker popups that are currently open.
        pub fn open_popup_count(&self) -> usize {
            self.popups.len() + self.markers.values().filter(|m| m.popup_open).count()
        }

        pub fn single_popup(&self) -> Option<&Popup> {
            match self.popups.values().collect::<Vec<_>>().as_slice() {
                [popup] => Some(popup),
                _ => None,
            }
        }
    }

    impl MapSurface for RecordingSurface {
        fn add_shape_layer(
            &mut self,
            features: &[Feature],
            style: &dyn Fn(&Feature) -> ShapeStyle,
        ) -> Option<LayerId> {
            let shapes = features
                .iter()
                .map(|feature| {
                    let default_style = style(feature);
                    RecordedShape {
                        feature: feature.clone(),
                        style: default_style.clone(),
                        default_style,
                    }
                })
                .collect();
            self.layers.push(shapes);
            Some(LayerId(self.layers.len() as u32 - 1))
        }

        fn set_shape_style(&mut self, layer: LayerId, shape: ShapeKey, style: &ShapeStyle) {
            if let Some(shape) = self
                .layers
                .get_mut(layer.0 as usize)
                .and_then(|shapes| shapes.get_mut(shape.0))
            {
                shape.style = style.clone();
            }
        }

        fn reset_layer_style(&mut self, layer: LayerId) {
            if let Some(shapes) = self.layers.get_mut(layer.0 as usize) {
                for shape in shapes {
                    shape.style = shape.default_style.clone();
                }
            }
        }

        fn remove_layer(&mut self, layer: LayerId) {
            if let Some(shapes) = self.layers.get_mut(layer.0 as usize) {
                shapes.clear();
            }
        }

        fn shape_bounds(&self, layer: LayerId, shape: ShapeKey) -> Option<Bounds> {
            self.layers.get(layer.0 as usize)?.get(shape.0)?.feature.boundary()
        }

        fn add_marker(&mut self, at: LatLng, options: MarkerOptions) -> Option<MarkerId> {
            let id = MarkerId(self.next_id());
            if options.open_popup && options.popup.is_some() {
                // The widget keeps a single managed popup open at a time.
                for marker in self.markers.values_mut() {
                    marker.popup_open = false;
                }
            }
            let popup_open = options.open_popup && options.popup.is_some();
            self.markers.insert(
                id,
                RecordedMarker {
                    at,
                    options,
                    popup_open,
                },
            );
            Some(id)
        }

        fn remove_marker(&mut self, marker: MarkerId) {
            self.markers.remove(&marker);
        }

        fn set_view(&mut self, center: LatLng, zoom: f64) {
            self.view = Some((center, zoom));
        }

        fn open_popup(&mut self, popup: &Popup) -> Option<PopupId> {
            let id = PopupId(self.next_id());
            self.popups.insert(id, popup.clone());
            Some(id)
        }

        fn remove_popup(&mut self, popup: PopupId) {
            self.popups.remove(&popup);
        }

        fn close_popup(&mut self) {
            self.close_popup_calls += 1;
            for marker in self.markers.values_mut() {
                marker.popup_open = false;
            }
        }
    }

    /// Backend that only "finds" the containers it was told about.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingBackend {
        pub containers: HashSet<String>,
        pub created: usize,
        pub destroyed: usize,
    }

    impl RecordingBackend {
        pub fn with_container(container_id: &str) -> Self {
            Self {
                containers: HashSet::from([container_id.to_string()]),
                ..Self::default()
            }
        }
    }

    impl MapBackend for RecordingBackend {
        type Map = RecordingSurface;

        fn create(
            &mut self,
            container_id: &str,
            options: &MapOptions,
            _events: EventSink,
        ) -> Option<RecordingSurface> {
            if !self.containers.contains(container_id) {
                return None;
            }
            self.created += 1;
            Some(RecordingSurface {
                view: Some((options.center, options.zoom)),
                ..RecordingSurface::default()
            })
        }

        fn destroy(&mut self, _map: RecordingSurface) {
            self.destroyed += 1;
        }
    }

    pub(crate) fn noop_sink() -> EventSink {
        Rc::new(|_| {})
    }
}
