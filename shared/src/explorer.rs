//! Selection coordinator for one chart view.
//!
//! Map clicks and side-panel clicks both end up in [`MapExplorer::select`], so the
//! rendered highlight and the panel's active entry always describe the same data point.

use std::collections::HashMap;

use crate::chart::{ChartConfig, Dataset};
use crate::data_point::{DataPoint, DataPointId, find_by_id, parse_feature_id};
use crate::marker_highlight::MarkerHighlighter;
use crate::shape_highlight::ShapeHighlighter;
use crate::surface::{LayerId, MapEvent, MapSurface, MarkerId, MarkerOptions, ShapeKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    Shape,
    Marker,
    Panel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionEvent {
    pub source: SelectionSource,
    pub id: DataPointId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Detail,
    Overview,
}

/// What the page should do after a back action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    ShowDetail,
    Exit,
}

type SelectionCallback = Box<dyn FnMut(&DataPoint)>;

pub struct MapExplorer {
    chart: ChartConfig,
    selected: Option<DataPointId>,
    view_mode: ViewMode,
    shapes: ShapeHighlighter,
    markers: MarkerHighlighter,
    layer: Option<LayerId>,
    shape_index: HashMap<DataPointId, ShapeKey>,
    rendered_markers: Vec<MarkerId>,
    rendered: bool,
    on_select: Option<SelectionCallback>,
}

impl MapExplorer {
    pub fn new(chart: ChartConfig) -> Self {
        Self {
            chart,
            selected: None,
            view_mode: ViewMode::Detail,
            shapes: ShapeHighlighter::new(),
            markers: MarkerHighlighter::new(),
            layer: None,
            shape_index: HashMap::new(),
            rendered_markers: Vec::new(),
            rendered: false,
            on_select: None,
        }
    }

    pub fn with_selection_callback(mut self, callback: impl FnMut(&DataPoint) + 'static) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    pub fn chart(&self) -> &ChartConfig {
        &self.chart
    }

    pub fn data_points(&self) -> &[DataPoint] {
        &self.chart.data_points
    }

    pub fn layer(&self) -> Option<LayerId> {
        self.layer
    }

    pub fn selected_id(&self) -> Option<DataPointId> {
        self.selected
    }

    pub fn selected(&self) -> Option<DataPoint> {
        self.selected.and_then(|id| self.resolve(id))
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Draw the dataset once. Calling again after a successful render does nothing.
    pub fn render<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.rendered {
            return;
        }
        match &self.chart.dataset {
            Dataset::GeoJson { collection, style } => {
                let Some(layer) =
                    surface.add_shape_layer(&collection.features, &|f| style.style_for(f))
                else {
                    return;
                };
                self.layer = Some(layer);
                self.shapes.attach(layer);
                self.shape_index = collection
                    .features
                    .iter()
                    .enumerate()
                    .filter_map(|(key, feature)| {
                        let id = parse_feature_id(feature.feature_id()?)?;
                        Some((id, ShapeKey(key)))
                    })
                    .collect();
                tracing::debug!(
                    chart = %self.chart.id,
                    shapes = collection.features.len(),
                    "rendered shape layer"
                );
            }
            Dataset::Markers(markers) => {
                for marker in markers {
                    let options = MarkerOptions {
                        data_point: Some(marker.id),
                        icon_url: marker.image_url.clone(),
                        ..MarkerOptions::default()
                    };
                    match surface.add_marker(marker.coordinates, options) {
                        Some(id) => self.rendered_markers.push(id),
                        None => return,
                    }
                }
                tracing::debug!(
                    chart = %self.chart.id,
                    markers = self.rendered_markers.len(),
                    "rendered markers"
                );
            }
        }
        self.rendered = true;
    }

    pub fn handle_map_event<S: MapSurface + ?Sized>(&mut self, surface: &mut S, event: MapEvent) {
        match event {
            MapEvent::ShapeClicked { layer, feature_id } => {
                if self.layer != Some(layer) {
                    tracing::debug!(?layer, "click from stale layer dropped");
                    return;
                }
                let Some(id) = feature_id.as_deref().and_then(parse_feature_id) else {
                    tracing::debug!(?feature_id, "shape click without usable id dropped");
                    return;
                };
                self.select(
                    surface,
                    SelectionEvent {
                        source: SelectionSource::Shape,
                        id,
                    },
                );
            }
            MapEvent::MarkerClicked { id } => {
                self.select(
                    surface,
                    SelectionEvent {
                        source: SelectionSource::Marker,
                        id,
                    },
                );
            }
        }
    }

    pub fn select_from_panel<S: MapSurface + ?Sized>(&mut self, surface: &mut S, id: DataPointId) -> bool {
        self.select(
            surface,
            SelectionEvent {
                source: SelectionSource::Panel,
                id,
            },
        )
    }

    /// Returns `false` when the id resolves to no data point; nothing changes in that case.
    pub fn select<S: MapSurface + ?Sized>(&mut self, surface: &mut S, event: SelectionEvent) -> bool {
        let Some(point) = self.resolve(event.id) else {
            tracing::debug!(id = event.id, source = ?event.source, "selection without data point dropped");
            return false;
        };

        self.selected = Some(point.id);
        match &self.chart.dataset {
            Dataset::GeoJson { .. } => match self.shape_index.get(&point.id) {
                Some(&shape) => self.shapes.highlight(surface, shape, &point),
                None => self.shapes.reset(surface),
            },
            Dataset::Markers(markers) => {
                if !self.markers.highlight(surface, markers, point.id) {
                    self.markers.reset(surface);
                }
            }
        }
        tracing::debug!(id = point.id, source = ?event.source, "selected data point");

        if let Some(callback) = self.on_select.as_mut() {
            callback(&point);
        }
        true
    }

    pub fn show_overview(&mut self) {
        self.view_mode = ViewMode::Overview;
    }

    pub fn handle_back<S: MapSurface + ?Sized>(&mut self, surface: &mut S) -> BackOutcome {
        self.clear_selection(surface);
        match self.view_mode {
            ViewMode::Overview => {
                self.view_mode = ViewMode::Detail;
                BackOutcome::ShowDetail
            }
            ViewMode::Detail => BackOutcome::Exit,
        }
    }

    /// Undo everything this explorer put on the surface. Safe to call repeatedly.
    pub fn teardown<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        self.clear_selection(surface);
        for marker in self.rendered_markers.drain(..) {
            surface.remove_marker(marker);
        }
        if let Some(layer) = self.layer.take() {
            surface.remove_layer(layer);
        }
        self.shapes = ShapeHighlighter::new();
        self.shape_index.clear();
        self.rendered = false;
        self.view_mode = ViewMode::Detail;
    }

    fn clear_selection<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        self.shapes.reset(surface);
        self.markers.reset(surface);
        self.selected = None;
    }

    fn resolve(&self, id: DataPointId) -> Option<DataPoint> {
        if let Some(point) = find_by_id(&self.chart.data_points, id) {
            return Some(point.clone());
        }
        self.chart
            .dataset
            .markers()
            .iter()
            .find(|marker| marker.id == id)
            .map(|marker| marker.to_data_point())
    }
}
