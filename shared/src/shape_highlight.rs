use crate::config::{INFO_POPUP_CLASS, POPUP_OFFSET_LAT, POPUP_OFFSET_LNG, SHAPE_FOCUS_ZOOM};
use crate::data_point::DataPoint;
use crate::surface::{LayerId, MapSurface, Popup, PopupContent, PopupId, ShapeKey, ShapeStyle};

/// Keeps at most one shape of a layer in the selected style, with one info popup next to it.
#[derive(Debug, Default)]
pub struct ShapeHighlighter {
    layer: Option<LayerId>,
    active_shape: Option<ShapeKey>,
    popup: Option<PopupId>,
}

impl ShapeHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, layer: LayerId) {
        self.layer = Some(layer);
        self.active_shape = None;
        self.popup = None;
    }

    pub fn layer(&self) -> Option<LayerId> {
        self.layer
    }

    pub fn active_shape(&self) -> Option<ShapeKey> {
        self.active_shape
    }

    pub fn popup(&self) -> Option<PopupId> {
        self.popup
    }

    pub fn highlight<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        shape: ShapeKey,
        point: &DataPoint,
    ) {
        let Some(layer) = self.layer else {
            return;
        };

        if let Some(popup) = self.popup.take() {
            surface.remove_popup(popup);
        }
        surface.reset_layer_style(layer);
        surface.set_shape_style(layer, shape, &ShapeStyle::selected());
        self.active_shape = Some(shape);

        let Some(bounds) = surface.shape_bounds(layer, shape) else {
            tracing::debug!(id = point.id, "shape has no boundary, skipping popup");
            return;
        };
        let center = bounds.center();
        surface.set_view(center, SHAPE_FOCUS_ZOOM);
        surface.close_popup();
        self.popup = surface.open_popup(&Popup {
            anchor: center.offset(POPUP_OFFSET_LAT, POPUP_OFFSET_LNG),
            content: PopupContent {
                title: point.name.clone(),
                body: point.value.as_ref().map(ToString::to_string),
            },
            close_button: false,
            auto_close: false,
            close_on_click: false,
            class_name: Some(INFO_POPUP_CLASS.to_string()),
        });
    }

    pub fn reset<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        if let Some(popup) = self.popup.take() {
            surface.remove_popup(popup);
        }
        if self.active_shape.take().is_some() {
            if let Some(layer) = self.layer {
                surface.reset_layer_style(layer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::geo::LatLng;
    use crate::geojson::Feature;
    use crate::surface::testing::RecordingSurface;

    fn square(id: &str, lng: f64, lat: f64) -> Feature {
        serde_json::from_value(json!({
            "type": "Feature",
            "properties": { "id": id },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[lng, lat], [lng + 2.0, lat], [lng + 2.0, lat + 2.0], [lng, lat]]]
            }
        }))
        .unwrap()
    }

    fn setup() -> (RecordingSurface, ShapeHighlighter) {
        let mut surface = RecordingSurface::default();
        let features = vec![
            square("3", 10.0, 59.0),
            square("46", 5.0, 60.0),
            Feature::new(Default::default(), None),
        ];
        let layer = surface
            .add_shape_layer(&features, &|_| ShapeStyle::default())
            .unwrap();
        let mut highlighter = ShapeHighlighter::new();
        highlighter.attach(layer);
        (surface, highlighter)
    }

    #[test]
    fn highlight_styles_pans_and_opens_offset_popup() {
        let (mut surface, mut highlighter) = setup();
        let point = DataPoint::new(3, "Oslo").with_value("14.29%".to_string());

        highlighter.highlight(&mut surface, ShapeKey(0), &point);

        assert_eq!(surface.highlighted_shapes(), vec![(LayerId(0), ShapeKey(0))]);
        assert_eq!(surface.view, Some((LatLng::new(60.0, 11.0), 5.0)));
        assert_eq!(surface.close_popup_calls, 1);

        let popup = surface.single_popup().unwrap();
        assert_eq!(popup.anchor, LatLng::new(60.0, 11.0).offset(0.2, 0.3));
        assert_eq!(popup.content.title, "Oslo");
        assert_eq!(popup.content.body.as_deref(), Some("14.29%"));
        assert!(!popup.close_button && !popup.auto_close && !popup.close_on_click);
        assert_eq!(popup.class_name.as_deref(), Some("info-popup"));
    }

    #[test]
    fn only_one_highlight_and_popup_survive_reselection() {
        let (mut surface, mut highlighter) = setup();
        let oslo = DataPoint::new(3, "Oslo");
        let vestland = DataPoint::new(46, "Vestland");

        for (key, point) in [(0, &oslo), (1, &vestland), (0, &oslo), (1, &vestland)] {
            highlighter.highlight(&mut surface, ShapeKey(key), point);
            assert_eq!(surface.highlighted_shapes(), vec![(LayerId(0), ShapeKey(key))]);
            assert_eq!(surface.open_popup_count(), 1);
        }
        assert_eq!(surface.single_popup().unwrap().content.title, "Vestland");
    }

    #[test]
    fn shape_without_boundary_is_styled_without_popup_or_pan() {
        let (mut surface, mut highlighter) = setup();
        highlighter.highlight(&mut surface, ShapeKey(0), &DataPoint::new(3, "Oslo"));
        let view = surface.view;

        highlighter.highlight(&mut surface, ShapeKey(2), &DataPoint::new(9, "Nowhere"));

        assert_eq!(surface.highlighted_shapes(), vec![(LayerId(0), ShapeKey(2))]);
        assert_eq!(surface.open_popup_count(), 0);
        assert_eq!(surface.view, view);
        assert_eq!(highlighter.popup(), None);
    }

    #[test]
    fn reset_is_idempotent() {
        let (mut surface, mut highlighter) = setup();
        highlighter.reset(&mut surface);

        highlighter.highlight(&mut surface, ShapeKey(1), &DataPoint::new(46, "Vestland"));
        highlighter.reset(&mut surface);
        highlighter.reset(&mut surface);

        assert!(surface.highlighted_shapes().is_empty());
        assert_eq!(surface.open_popup_count(), 0);
        assert_eq!(highlighter.active_shape(), None);
    }

    #[test]
    fn highlight_without_layer_does_nothing() {
        let mut surface = RecordingSurface::default();
        let mut highlighter = ShapeHighlighter::new();
        highlighter.highlight(&mut surface, ShapeKey(0), &DataPoint::new(1, "Oslo"));
        assert_eq!(surface.view, None);
        assert_eq!(highlighter.active_shape(), None);
    }
}
