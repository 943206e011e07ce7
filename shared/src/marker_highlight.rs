use crate::config::MARKER_FOCUS_ZOOM;
use crate::data_point::{DataPointId, MarkerDataPoint};
use crate::surface::{MapSurface, MarkerId, MarkerOptions, PopupContent};

/// Owns the single focus marker shown for the selected marker data point.
#[derive(Debug, Default)]
pub struct MarkerHighlighter {
    marker: Option<MarkerId>,
}

impl MarkerHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_marker(&self) -> Option<MarkerId> {
        self.marker
    }

    /// Returns `false` and leaves the map untouched when `id` is not among `markers`.
    pub fn highlight<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        markers: &[MarkerDataPoint],
        id: DataPointId,
    ) -> bool {
        let Some(point) = markers.iter().find(|m| m.id == id) else {
            tracing::debug!(id, "no marker for id, ignoring");
            return false;
        };

        surface.close_popup();
        surface.set_view(point.coordinates, MARKER_FOCUS_ZOOM);
        if let Some(previous) = self.marker.take() {
            surface.remove_marker(previous);
        }
        self.marker = surface.add_marker(
            point.coordinates,
            MarkerOptions {
                data_point: None,
                icon_url: point.image_url.clone(),
                popup: Some(PopupContent::text(point.popup_text())),
                open_popup: true,
            },
        );
        true
    }

    pub fn reset<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        if let Some(marker) = self.marker.take() {
            surface.remove_marker(marker);
            surface.close_popup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLng;
    use crate::surface::testing::RecordingSurface;

    fn markers() -> Vec<MarkerDataPoint> {
        vec![
            MarkerDataPoint {
                id: 1,
                name: "Peppes Pizza".into(),
                coordinates: LatLng::new(59.91, 10.75),
                description: Some("Founded 1970".into()),
                image_url: Some("/icons/peppes.png".into()),
            },
            MarkerDataPoint {
                id: 2,
                name: "Burger King".into(),
                coordinates: LatLng::new(60.39, 5.32),
                description: None,
                image_url: None,
            },
        ]
    }

    #[test]
    fn highlight_pans_and_opens_popup_on_single_marker() {
        let mut surface = RecordingSurface::default();
        let mut highlighter = MarkerHighlighter::new();
        let markers = markers();

        assert!(highlighter.highlight(&mut surface, &markers, 1));
        assert!(highlighter.highlight(&mut surface, &markers, 2));

        assert_eq!(surface.view, Some((LatLng::new(60.39, 5.32), 8.0)));
        assert_eq!(surface.markers.len(), 1);
        let marker = surface.markers.values().next().unwrap();
        assert_eq!(marker.at, LatLng::new(60.39, 5.32));
        assert!(marker.popup_open);
        assert_eq!(
            marker.options.popup,
            Some(PopupContent::text("Burger King"))
        );
        assert_eq!(surface.open_popup_count(), 1);
    }

    #[test]
    fn popup_prefers_description() {
        let mut surface = RecordingSurface::default();
        let mut highlighter = MarkerHighlighter::new();
        highlighter.highlight(&mut surface, &markers(), 1);

        let marker = surface.markers.values().next().unwrap();
        assert_eq!(marker.options.popup, Some(PopupContent::text("Founded 1970")));
        assert_eq!(marker.options.icon_url.as_deref(), Some("/icons/peppes.png"));
    }

    #[test]
    fn unknown_id_leaves_previous_marker_alone() {
        let mut surface = RecordingSurface::default();
        let mut highlighter = MarkerHighlighter::new();
        let markers = markers();
        highlighter.highlight(&mut surface, &markers, 1);
        let before = highlighter.active_marker();
        let closes = surface.close_popup_calls;

        assert!(!highlighter.highlight(&mut surface, &markers, 99));

        assert_eq!(highlighter.active_marker(), before);
        assert_eq!(surface.markers.len(), 1);
        assert_eq!(surface.close_popup_calls, closes);
        assert_eq!(surface.view, Some((LatLng::new(59.91, 10.75), 8.0)));
    }

    #[test]
    fn reset_removes_marker_and_is_idempotent() {
        let mut surface = RecordingSurface::default();
        let mut highlighter = MarkerHighlighter::new();
        highlighter.reset(&mut surface);

        highlighter.highlight(&mut surface, &markers(), 2);
        highlighter.reset(&mut surface);
        highlighter.reset(&mut surface);

        assert!(surface.markers.is_empty());
        assert_eq!(surface.open_popup_count(), 0);
        assert_eq!(highlighter.active_marker(), None);
    }
}
