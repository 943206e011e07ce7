//! Leaflet bindings behind the shared `MapBackend`/`MapSurface` traits.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use geoscope_shared::chart::MapOptions;
use geoscope_shared::geo::{Bounds, LatLng};
use geoscope_shared::geojson::Feature;
use geoscope_shared::surface::{
    EventSink, LayerId, MapBackend, MapEvent, MapSurface, MarkerId, MarkerOptions, Popup,
    PopupContent, PopupId, ShapeKey, ShapeStyle,
};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = Map)]
    type LeafletMapJs;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn create_map(container_id: &str, options: &JsValue) -> Result<LeafletMapJs, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMapJs, center: &JsValue, zoom: f64) -> LeafletMapJs;

    #[wasm_bindgen(method, js_name = closePopup)]
    fn close_popup(this: &LeafletMapJs) -> LeafletMapJs;

    #[wasm_bindgen(method, js_name = remove)]
    fn remove_map(this: &LeafletMapJs) -> LeafletMapJs;

    /// Any Leaflet layer or control: tile layers, GeoJSON groups, markers, popups.
    type Layer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = geoJSON)]
    fn geo_json(data: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(at: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = icon)]
    fn icon(options: &JsValue) -> JsValue;

    #[wasm_bindgen(js_namespace = L, js_name = popup)]
    fn popup(options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = ["L", "control"], js_name = zoom)]
    fn zoom_control(options: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Layer, map: &LeafletMapJs) -> Layer;

    #[wasm_bindgen(method)]
    fn remove(this: &Layer) -> Layer;

    #[wasm_bindgen(method)]
    fn on(this: &Layer, event: &str, handler: &js_sys::Function) -> Layer;

    #[wasm_bindgen(method, js_name = setStyle)]
    fn set_style(this: &Layer, style: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Layer, content: &str) -> Layer;

    #[wasm_bindgen(method, js_name = openPopup)]
    fn open_popup(this: &Layer) -> Layer;

    #[wasm_bindgen(method, js_name = setLatLng)]
    fn set_lat_lng(this: &Layer, at: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = setContent)]
    fn set_content(this: &Layer, html: &str) -> Layer;

    #[wasm_bindgen(method, js_name = openOn)]
    fn open_on(this: &Layer, map: &LeafletMapJs) -> Layer;
}

/// Plain JS object/array for Leaflet options. Maps must not become ES `Map`s.
fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::UNDEFINED)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn popup_html(content: &PopupContent) -> String {
    match &content.body {
        Some(body) => format!(
            "<strong>{}</strong><br/>{}",
            escape_html(&content.title),
            escape_html(body)
        ),
        None => escape_html(&content.title),
    }
}

struct RenderedShape {
    layer: Layer,
    default_style: ShapeStyle,
    bounds: Option<Bounds>,
    _on_click: Closure<dyn Fn()>,
}

struct RenderedMarker {
    layer: Layer,
    _on_click: Option<Closure<dyn Fn()>>,
}

pub(crate) struct LeafletMap {
    map: LeafletMapJs,
    events: EventSink,
    layers: Vec<Vec<RenderedShape>>,
    markers: HashMap<MarkerId, RenderedMarker>,
    popups: HashMap<PopupId, Layer>,
    next_id: u32,
}

impl LeafletMap {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn shape(&self, layer: LayerId, shape: ShapeKey) -> Option<&RenderedShape> {
        self.layers.get(layer.0 as usize)?.get(shape.0)
    }

    fn release(self) {
        for popup in self.popups.values() {
            popup.remove();
        }
        for marker in self.markers.values() {
            marker.layer.remove();
        }
        for shape in self.layers.iter().flatten() {
            shape.layer.remove();
        }
        self.map.remove_map();
        // Closures drop here, after Leaflet stopped referencing them.
    }
}

impl MapSurface for LeafletMap {
    fn add_shape_layer(
        &mut self,
        features: &[Feature],
        style: &dyn Fn(&Feature) -> ShapeStyle,
    ) -> Option<LayerId> {
        let layer_id = LayerId(self.layers.len() as u32);
        let shapes = features
            .iter()
            .map(|feature| {
                let default_style = style(feature);
                let layer = geo_json(&to_js(feature), &to_js(&json!({ "style": &default_style })));
                let events = self.events.clone();
                let feature_id = feature.feature_id().map(str::to_string);
                let on_click = Closure::<dyn Fn()>::new(move || {
                    events(MapEvent::ShapeClicked {
                        layer: layer_id,
                        feature_id: feature_id.clone(),
                    });
                });
                layer.on("click", on_click.as_ref().unchecked_ref());
                layer.add_to(&self.map);
                RenderedShape {
                    layer,
                    default_style,
                    bounds: feature.boundary(),
                    _on_click: on_click,
                }
            })
            .collect();
        self.layers.push(shapes);
        Some(layer_id)
    }

    fn set_shape_style(&mut self, layer: LayerId, shape: ShapeKey, style: &ShapeStyle) {
        if let Some(shape) = self.shape(layer, shape) {
            shape.layer.set_style(&to_js(style));
        }
    }

    fn reset_layer_style(&mut self, layer: LayerId) {
        let Some(shapes) = self.layers.get(layer.0 as usize) else {
            return;
        };
        for shape in shapes {
            shape.layer.set_style(&to_js(&shape.default_style));
        }
    }

    fn shape_bounds(&self, layer: LayerId, shape: ShapeKey) -> Option<Bounds> {
        self.shape(layer, shape)?.bounds
    }

    fn remove_layer(&mut self, layer: LayerId) {
        let Some(shapes) = self.layers.get_mut(layer.0 as usize) else {
            return;
        };
        for shape in shapes.drain(..) {
            shape.layer.remove();
        }
    }

    fn add_marker(&mut self, at: LatLng, options: MarkerOptions) -> Option<MarkerId> {
        let marker_options = match &options.icon_url {
            Some(url) => {
                let icon = icon(&to_js(&json!({
                    "iconUrl": url,
                    "iconSize": [32, 32],
                    "iconAnchor": [16, 32],
                    "popupAnchor": [0, -32],
                })));
                let object = js_sys::Object::new();
                js_sys::Reflect::set(&object, &JsValue::from_str("icon"), &icon).ok()?;
                object.into()
            }
            None => js_sys::Object::new().into(),
        };
        let layer = marker(&to_js(&at), &marker_options);
        layer.add_to(&self.map);

        let on_click = options.data_point.map(|id| {
            let events = self.events.clone();
            let closure = Closure::<dyn Fn()>::new(move || events(MapEvent::MarkerClicked { id }));
            layer.on("click", closure.as_ref().unchecked_ref());
            closure
        });
        if let Some(content) = &options.popup {
            layer.bind_popup(&popup_html(content));
            if options.open_popup {
                layer.open_popup();
            }
        }

        let id = MarkerId(self.next_id());
        self.markers.insert(
            id,
            RenderedMarker {
                layer,
                _on_click: on_click,
            },
        );
        Some(id)
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        if let Some(marker) = self.markers.remove(&marker) {
            marker.layer.remove();
        }
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.map.set_view(&to_js(&center), zoom);
    }

    fn open_popup(&mut self, popup: &Popup) -> Option<PopupId> {
        let layer = self::popup(&to_js(&json!({
            "closeButton": popup.close_button,
            "autoClose": popup.auto_close,
            "closeOnClick": popup.close_on_click,
            "className": popup.class_name.as_deref().unwrap_or_default(),
        })));
        layer.set_lat_lng(&to_js(&popup.anchor));
        layer.set_content(&popup_html(&popup.content));
        layer.open_on(&self.map);
        let id = PopupId(self.next_id());
        self.popups.insert(id, layer);
        Some(id)
    }

    fn remove_popup(&mut self, popup: PopupId) {
        if let Some(layer) = self.popups.remove(&popup) {
            layer.remove();
        }
    }

    fn close_popup(&mut self) {
        self.map.close_popup();
    }
}

/// Creates Leaflet maps in page containers. Stateless; each map owns its resources.
pub(crate) struct LeafletBackend;

impl MapBackend for LeafletBackend {
    type Map = LeafletMap;

    fn create(
        &mut self,
        container_id: &str,
        options: &MapOptions,
        events: EventSink,
    ) -> Option<LeafletMap> {
        let document = web_sys::window()?.document()?;
        document.get_element_by_id(container_id)?;

        let map = match create_map(
            container_id,
            &to_js(&json!({ "zoomControl": false, "maxZoom": options.max_zoom })),
        ) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(container_id, error = ?e, "leaflet failed to create map");
                return None;
            }
        };
        map.set_view(&to_js(&options.center), options.zoom);
        tile_layer(
            &options.tile_url,
            &to_js(&json!({
                "maxZoom": options.max_zoom,
                "attribution": options.attribution,
            })),
        )
        .add_to(&map);
        zoom_control(&to_js(&json!({
            "position": options.zoom_control_position.as_str(),
        })))
        .add_to(&map);

        tracing::debug!(container_id, "leaflet map created");
        Some(LeafletMap {
            map,
            events,
            layers: Vec::new(),
            markers: HashMap::new(),
            popups: HashMap::new(),
            next_id: 0,
        })
    }

    fn destroy(&mut self, map: LeafletMap) {
        map.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_html_escapes_and_joins_lines() {
        let content = PopupContent {
            title: "Møre & Romsdal".into(),
            body: Some("<5%".into()),
        };
        assert_eq!(
            popup_html(&content),
            "<strong>Møre &amp; Romsdal</strong><br/>&lt;5%"
        );
        assert_eq!(popup_html(&PopupContent::text("Oslo")), "Oslo");
    }
}
