use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use leptos::prelude::*;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use geoscope_shared::config::{GLOBE_BACKGROUND_URL, GLOBE_IMAGE_URL};
use geoscope_shared::geojson::FeatureCollection;

const GLOBE_CONTAINER_ID: &str = "country-globe";
const HOVER_CAP_COLOR: &str = "#78716c";
const POLYGON_ALTITUDE: f64 = 0.00415;
const TRANSITION_MS: f64 = 300.0;

struct GlobeBinding {
    instance: JsValue,
    container: web_sys::Element,
    _cap_color: Closure<dyn Fn(JsValue) -> JsValue>,
    _edge_color: Closure<dyn Fn(JsValue) -> JsValue>,
    _on_hover: Closure<dyn Fn(JsValue)>,
    _on_click: Closure<dyn Fn(JsValue)>,
}

impl GlobeBinding {
    fn release(self) {
        if let Ok(destructor) = Reflect::get(&self.instance, &JsValue::from_str("_destructor")) {
            if let Some(destructor) = destructor.dyn_ref::<Function>() {
                if let Err(e) = destructor.call0(&self.instance) {
                    tracing::debug!(error = ?e, "globe destructor failed");
                }
            }
        }
        self.container.set_inner_html("");
    }
}

thread_local! {
    static GLOBE_BINDING: RefCell<Option<GlobeBinding>> = const { RefCell::new(None) };
}

/// Call a chainable globe.gl accessor such as `polygonsData(data)`.
fn call(target: &JsValue, method: &str, args: &[&JsValue]) -> Result<JsValue, JsValue> {
    let function: Function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into()?;
    let array = Array::new();
    for arg in args {
        array.push(arg);
    }
    function.apply(target, &array)
}

fn feature_name(polygon: &JsValue) -> Option<String> {
    let properties = Reflect::get(polygon, &JsValue::from_str("properties")).ok()?;
    Reflect::get(&properties, &JsValue::from_str("NAME")).ok()?.as_string()
}

fn mount_globe(
    countries: &FeatureCollection,
    on_country_click: Callback<String>,
) -> Result<GlobeBinding, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let container = document
        .get_element_by_id(GLOBE_CONTAINER_ID)
        .ok_or_else(|| JsValue::from_str("globe container missing"))?;
    let constructor: Function = Reflect::get(&window, &JsValue::from_str("Globe"))?.dyn_into()?;
    let instance = Reflect::construct(&constructor, &Array::of1(&container))?;

    let polygons = countries
        .features
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())?;

    let hovered = Rc::new(RefCell::new(JsValue::NULL));
    let cap_color = {
        let hovered = Rc::clone(&hovered);
        Closure::<dyn Fn(JsValue) -> JsValue>::new(move |polygon: JsValue| {
            if *hovered.borrow() == polygon {
                JsValue::from_str(HOVER_CAP_COLOR)
            } else {
                JsValue::from_str("transparent")
            }
        })
    };
    let edge_color =
        Closure::<dyn Fn(JsValue) -> JsValue>::new(|_polygon: JsValue| JsValue::from_str("black"));
    let on_hover = {
        let hovered = Rc::clone(&hovered);
        let instance = instance.clone();
        let cap_color_fn: Function = cap_color.as_ref().clone().unchecked_into();
        Closure::<dyn Fn(JsValue)>::new(move |polygon: JsValue| {
            *hovered.borrow_mut() = polygon;
            // Re-assigning the accessor makes globe.gl re-evaluate cap colors.
            if let Err(e) = call(&instance, "polygonCapColor", &[&cap_color_fn]) {
                tracing::debug!(error = ?e, "failed to refresh cap colors");
            }
        })
    };
    let on_click = Closure::<dyn Fn(JsValue)>::new(move |polygon: JsValue| {
        if polygon.is_null() || polygon.is_undefined() {
            return;
        }
        if let Some(name) = feature_name(&polygon) {
            on_country_click.run(name);
        }
    });

    call(&instance, "globeImageUrl", &[&JsValue::from_str(GLOBE_IMAGE_URL)])?;
    call(&instance, "backgroundImageUrl", &[&JsValue::from_str(GLOBE_BACKGROUND_URL)])?;
    call(&instance, "polygonsData", &[&polygons])?;
    call(&instance, "polygonAltitude", &[&JsValue::from_f64(POLYGON_ALTITUDE)])?;
    call(&instance, "polygonCapColor", &[cap_color.as_ref()])?;
    call(&instance, "polygonSideColor", &[edge_color.as_ref()])?;
    call(&instance, "polygonStrokeColor", &[edge_color.as_ref()])?;
    call(&instance, "onPolygonHover", &[on_hover.as_ref()])?;
    call(&instance, "onPolygonClick", &[on_click.as_ref()])?;
    call(&instance, "polygonsTransitionDuration", &[&JsValue::from_f64(TRANSITION_MS)])?;

    Ok(GlobeBinding {
        instance,
        container,
        _cap_color: cap_color,
        _edge_color: edge_color,
        _on_hover: on_hover,
        _on_click: on_click,
    })
}

fn release_globe() {
    GLOBE_BINDING.with(|slot| {
        if let Some(binding) = slot.borrow_mut().take() {
            binding.release();
        }
    });
}

/// Country shapes on a globe.gl globe. Clicking a country reports its `NAME`.
#[component]
pub fn CountryGlobe(countries: FeatureCollection, on_country_click: Callback<String>) -> impl IntoView {
    let mut pending = Some(countries);
    Effect::new(move || {
        let Some(countries) = pending.take() else {
            return;
        };
        release_globe();
        match mount_globe(&countries, on_country_click) {
            Ok(binding) => {
                tracing::info!(countries = countries.features.len(), "globe mounted");
                GLOBE_BINDING.with(|slot| *slot.borrow_mut() = Some(binding));
            }
            Err(e) => tracing::warn!(error = ?e, "failed to mount globe"),
        }
    });
    on_cleanup(release_globe);

    view! {
        <div id=GLOBE_CONTAINER_ID style="position: absolute; inset: 0; background: #000;" />
    }
}
