use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::config::{EXCLUDED_COUNTRY_ISO, EXCLUDED_COUNTRY_NAME};
use crate::geo::{Bounds, LatLng};

/// GeoJSON position: `[lng, lat]` with an optional altitude.
pub type Position = Vec<f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    /// Bounding box over every position. A lone point has no extent and yields `None`.
    pub fn bounds(&self) -> Option<Bounds> {
        if matches!(self, Geometry::Point { .. }) {
            return None;
        }
        let mut points = Vec::new();
        self.collect_points(&mut points);
        Bounds::from_points(points)
    }

    fn collect_points(&self, out: &mut Vec<LatLng>) {
        let push = |out: &mut Vec<LatLng>, position: &Position| {
            if let Some(point) = LatLng::from_position(position) {
                out.push(point);
            }
        };
        match self {
            Geometry::Point { coordinates } => push(out, coordinates),
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                coordinates.iter().for_each(|p| push(out, p));
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter().flatten().for_each(|p| push(out, p));
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().for_each(|p| push(out, p));
            }
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.collect_points(out);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// String form of the data point id this shape represents.
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(rename = "NAME", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "ISO_A2", default, skip_serializing_if = "Option::is_none")]
    pub iso_a2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// GeoJSON allows `"properties": null`; treat it like an empty object.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: FeatureProperties,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn new(properties: FeatureProperties, geometry: Option<Geometry>) -> Self {
        Self {
            properties,
            geometry,
        }
    }

    pub fn feature_id(&self) -> Option<&str> {
        self.properties.id.as_deref()
    }

    pub fn boundary(&self) -> Option<Bounds> {
        self.geometry.as_ref().and_then(Geometry::bounds)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Copy of the collection without features tagged with the given ISO code.
    pub fn without_country(&self, iso_a2: &str) -> Self {
        Self::new(
            self.features
                .iter()
                .filter(|f| f.properties.iso_a2.as_deref() != Some(iso_a2))
                .cloned()
                .collect(),
        )
    }

    /// Country shapes the globe draws.
    pub fn renderable_countries(&self) -> Self {
        self.without_country(EXCLUDED_COUNTRY_ISO)
    }

    /// Candidate answers for the country guesser, in dataset order without duplicates.
    pub fn country_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.features
            .iter()
            .filter_map(|f| f.properties.name.as_deref())
            .filter(|name| !name.is_empty() && *name != EXCLUDED_COUNTRY_NAME)
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect()
    }
}
