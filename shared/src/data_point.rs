use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

pub type DataPointId = i64;

/// Value shown next to a data point: either a number or preformatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataPointValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for DataPointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataPointValue::Number(n) => write!(f, "{n}"),
            DataPointValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for DataPointValue {
    fn from(value: f64) -> Self {
        DataPointValue::Number(value)
    }
}

impl From<String> for DataPointValue {
    fn from(value: String) -> Self {
        DataPointValue::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub id: DataPointId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<DataPointValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<LatLng>,
    /// Secondary line rendered under the name in the side panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl DataPoint {
    pub fn new(id: DataPointId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            value: None,
            description: None,
            coordinates: None,
            caption: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<DataPointValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// A point of interest rendered as its own marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDataPoint {
    pub id: DataPointId,
    pub name: String,
    pub coordinates: LatLng,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl MarkerDataPoint {
    /// Popup text: the description when present, the name otherwise.
    pub fn popup_text(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => description,
            _ => &self.name,
        }
    }

    pub fn to_data_point(&self) -> DataPoint {
        DataPoint {
            id: self.id,
            name: self.name.clone(),
            value: None,
            description: self.description.clone(),
            coordinates: Some(self.coordinates),
            caption: None,
        }
    }
}

pub fn find_by_id(points: &[DataPoint], id: DataPointId) -> Option<&DataPoint> {
    points.iter().find(|point| point.id == id)
}

/// Parse the string id carried by a rendered feature back into a data point id.
/// Leading zeros are accepted, so `"03"` and `"3"` resolve to the same point.
pub fn parse_feature_id(raw: &str) -> Option<DataPointId> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_display_matches_browser_number_formatting() {
        assert_eq!(DataPointValue::Number(10.0).to_string(), "10");
        assert_eq!(DataPointValue::Number(14.29).to_string(), "14.29");
        assert_eq!(DataPointValue::Text("14.29%".into()).to_string(), "14.29%");
    }

    #[test]
    fn value_deserializes_numbers_and_strings() {
        let point: DataPoint =
            serde_json::from_value(serde_json::json!({ "id": 1, "name": "Oslo", "value": 42 }))
                .unwrap();
        assert_eq!(point.value, Some(DataPointValue::Number(42.0)));

        let point: DataPoint =
            serde_json::from_value(serde_json::json!({ "id": 2, "name": "Bergen", "value": "n/a" }))
                .unwrap();
        assert_eq!(point.value, Some(DataPointValue::Text("n/a".into())));
    }

    #[test]
    fn marker_popup_falls_back_to_name() {
        let mut marker: MarkerDataPoint = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Karl Johans gate",
            "coordinates": [59.913, 10.739],
            "imageUrl": "/icons/marker.png"
        }))
        .unwrap();
        assert_eq!(marker.popup_text(), "Karl Johans gate");
        assert_eq!(marker.image_url.as_deref(), Some("/icons/marker.png"));

        marker.description = Some(String::new());
        assert_eq!(marker.popup_text(), "Karl Johans gate");

        marker.description = Some("Open 24/7".into());
        assert_eq!(marker.popup_text(), "Open 24/7");
    }

    #[test]
    fn marker_converts_to_data_point_with_coordinates() {
        let marker = MarkerDataPoint {
            id: 3,
            name: "Gardermoen".into(),
            coordinates: LatLng::new(60.19, 11.1),
            description: None,
            image_url: None,
        };
        let point = marker.to_data_point();
        assert_eq!(point.id, 3);
        assert_eq!(point.coordinates, Some(LatLng::new(60.19, 11.1)));
    }

    #[test]
    fn feature_ids_parse_with_leading_zeros() {
        assert_eq!(parse_feature_id("03"), Some(3));
        assert_eq!(parse_feature_id(" 42 "), Some(42));
        assert_eq!(parse_feature_id("Oslo"), None);
        assert_eq!(parse_feature_id(""), None);
    }

    #[test]
    fn find_by_id_returns_matching_point() {
        let points = vec![DataPoint::new(1, "Oslo"), DataPoint::new(2, "Bergen")];
        assert_eq!(find_by_id(&points, 2).map(|p| p.name.as_str()), Some("Bergen"));
        assert!(find_by_id(&points, 9).is_none());
    }
}
