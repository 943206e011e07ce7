use serde::{Deserialize, Serialize};

/// Geographic coordinate. Serialized as `[lat, lng]`, the order data points use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build from a GeoJSON position (`[lng, lat, ...]`). Returns `None` for short positions.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lng, lat, ..] => Some(Self::new(*lat, *lng)),
            _ => None,
        }
    }

    pub fn offset(self, d_lat: f64, d_lng: f64) -> Self {
        Self::new(self.lat + d_lat, self.lng + d_lng)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self::new(lat, lng)
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(value: LatLng) -> Self {
        [value.lat, value.lng]
    }
}

/// Axis-aligned lat/lng box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    pub fn new(a: LatLng, b: LatLng) -> Self {
        Self {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    /// Smallest box containing every point, or `None` when there are no points.
    pub fn from_points<I: IntoIterator<Item = LatLng>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self::new(first, first);
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    pub fn union(mut self, other: Bounds) -> Self {
        self.extend(other.south_west);
        self.extend(other.north_east);
        self
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }
}

#[cfg(test)]
mod tests {
    use super::{Bounds, LatLng};

    #[test]
    fn latlng_serializes_as_lat_lng_pair() {
        let value = serde_json::to_value(LatLng::new(59.9, 10.7)).unwrap();
        assert_eq!(value, serde_json::json!([59.9, 10.7]));
        let parsed: LatLng = serde_json::from_value(serde_json::json!([63.4, 10.4])).unwrap();
        assert_eq!(parsed, LatLng::new(63.4, 10.4));
    }

    #[test]
    fn from_position_swaps_to_lat_first() {
        assert_eq!(
            LatLng::from_position(&[10.0, 60.0, 120.0]),
            Some(LatLng::new(60.0, 10.0))
        );
        assert_eq!(LatLng::from_position(&[10.0]), None);
    }

    #[test]
    fn bounds_center_is_midpoint() {
        let bounds = Bounds::from_points([
            LatLng::new(58.0, 5.0),
            LatLng::new(62.0, 11.0),
            LatLng::new(60.0, 7.0),
        ])
        .unwrap();
        assert_eq!(bounds.south_west, LatLng::new(58.0, 5.0));
        assert_eq!(bounds.north_east, LatLng::new(62.0, 11.0));
        assert_eq!(bounds.center(), LatLng::new(60.0, 8.0));
        assert!(bounds.contains(LatLng::new(59.0, 6.0)));
        assert!(!bounds.contains(LatLng::new(57.0, 6.0)));
    }

    #[test]
    fn bounds_from_no_points_is_none() {
        assert_eq!(Bounds::from_points(std::iter::empty()), None);
    }
}
