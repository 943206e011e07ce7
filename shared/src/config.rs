use crate::geo::LatLng;

pub const TILE_URL: &str = match option_env!("GEOSCOPE_TILE_URL") {
    Some(url) => url,
    None => "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
};
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a>";

pub const DEFAULT_CENTER: LatLng = LatLng::new(59.95, 10.75);
pub const DEFAULT_ZOOM: f64 = 6.0;
pub const DEFAULT_MAX_ZOOM: f64 = 10.0;

pub const MAP_CONTAINER_ID: &str = "map-explorer";

// Highlighting
pub const SHAPE_FOCUS_ZOOM: f64 = 5.0;
pub const MARKER_FOCUS_ZOOM: f64 = 8.0;
/// Popups sit slightly north-east of the shape center so they don't cover it.
pub const POPUP_OFFSET_LAT: f64 = 0.2;
pub const POPUP_OFFSET_LNG: f64 = 0.3;
pub const INFO_POPUP_CLASS: &str = "info-popup";

// Country guesser
pub const QUIZ_QUESTION_COUNT: usize = 3;
pub const EXCLUDED_COUNTRY_NAME: &str = "Antarctica";
pub const EXCLUDED_COUNTRY_ISO: &str = "AQ";

// Static assets
pub const DATASET_BASE: &str = match option_env!("GEOSCOPE_DATASET_BASE") {
    Some(base) => base,
    None => "/datasets",
};
pub const WORLD_COUNTRIES_FILE: &str = "world-countries.geojson";
pub const NORWAY_COUNTIES_FILE: &str = "norway-counties.geojson";
pub const NORWAY_POPULATION_FILE: &str = "norway-population.csv";
pub const FAST_FOOD_CHAINS_FILE: &str = "fast-food-chains.json";

pub const GLOBE_IMAGE_URL: &str = "//cdn.jsdelivr.net/npm/three-globe@2.42.3/example/img/earth-day.jpg";
pub const GLOBE_BACKGROUND_URL: &str = "//cdn.jsdelivr.net/npm/three-globe/example/img/night-sky.png";

/// Full URL of a static dataset file.
pub fn dataset_url(file: &str) -> String {
    format!("{}/{}", DATASET_BASE.trim_end_matches('/'), file)
}

#[cfg(test)]
mod tests {
    use super::dataset_url;

    #[test]
    fn dataset_url_joins_base_and_file() {
        assert!(dataset_url("a.csv").ends_with("/a.csv"));
        assert!(!dataset_url("a.csv").contains("//a.csv"));
    }
}
