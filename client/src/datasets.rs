use serde::de::DeserializeOwned;

use geoscope_shared::catalog::{county_population_chart, fast_food_chart};
use geoscope_shared::chart::ChartConfig;
use geoscope_shared::config::{
    FAST_FOOD_CHAINS_FILE, NORWAY_COUNTIES_FILE, NORWAY_POPULATION_FILE, WORLD_COUNTRIES_FILE,
    dataset_url,
};
use geoscope_shared::data_point::MarkerDataPoint;
use geoscope_shared::geojson::FeatureCollection;
use geoscope_shared::population::parse_population;

async fn fetch_response(file: &str) -> Result<gloo_net::http::Response, String> {
    let url = dataset_url(file);
    let resp = gloo_net::http::Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    Ok(resp)
}

async fn fetch_json<T: DeserializeOwned>(file: &str) -> Result<T, String> {
    fetch_response(file)
        .await?
        .json::<T>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

async fn fetch_text(file: &str) -> Result<String, String> {
    fetch_response(file)
        .await?
        .text()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

/// World country shapes used by the globe and the country guesser.
pub(crate) async fn load_world_countries() -> Result<FeatureCollection, String> {
    let countries = fetch_json::<FeatureCollection>(WORLD_COUNTRIES_FILE).await?;
    tracing::info!(features = countries.features.len(), "world countries loaded");
    Ok(countries)
}

/// County shapes joined with the population projection table.
pub(crate) async fn load_county_chart() -> Result<ChartConfig, String> {
    let counties = fetch_json::<FeatureCollection>(NORWAY_COUNTIES_FILE).await?;
    let table = fetch_text(NORWAY_POPULATION_FILE).await?;
    let population = parse_population(&table).map_err(|e| e.to_string())?;
    tracing::info!(
        counties = counties.features.len(),
        data_points = population.data_points.len(),
        "county population loaded"
    );
    Ok(county_population_chart(counties, population))
}

pub(crate) async fn load_fast_food_chart() -> Result<ChartConfig, String> {
    let markers = fetch_json::<Vec<MarkerDataPoint>>(FAST_FOOD_CHAINS_FILE).await?;
    tracing::info!(markers = markers.len(), "fast food chains loaded");
    Ok(fast_food_chart(markers))
}
