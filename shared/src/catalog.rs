use crate::chart::{ChartConfig, ChartSource, Dataset, LayerStyle, MapOptions};
use crate::data_point::MarkerDataPoint;
use crate::geo::LatLng;
use crate::geojson::FeatureCollection;
use crate::population::PopulationDataset;
use crate::surface::ShapeStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    FastFoodChains,
    CountyPopulation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    CountryGuesser,
}

/// Card shown on an overview page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry<K> {
    pub kind: K,
    pub title: &'static str,
    pub description: &'static str,
}

pub const CHARTS: [CatalogEntry<ChartKind>; 2] = [
    CatalogEntry {
        kind: ChartKind::FastFoodChains,
        title: "Fast Food Chains in Norway",
        description: "Explore the distribution of fast food chains across Norway",
    },
    CatalogEntry {
        kind: ChartKind::CountyPopulation,
        title: "County Population Development in Norway",
        description: "Explore the population development across Norwegian counties",
    },
];

pub const GAMES: [CatalogEntry<GameKind>; 1] = [CatalogEntry {
    kind: GameKind::CountryGuesser,
    title: "Country Guesser",
    description: "Guess the country based on the provided clues",
}];

pub fn chart_entry(kind: ChartKind) -> CatalogEntry<ChartKind> {
    match kind {
        ChartKind::FastFoodChains => CHARTS[0],
        ChartKind::CountyPopulation => CHARTS[1],
    }
}

pub fn ssb_population_source() -> ChartSource {
    ChartSource::new(
        "Statistics Norway (SSB) - Population Statistics",
        "https://www.ssb.no/befolkning",
    )
}

pub fn geojson_layer_source() -> ChartSource {
    ChartSource::new(
        "GeoJSON Layer by robhop",
        "https://github.com/robhop/fylker-og-kommuner/",
    )
}

pub fn geonorge_source() -> ChartSource {
    ChartSource::new("GeoNorge", "https://kartkatalog.geonorge.no/")
}

pub fn county_population_chart(
    counties: FeatureCollection,
    population: PopulationDataset,
) -> ChartConfig {
    ChartConfig {
        id: "county-population-development".to_string(),
        title: chart_entry(ChartKind::CountyPopulation).title.to_string(),
        description: "Explore population development trends across Norwegian counties over time"
            .to_string(),
        ideas: Vec::new(),
        sources: vec![ssb_population_source(), geojson_layer_source(), geonorge_source()],
        map_options: MapOptions::centered(LatLng::new(65.0, 15.0), 5.0).with_max_zoom(10.0),
        data_points: population.data_points,
        dataset: Dataset::GeoJson {
            collection: counties,
            style: LayerStyle {
                base: ShapeStyle {
                    color: "#3388ff".to_string(),
                    weight: 2.0,
                    fill_opacity: 0.5,
                    fill_color: None,
                },
                color_from_properties: true,
            },
        },
    }
}

pub fn fast_food_chart(markers: Vec<MarkerDataPoint>) -> ChartConfig {
    let entry = chart_entry(ChartKind::FastFoodChains);
    ChartConfig {
        id: "fast-food-chains".to_string(),
        title: entry.title.to_string(),
        description: entry.description.to_string(),
        ideas: Vec::new(),
        sources: Vec::new(),
        map_options: MapOptions::default(),
        data_points: markers.iter().map(MarkerDataPoint::to_data_point).collect(),
        dataset: Dataset::Markers(markers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_point::DataPoint;

    #[test]
    fn county_chart_uses_norway_view_and_three_sources() {
        let population = PopulationDataset {
            counties: Vec::new(),
            data_points: vec![DataPoint::new(3, "Oslo")],
        };
        let chart = county_population_chart(FeatureCollection::default(), population);

        assert_eq!(chart.title, "County Population Development in Norway");
        assert_eq!(chart.map_options.center, LatLng::new(65.0, 15.0));
        assert_eq!(chart.map_options.zoom, 5.0);
        assert_eq!(chart.map_options.max_zoom, 10.0);
        assert_eq!(chart.sources.len(), 3);
        assert_eq!(chart.data_points.len(), 1);
        assert!(matches!(
            chart.dataset,
            Dataset::GeoJson { ref style, .. } if style.color_from_properties && style.base.weight == 2.0
        ));
    }

    #[test]
    fn fast_food_chart_lists_every_marker() {
        let markers = vec![MarkerDataPoint {
            id: 5,
            name: "Peppes Pizza".into(),
            coordinates: LatLng::new(59.91, 10.75),
            description: None,
            image_url: None,
        }];
        let chart = fast_food_chart(markers);
        assert_eq!(chart.data_points[0].id, 5);
        assert_eq!(chart.dataset.markers().len(), 1);
    }

    #[test]
    fn catalog_entries_resolve() {
        for entry in &CHARTS {
            assert_eq!(chart_entry(entry.kind), *entry);
        }
        assert_eq!(GAMES[0].title, "Country Guesser");
    }
}
