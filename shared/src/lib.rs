pub mod catalog;
pub mod chart;
pub mod config;
pub mod data_point;
pub mod explorer;
pub mod geo;
pub mod geojson;
pub mod marker_highlight;
pub mod population;
pub mod quiz;
pub mod shape_highlight;
pub mod surface;
pub mod table;

pub use chart::{ChartConfig, Dataset, MapOptions};
pub use data_point::{DataPoint, DataPointId, DataPointValue, MarkerDataPoint};
pub use explorer::{BackOutcome, MapExplorer, SelectionEvent, SelectionSource, ViewMode};
pub use geo::{Bounds, LatLng};
pub use geojson::{Feature, FeatureCollection};
pub use quiz::{CountryGuesser, QuizError, QuizStatus};
pub use surface::{MapAdapter, MapBackend, MapEvent, MapSurface};
pub use table::DatasetError;
