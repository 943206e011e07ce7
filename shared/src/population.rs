//! Norwegian county population projections (SSB table export).

use crate::data_point::{DataPoint, DataPointId};
use crate::table::{DatasetError, Table, TableOptions, read_table};

pub const REGION_COLUMN: &str = "region";
pub const POPULATION_2024_COLUMN: &str = "Hovedalternativet (MMMM) 2024";
pub const POPULATION_2050_COLUMN: &str = "Hovedalternativet (MMMM) 2050";
pub const PROJECTION_CAPTION: &str = "Increase from 2024 to 2050";

const REQUIRED_COLUMNS: [&str; 3] = [REGION_COLUMN, POPULATION_2024_COLUMN, POPULATION_2050_COLUMN];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationSample {
    pub year: u16,
    pub population: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountyPopulation {
    pub county_id: String,
    pub county_name: String,
    pub history: Vec<PopulationSample>,
}

impl CountyPopulation {
    pub fn population(&self, year: u16) -> Option<f64> {
        self.history.iter().find(|s| s.year == year).map(|s| s.population)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationDataset {
    pub counties: Vec<CountyPopulation>,
    pub data_points: Vec<DataPoint>,
}

/// Region cell split at fixed character offsets: `"03 Oslo"` (quotes included)
/// gives id `03` and name `Oslo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSlice {
    pub id: String,
    pub name: String,
}

impl RegionSlice {
    pub fn parse(raw: &str) -> Option<Self> {
        let chars: Vec<char> = raw.chars().collect();
        if chars.len() < 4 {
            return None;
        }
        let id: String = chars[1..3].iter().collect();
        let name: String = chars[3..chars.len() - 1].iter().collect();
        Some(Self {
            id,
            name: name.trim().to_string(),
        })
    }
}

/// Relative change in percent, `None` when there is no baseline to compare against.
pub fn percentage_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 || !from.is_finite() || !to.is_finite() {
        return None;
    }
    Some((to - from) / from * 100.0)
}

/// Two decimals at most, trailing zeros dropped, with a `%` suffix: `14.29%`, `10%`.
pub fn format_percentage(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // avoid "-0%"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}%")
}

pub fn parse_population(text: &str) -> Result<PopulationDataset, DatasetError> {
    let table = read_table(text, TableOptions::default())?;
    check_columns(&table)?;

    let mut dataset = PopulationDataset::default();
    for (index, row) in table.rows().enumerate() {
        let line = index + 2;
        let field = |column: &str| {
            row.get(column).ok_or_else(|| DatasetError::MissingColumn {
                column: column.to_string(),
                row: line,
            })
        };
        let number = |column: &str| -> Result<f64, DatasetError> {
            let value = field(column)?;
            value.trim().parse().map_err(|_| DatasetError::InvalidNumber {
                column: column.to_string(),
                row: line,
                value: value.to_string(),
            })
        };

        let region = field(REGION_COLUMN)?;
        let invalid_region = || DatasetError::InvalidRegion {
            row: line,
            value: region.to_string(),
        };
        let slice = RegionSlice::parse(region).ok_or_else(invalid_region)?;
        let id: DataPointId = slice.id.trim().parse().map_err(|_| invalid_region())?;
        let before = number(POPULATION_2024_COLUMN)?;
        let after = number(POPULATION_2050_COLUMN)?;

        let mut point = DataPoint::new(id, slice.name.clone()).with_caption(PROJECTION_CAPTION);
        if let Some(change) = percentage_change(before, after) {
            point = point.with_value(format_percentage(change));
        }
        dataset.data_points.push(point);
        dataset.counties.push(CountyPopulation {
            county_id: slice.id,
            county_name: slice.name,
            history: vec![
                PopulationSample {
                    year: 2024,
                    population: before,
                },
                PopulationSample {
                    year: 2050,
                    population: after,
                },
            ],
        });
    }
    tracing::info!(counties = dataset.counties.len(), "parsed population projections");
    Ok(dataset)
}

fn check_columns(table: &Table) -> Result<(), DatasetError> {
    match REQUIRED_COLUMNS.iter().find(|c| table.column(c).is_none()) {
        Some(column) => Err(DatasetError::MissingColumn {
            column: column.to_string(),
            row: 1,
        }),
        None => Ok(()),
    }
}
