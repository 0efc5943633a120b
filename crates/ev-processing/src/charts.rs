//! Chart-ready datasets computed from a cleaned session table.
//!
//! Nothing here draws pixels. Each [`Chart`] carries the aggregated points a
//! plotting front end needs, and [`ChartRenderer::write_json`] saves the
//! whole set as `charts.json`.

use crate::error::{PreprocessingError, Result};
use crate::schema::{
    CHARGER_TYPE, CHARGING_COST_USD, CHARGING_RATE_KW, CHARGING_STATION_ID,
    CHARGING_STATION_LOCATION, DAY_OF_WEEK, ENERGY_CONSUMED_KWH, ORDERED_DAYS, ORDERED_TIMES,
    TIME_OF_DAY, USER_TYPE, VEHICLE_MODEL,
};
use crate::utils::series_to_strings;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Charger type excluded from the rate chart.
const EXCLUDED_CHARGER_TYPE: &str = "Level";

/// User types compared in the vehicle-preference chart.
const COMPARED_USER_TYPES: [&str; 2] = ["Commuter", "Long Distance Traveler"];

/// Bubble sizes are rescaled into this range.
const BUBBLE_SIZE_RANGE: (f64, f64) = (100.0, 1000.0);

const COST_PER_KWH: &str = "CostPerKwh";
const SESSIONS: &str = "Sessions";
const STATIONS: &str = "Stations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Line,
    Bubble,
    Heatmap,
    GroupedBar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: String,
    pub y: f64,
    /// Marker size, bubble charts only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl DataPoint {
    pub fn new(x: impl Into<String>, y: f64) -> Self {
        Self {
            x: x.into(),
            y,
            size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSeries {
    pub name: String,
    pub points: Vec<DataPoint>,
}

impl DataSeries {
    pub fn new(name: impl Into<String>, points: Vec<DataPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// The point at `x`, if present.
    pub fn point(&self, x: &str) -> Option<&DataPoint> {
        self.points.iter().find(|p| p.x == x)
    }
}

/// One chart's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub id: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
    pub series: Vec<DataSeries>,
}

impl Chart {
    fn new(
        id: &str,
        title: &str,
        x_label: &str,
        y_label: &str,
        kind: ChartKind,
        series: Vec<DataSeries>,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            kind,
            series,
        }
    }

    pub fn series_named(&self, name: &str) -> Option<&DataSeries> {
        self.series.iter().find(|s| s.name == name)
    }
}

/// Builds the fixed set of session charts.
pub struct ChartRenderer;

impl ChartRenderer {
    /// Build all seven charts from a cleaned table.
    pub fn build_all(df: &DataFrame) -> Result<Vec<Chart>> {
        let charts = vec![
            Self::charging_rate_by_charger_type(df)?,
            Self::cost_per_kwh_by_location(df)?,
            Self::energy_by_day(df)?,
            Self::vehicle_models_by_user_type(df)?,
            Self::stations_by_location(df)?,
            Self::sessions_by_day_and_time(df)?,
            Self::energy_by_model_and_time(df)?,
        ];
        info!("Built {} chart datasets", charts.len());
        Ok(charts)
    }

    /// Save charts as pretty JSON to `<dir>/charts.json`.
    pub fn write_json(charts: &[Chart], dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join("charts.json");
        let mut file = File::create(&path)?;
        file.write_all(serde_json::to_string_pretty(charts)?.as_bytes())?;

        info!("Charts saved: {}", path.display());
        Ok(path)
    }

    /// Average charging rate per charger type, `Level` excluded, highest first.
    pub fn charging_rate_by_charger_type(df: &DataFrame) -> Result<Chart> {
        require_columns(df, &[CHARGER_TYPE, CHARGING_RATE_KW])?;

        let out = df
            .clone()
            .lazy()
            .filter(
                col(CHARGER_TYPE)
                    .is_not_null()
                    .and(col(CHARGER_TYPE).neq(lit(EXCLUDED_CHARGER_TYPE))),
            )
            .group_by([col(CHARGER_TYPE)])
            .agg([col(CHARGING_RATE_KW).mean()])
            .sort_by_exprs(
                [col(CHARGING_RATE_KW), col(CHARGER_TYPE)],
                descending_then_label(),
            )
            .collect()?;

        let points = points(&out, CHARGER_TYPE, CHARGING_RATE_KW)?;
        Ok(Chart::new(
            "charging_rate_by_charger_type",
            "Average Charging Rate by Charger Type",
            "Charger Type",
            "Average Charging Rate",
            ChartKind::Bar,
            vec![DataSeries::new(CHARGING_RATE_KW, points)],
        ))
    }

    /// Average cost per kWh per location, highest first.
    pub fn cost_per_kwh_by_location(df: &DataFrame) -> Result<Chart> {
        require_columns(
            df,
            &[CHARGING_STATION_LOCATION, CHARGING_COST_USD, ENERGY_CONSUMED_KWH],
        )?;

        let out = df
            .clone()
            .lazy()
            .filter(col(CHARGING_STATION_LOCATION).is_not_null())
            .with_column((col(CHARGING_COST_USD) / col(ENERGY_CONSUMED_KWH)).alias(COST_PER_KWH))
            .group_by([col(CHARGING_STATION_LOCATION)])
            .agg([col(COST_PER_KWH).mean()])
            .sort_by_exprs(
                [col(COST_PER_KWH), col(CHARGING_STATION_LOCATION)],
                descending_then_label(),
            )
            .collect()?;

        let points = points(&out, CHARGING_STATION_LOCATION, COST_PER_KWH)?;
        Ok(Chart::new(
            "cost_per_kwh_by_location",
            "Average Charging Cost by Location",
            "Location",
            "Average Cost per kWh (USD)",
            ChartKind::Bar,
            vec![DataSeries::new(COST_PER_KWH, points)],
        ))
    }

    /// Average energy consumed per weekday, Monday first.
    pub fn energy_by_day(df: &DataFrame) -> Result<Chart> {
        require_columns(df, &[DAY_OF_WEEK, ENERGY_CONSUMED_KWH])?;

        let out = df
            .clone()
            .lazy()
            .filter(col(DAY_OF_WEEK).is_not_null())
            .group_by([col(DAY_OF_WEEK)])
            .agg([col(ENERGY_CONSUMED_KWH).mean()])
            .collect()?;

        let by_day: HashMap<String, DataPoint> = points(&out, DAY_OF_WEEK, ENERGY_CONSUMED_KWH)?
            .into_iter()
            .map(|p| (p.x.clone(), p))
            .collect();
        let points = axis_order(&ORDERED_DAYS, by_day.keys().map(String::as_str))
            .into_iter()
            .filter_map(|day| by_day.get(&day).cloned())
            .collect();

        Ok(Chart::new(
            "energy_by_day",
            "Average Energy Consumption by Day of the Week",
            "Day of the Week",
            "Average Energy Consumption (kWh)",
            ChartKind::Line,
            vec![DataSeries::new(ENERGY_CONSUMED_KWH, points)],
        ))
    }

    /// Vehicle-model session counts for commuters and long-distance
    /// travelers, smallest first.
    pub fn vehicle_models_by_user_type(df: &DataFrame) -> Result<Chart> {
        require_columns(df, &[USER_TYPE, VEHICLE_MODEL])?;

        let series = COMPARED_USER_TYPES
            .iter()
            .map(|user_type| {
                let out = df
                    .clone()
                    .lazy()
                    .filter(
                        col(USER_TYPE)
                            .eq(lit(*user_type))
                            .and(col(VEHICLE_MODEL).is_not_null()),
                    )
                    .group_by([col(VEHICLE_MODEL)])
                    .agg([len().cast(DataType::Float64).alias(SESSIONS)])
                    .sort_by_exprs(
                        [col(SESSIONS), col(VEHICLE_MODEL)],
                        SortMultipleOptions::default(),
                    )
                    .collect()?;
                Ok(DataSeries::new(*user_type, points(&out, VEHICLE_MODEL, SESSIONS)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Chart::new(
            "vehicle_models_by_user_type",
            "Vehicle Model Preferences of User Types",
            "Sessions",
            "Vehicle Model",
            ChartKind::HorizontalBar,
            series,
        ))
    }

    /// Distinct stations per location; bubble size tracks mean energy.
    pub fn stations_by_location(df: &DataFrame) -> Result<Chart> {
        require_columns(
            df,
            &[CHARGING_STATION_LOCATION, CHARGING_STATION_ID, ENERGY_CONSUMED_KWH],
        )?;

        let out = df
            .clone()
            .lazy()
            .filter(col(CHARGING_STATION_LOCATION).is_not_null())
            .group_by([col(CHARGING_STATION_LOCATION)])
            .agg([
                col(CHARGING_STATION_ID)
                    .n_unique()
                    .cast(DataType::Float64)
                    .alias(STATIONS),
                col(ENERGY_CONSUMED_KWH).mean(),
            ])
            .sort_by_exprs(
                [col(CHARGING_STATION_LOCATION)],
                SortMultipleOptions::default(),
            )
            .collect()?;

        let mut points = points(&out, CHARGING_STATION_LOCATION, STATIONS)?;
        let energy = points_by_label(&out, CHARGING_STATION_LOCATION, ENERGY_CONSUMED_KWH)?;
        let energies: Vec<f64> = points
            .iter()
            .map(|p| energy.get(&p.x).copied().unwrap_or(f64::NAN))
            .collect();
        for (point, size) in points.iter_mut().zip(rescale(&energies, BUBBLE_SIZE_RANGE)) {
            point.size = size;
        }

        Ok(Chart::new(
            "stations_by_location",
            "Size of Average Energy Consumption by Location and Station Count",
            "Location",
            "Charging Station Count",
            ChartKind::Bubble,
            vec![DataSeries::new(STATIONS, points)],
        ))
    }

    /// Session counts by weekday (x) and time of day (one series each),
    /// with absent combinations filled with zero.
    pub fn sessions_by_day_and_time(df: &DataFrame) -> Result<Chart> {
        require_columns(df, &[DAY_OF_WEEK, TIME_OF_DAY])?;

        let out = df
            .clone()
            .lazy()
            .filter(
                col(DAY_OF_WEEK)
                    .is_not_null()
                    .and(col(TIME_OF_DAY).is_not_null()),
            )
            .group_by([col(DAY_OF_WEEK), col(TIME_OF_DAY)])
            .agg([len().cast(DataType::Float64).alias(SESSIONS)])
            .collect()?;

        let days = labels(&out, DAY_OF_WEEK)?;
        let times = labels(&out, TIME_OF_DAY)?;
        let counts = numbers(&out, SESSIONS)?;

        let mut cells: HashMap<(String, String), f64> = HashMap::new();
        for ((day, time), count) in days.iter().zip(&times).zip(&counts) {
            if let (Some(day), Some(time), Some(count)) = (day, time, count) {
                cells.insert((day.clone(), time.clone()), *count);
            }
        }

        let day_axis = axis_order(&ORDERED_DAYS, days.iter().flatten().map(String::as_str));
        let time_axis = axis_order(&ORDERED_TIMES, times.iter().flatten().map(String::as_str));

        let series = time_axis
            .iter()
            .map(|time| {
                let points = day_axis
                    .iter()
                    .map(|day| {
                        let count = cells
                            .get(&(day.clone(), time.clone()))
                            .copied()
                            .unwrap_or(0.0);
                        DataPoint::new(day.clone(), count)
                    })
                    .collect();
                DataSeries::new(time.clone(), points)
            })
            .collect();

        Ok(Chart::new(
            "sessions_by_day_and_time",
            "Charge Distribution by Day of the Week and Time of Day",
            "Day of the Week",
            "Time of Day",
            ChartKind::Heatmap,
            series,
        ))
    }

    /// Mean energy per vehicle model, one series per time of day.
    pub fn energy_by_model_and_time(df: &DataFrame) -> Result<Chart> {
        require_columns(df, &[VEHICLE_MODEL, TIME_OF_DAY, ENERGY_CONSUMED_KWH])?;

        let out = df
            .clone()
            .lazy()
            .filter(
                col(VEHICLE_MODEL)
                    .is_not_null()
                    .and(col(TIME_OF_DAY).is_not_null()),
            )
            .group_by([col(VEHICLE_MODEL), col(TIME_OF_DAY)])
            .agg([col(ENERGY_CONSUMED_KWH).mean()])
            .sort_by_exprs(
                [col(VEHICLE_MODEL), col(TIME_OF_DAY)],
                SortMultipleOptions::default(),
            )
            .collect()?;

        let models = labels(&out, VEHICLE_MODEL)?;
        let times = labels(&out, TIME_OF_DAY)?;
        let energy = numbers(&out, ENERGY_CONSUMED_KWH)?;

        let time_axis = axis_order(&ORDERED_TIMES, times.iter().flatten().map(String::as_str));
        let series = time_axis
            .into_iter()
            .map(|time| {
                let points = models
                    .iter()
                    .zip(&times)
                    .zip(&energy)
                    .filter_map(|((model, t), value)| match (model, t, value) {
                        (Some(model), Some(t), Some(value)) if *t == time => {
                            Some(DataPoint::new(model.clone(), *value))
                        }
                        _ => None,
                    })
                    .collect();
                DataSeries::new(time, points)
            })
            .collect();

        Ok(Chart::new(
            "energy_by_model_and_time",
            "Energy Consumed by Vehicle Model and Time of Day",
            "Vehicle Model",
            "Avg. Energy Consumed (kWh)",
            ChartKind::GroupedBar,
            series,
        ))
    }
}

fn require_columns(df: &DataFrame, names: &[&str]) -> Result<()> {
    for name in names {
        if df.get_column_index(name).is_none() {
            return Err(PreprocessingError::ColumnNotFound(name.to_string()));
        }
    }
    Ok(())
}

fn descending_then_label() -> SortMultipleOptions {
    SortMultipleOptions::default().with_order_descending_multi([true, false])
}

fn labels(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    series_to_strings(df.column(name)?.as_materialized_series())
}

fn numbers(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// Pair a label column with a value column, skipping rows where either is null.
fn points(df: &DataFrame, x: &str, y: &str) -> Result<Vec<DataPoint>> {
    let xs = labels(df, x)?;
    let ys = numbers(df, y)?;
    Ok(xs
        .into_iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(DataPoint::new(x?, y?)))
        .collect())
}

fn points_by_label(df: &DataFrame, x: &str, y: &str) -> Result<HashMap<String, f64>> {
    Ok(points(df, x, y)?.into_iter().map(|p| (p.x, p.y)).collect())
}

/// Canonical labels that are present, in canonical order, followed by any
/// other present labels sorted alphabetically.
fn axis_order<'a>(canonical: &[&str], present: impl Iterator<Item = &'a str>) -> Vec<String> {
    let present: BTreeSet<&str> = present.collect();
    let mut axis: Vec<String> = canonical
        .iter()
        .filter(|label| present.contains(*label))
        .map(|label| label.to_string())
        .collect();
    axis.extend(
        present
            .iter()
            .filter(|label| !canonical.contains(*label))
            .map(|label| label.to_string()),
    );
    axis
}

/// Linear rescale into `[lo, hi]`. When every value is equal they all map
/// to `hi`. Non-finite inputs get no size.
fn rescale(values: &[f64], (lo, hi): (f64, f64)) -> Vec<Option<f64>> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let min = finite.clone().fold(f64::INFINITY, f64::min);
    let max = finite.fold(f64::NEG_INFINITY, f64::max);
    debug!("Rescaling bubble sizes from [{min}, {max}]");

    values
        .iter()
        .map(|v| {
            if !v.is_finite() {
                None
            } else if max > min {
                Some(lo + (v - min) * (hi - lo) / (max - min))
            } else {
                Some(hi)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cleaned_sessions() -> DataFrame {
        df![
            VEHICLE_MODEL => ["Tesla Model 3", "Tesla Model 3", "BMW i3", "Nissan Leaf", "BMW i3", "Tesla Model 3"],
            CHARGING_STATION_ID => ["Station_1", "Station_2", "Station_1", "Station_3", "Station_3", "Station_4"],
            CHARGING_STATION_LOCATION => ["Houston", "Houston", "Chicago", "Chicago", "Chicago", "Houston"],
            ENERGY_CONSUMED_KWH => [10.0, 30.0, 20.0, 40.0, 30.0, 20.0],
            CHARGING_RATE_KW => [10.0, 20.0, 50.0, 5.0, 60.0, 30.0],
            CHARGING_COST_USD => [5.0, 15.0, 4.0, 8.0, 6.0, 10.0],
            TIME_OF_DAY => ["Morning", "Evening", "Morning", "Night", "Evening", "Morning"],
            DAY_OF_WEEK => ["Tuesday", "Monday", "Monday", "Sunday", "Tuesday", "Tuesday"],
            CHARGER_TYPE => ["Level 2", "Level", "Dc Fast Charger", "Level 1", "Dc Fast Charger", "Level 2"],
            USER_TYPE => ["Commuter", "Commuter", "Long Distance Traveler", "Casual Driver", "Commuter", "Commuter"],
        ]
        .unwrap()
    }

    #[test]
    fn test_build_all_returns_seven_charts() {
        let charts = ChartRenderer::build_all(&cleaned_sessions()).unwrap();
        let ids: Vec<&str> = charts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "charging_rate_by_charger_type",
                "cost_per_kwh_by_location",
                "energy_by_day",
                "vehicle_models_by_user_type",
                "stations_by_location",
                "sessions_by_day_and_time",
                "energy_by_model_and_time",
            ]
        );
    }

    #[test]
    fn test_charging_rate_excludes_level_and_sorts_descending() {
        let chart = ChartRenderer::charging_rate_by_charger_type(&cleaned_sessions()).unwrap();
        let series = &chart.series[0];
        let labels: Vec<&str> = series.points.iter().map(|p| p.x.as_str()).collect();

        assert_eq!(labels, vec!["Dc Fast Charger", "Level 2", "Level 1"]);
        assert_eq!(series.point("Dc Fast Charger").unwrap().y, 55.0);
        assert_eq!(series.point("Level 2").unwrap().y, 20.0);
        assert!(series.point("Level").is_none());
    }

    #[test]
    fn test_cost_per_kwh_by_location() {
        let chart = ChartRenderer::cost_per_kwh_by_location(&cleaned_sessions()).unwrap();
        let series = &chart.series[0];

        // Houston: (0.5 + 0.5 + 0.5) / 3, Chicago: (0.2 + 0.2 + 0.2) / 3
        assert_eq!(series.points[0].x, "Houston");
        assert!((series.points[0].y - 0.5).abs() < 1e-9);
        assert_eq!(series.points[1].x, "Chicago");
        assert!((series.points[1].y - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_energy_by_day_uses_weekday_order() {
        let chart = ChartRenderer::energy_by_day(&cleaned_sessions()).unwrap();
        let labels: Vec<&str> = chart.series[0].points.iter().map(|p| p.x.as_str()).collect();
        assert_eq!(labels, vec!["Monday", "Tuesday", "Sunday"]);
        assert_eq!(chart.series[0].point("Monday").unwrap().y, 25.0);
    }

    #[test]
    fn test_vehicle_models_by_user_type_ascending() {
        let chart = ChartRenderer::vehicle_models_by_user_type(&cleaned_sessions()).unwrap();

        let commuter = chart.series_named("Commuter").unwrap();
        let labels: Vec<&str> = commuter.points.iter().map(|p| p.x.as_str()).collect();
        assert_eq!(labels, vec!["BMW i3", "Tesla Model 3"]);
        assert_eq!(commuter.point("Tesla Model 3").unwrap().y, 3.0);

        let traveler = chart.series_named("Long Distance Traveler").unwrap();
        assert_eq!(traveler.points, vec![DataPoint::new("BMW i3", 1.0)]);
    }

    #[test]
    fn test_stations_by_location_bubble_sizes() {
        let chart = ChartRenderer::stations_by_location(&cleaned_sessions()).unwrap();
        let series = &chart.series[0];

        // Chicago: stations {1, 3}, mean energy 30; Houston: {1, 2, 4}, mean 20
        let chicago = series.point("Chicago").unwrap();
        assert_eq!(chicago.y, 2.0);
        assert_eq!(chicago.size, Some(1000.0));

        let houston = series.point("Houston").unwrap();
        assert_eq!(houston.y, 3.0);
        assert_eq!(houston.size, Some(100.0));
    }

    #[test]
    fn test_heatmap_is_zero_filled() {
        let chart = ChartRenderer::sessions_by_day_and_time(&cleaned_sessions()).unwrap();
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Morning", "Evening", "Night"]);

        let morning = chart.series_named("Morning").unwrap();
        let days: Vec<&str> = morning.points.iter().map(|p| p.x.as_str()).collect();
        assert_eq!(days, vec!["Monday", "Tuesday", "Sunday"]);
        assert_eq!(morning.point("Tuesday").unwrap().y, 2.0);
        assert_eq!(morning.point("Sunday").unwrap().y, 0.0);
    }

    #[test]
    fn test_energy_by_model_and_time() {
        let chart = ChartRenderer::energy_by_model_and_time(&cleaned_sessions()).unwrap();
        let morning = chart.series_named("Morning").unwrap();
        assert_eq!(morning.point("Tesla Model 3").unwrap().y, 15.0);
        assert_eq!(morning.point("BMW i3").unwrap().y, 20.0);
        assert!(morning.point("Nissan Leaf").is_none());
    }

    #[test]
    fn test_missing_column_is_reported() {
        let df = df![VEHICLE_MODEL => ["Tesla Model 3"]].unwrap();
        let err = ChartRenderer::build_all(&df).unwrap_err();
        assert!(matches!(err, PreprocessingError::ColumnNotFound(ref c) if c == CHARGER_TYPE));
    }

    #[test]
    fn test_rescale_all_equal_maps_to_top() {
        assert_eq!(rescale(&[5.0, 5.0], (100.0, 1000.0)), vec![Some(1000.0), Some(1000.0)]);
        assert_eq!(
            rescale(&[0.0, 5.0, 10.0], (100.0, 1000.0)),
            vec![Some(100.0), Some(550.0), Some(1000.0)]
        );
    }

    #[test]
    fn test_axis_order_appends_unrecognized_labels() {
        let axis = axis_order(&ORDERED_TIMES, ["Night", "Dawn", "Morning"].into_iter());
        assert_eq!(axis, vec!["Morning", "Night", "Dawn"]);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let charts = ChartRenderer::build_all(&cleaned_sessions()).unwrap();
        let path = ChartRenderer::write_json(&charts, dir.path()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 7);
        assert_eq!(json[4]["kind"], "bubble");
    }
}
