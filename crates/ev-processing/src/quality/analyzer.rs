use super::outliers::IqrBounds;
use crate::error::Result;
use crate::schema::KEY_COLUMNS;
use crate::types::{
    ColumnMissing, ColumnOutliers, DuplicateReport, MissingValueReport, OutlierReport,
};
use crate::utils::{finite_values, is_numeric_dtype, missing_mask, series_to_strings};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Read-only diagnostics over a session table. Nothing here mutates the data.
pub struct DataQualityAnalyzer;

impl DataQualityAnalyzer {
    /// Per-column missing counts and the all-key-columns-missing row count.
    pub fn missing_report(df: &DataFrame) -> Result<MissingValueReport> {
        let height = df.height();
        let mut columns = Vec::with_capacity(df.width());
        let mut key_masks = Vec::new();
        let mut key_columns_checked = Vec::new();

        for col in df.get_columns() {
            let mask = missing_mask(col.as_materialized_series())?;
            let missing = mask.iter().filter(|m| **m).count();
            columns.push(ColumnMissing {
                column: col.name().to_string(),
                missing,
            });

            if KEY_COLUMNS.contains(&col.name().as_str()) {
                key_columns_checked.push(col.name().to_string());
                key_masks.push(mask);
            }
        }

        let all_key_missing_rows = if key_masks.is_empty() {
            0
        } else {
            (0..height)
                .filter(|row| key_masks.iter().all(|mask| mask[*row]))
                .count()
        };
        let all_key_missing_percentage = if height == 0 {
            0.0
        } else {
            (all_key_missing_rows as f64 / height as f64) * 100.0
        };

        for entry in columns.iter().filter(|c| c.missing > 0) {
            debug!("  {}: {} missing", entry.column, entry.missing);
        }
        debug!(
            "Rows with all {} key columns missing: {}",
            key_columns_checked.len(),
            all_key_missing_rows
        );

        Ok(MissingValueReport {
            total_rows: height,
            columns,
            key_columns_checked,
            all_key_missing_rows,
            all_key_missing_percentage,
        })
    }

    /// Count rows that have an identical twin, keeping every member of a group.
    pub fn duplicate_report(df: &DataFrame) -> Result<DuplicateReport> {
        let columns = df
            .get_columns()
            .iter()
            .map(|col| row_key_column(col.as_materialized_series()))
            .collect::<Result<Vec<_>>>()?;

        let mut groups: HashMap<Vec<Option<&str>>, usize> = HashMap::new();
        for row in 0..df.height() {
            let key: Vec<Option<&str>> = columns.iter().map(|c| c[row].as_deref()).collect();
            *groups.entry(key).or_insert(0) += 1;
        }

        let duplicate_rows = groups.values().filter(|n| **n > 1).sum::<usize>();
        let duplicate_groups = groups.values().filter(|n| **n > 1).count();

        Ok(DuplicateReport {
            total_rows: df.height(),
            duplicate_rows,
            duplicate_groups,
        })
    }

    /// IQR outlier counts for every numeric column. Nulls and NaN are skipped.
    pub fn outlier_report(df: &DataFrame, multiplier: f64) -> Result<OutlierReport> {
        let mut columns = Vec::new();

        for col in df.get_columns() {
            if !is_numeric_dtype(col.dtype()) {
                continue;
            }

            let values = finite_values(col.as_materialized_series())?;
            let bounds = IqrBounds::from_values(&values, multiplier);
            let outlier_count = bounds.map_or(0, |b| b.count_outliers(&values));

            debug!("  {}: {} outliers", col.name(), outlier_count);
            columns.push(ColumnOutliers {
                column: col.name().to_string(),
                outlier_count,
                values_checked: values.len(),
                bounds,
            });
        }

        Ok(OutlierReport {
            iqr_multiplier: multiplier,
            columns,
        })
    }
}

/// Text form of a column for row comparison. Float `-0.0` keys as `0`.
fn row_key_column(series: &Series) -> Result<Vec<Option<String>>> {
    match series.dtype() {
        DataType::Float32 | DataType::Float64 => Ok(series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.map(|v| (v + 0.0).to_string()))
            .collect()),
        _ => series_to_strings(series),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_report_counts_per_column() {
        let df = df![
            "VehicleModel" => [Some("Tesla Model 3"), None, None],
            "EnergyConsumedKwh" => [Some(1.0), Some(f64::NAN), None],
        ]
        .unwrap();

        let report = DataQualityAnalyzer::missing_report(&df).unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.missing_in("VehicleModel"), Some(2));
        assert_eq!(report.missing_in("EnergyConsumedKwh"), Some(2));
        assert_eq!(report.key_columns_checked, vec!["VehicleModel".to_string()]);
        assert_eq!(report.all_key_missing_rows, 2);
    }

    #[test]
    fn test_all_key_missing_needs_every_key_column() {
        let df = df![
            "VehicleModel" => [None, None, Some("Chevy Bolt")],
            "ChargerType" => [None, Some("Level 2"), None],
            "TemperatureC" => [Some(1.0), None, None],
        ]
        .unwrap();

        let report = DataQualityAnalyzer::missing_report(&df).unwrap();
        assert_eq!(report.all_key_missing_rows, 1);
        assert!((report.all_key_missing_percentage - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_report_without_key_columns() {
        let df = df!["a" => [None::<i32>, None]].unwrap();
        let report = DataQualityAnalyzer::missing_report(&df).unwrap();
        assert_eq!(report.all_key_missing_rows, 0);
        assert!(report.key_columns_checked.is_empty());
    }

    #[test]
    fn test_duplicate_report_keeps_all_members() {
        let df = df![
            "a" => [1, 1, 2, 3, 3, 3],
            "b" => ["x", "x", "y", "z", "z", "z"],
        ]
        .unwrap();

        let report = DataQualityAnalyzer::duplicate_report(&df).unwrap();
        assert_eq!(report.total_rows, 6);
        assert_eq!(report.duplicate_rows, 5);
        assert_eq!(report.duplicate_groups, 2);
    }

    #[test]
    fn test_duplicate_report_signed_zero_is_equal() {
        let df = df!["a" => [0.0, -0.0], "b" => ["x", "x"]].unwrap();
        let report = DataQualityAnalyzer::duplicate_report(&df).unwrap();
        assert_eq!(report.duplicate_rows, 2);
        assert_eq!(report.duplicate_groups, 1);
    }

    #[test]
    fn test_duplicate_report_partial_match_is_not_duplicate() {
        let df = df!["a" => [1, 1], "b" => ["x", "y"]].unwrap();
        let report = DataQualityAnalyzer::duplicate_report(&df).unwrap();
        assert_eq!(report.duplicate_rows, 0);
    }

    #[test]
    fn test_outlier_report_numeric_columns_only() {
        let df = df![
            "rate" => [10.0, 10.0, 20.0, 20.0, 35.0],
            "cost" => [10.0, 10.0, 20.0, 20.0, 35.01],
            "label" => ["a", "b", "c", "d", "e"],
        ]
        .unwrap();

        let report = DataQualityAnalyzer::outlier_report(&df, 1.5).unwrap();
        assert_eq!(report.columns.len(), 2);
        assert_eq!(report.get("rate").unwrap().outlier_count, 0);
        assert_eq!(report.get("cost").unwrap().outlier_count, 1);
        assert_eq!(report.total_outliers(), 1);
        assert!(report.get("label").is_none());
    }

    #[test]
    fn test_outlier_report_empty_column() {
        let df = df!["v" => [None::<f64>, None]].unwrap();
        let report = DataQualityAnalyzer::outlier_report(&df, 1.5).unwrap();
        let entry = report.get("v").unwrap();
        assert_eq!(entry.outlier_count, 0);
        assert_eq!(entry.values_checked, 0);
        assert!(entry.bounds.is_none());
    }
}
