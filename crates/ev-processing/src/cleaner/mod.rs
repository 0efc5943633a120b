//! Data cleaning module for charging-session tables.
//!
//! This module provides functionality for:
//! - Normalizing the six categorical columns ([`categorical`])
//! - Splitting instants, stripping symbols and deriving features ([`type_coercer`])
//! - Removing rows with missing values ([`DataCleaner`])

pub mod categorical;
mod converters;
pub mod type_coercer;

pub use categorical::{CategoricalNormalizer, CategoryRules, normalize_text, unique_values};
pub use converters::{strip_and_parse_f64, strip_to_string};
pub use type_coercer::{TypeCoercer, dtype_listing};

use crate::error::Result;
use crate::utils::missing_mask;
use polars::prelude::*;
use tracing::{debug, info};

/// Data cleaner for row-level removal.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataCleaner;

impl DataCleaner {
    /// Remove every row with at least one missing value in any column.
    ///
    /// Returns the filtered table and the number of rows removed.
    pub fn drop_incomplete_rows(&self, df: DataFrame) -> Result<(DataFrame, usize)> {
        let before = df.height();
        if before == 0 || df.width() == 0 {
            return Ok((df, 0));
        }

        let mut keep = vec![true; before];
        for col in df.get_columns() {
            let missing = missing_mask(col.as_materialized_series())?;
            for (flag, is_missing) in keep.iter_mut().zip(missing) {
                if is_missing {
                    *flag = false;
                }
            }
        }

        let mask = BooleanChunked::from_slice("mask".into(), &keep);
        let df = df.filter(&mask)?;
        let removed = before - df.height();

        if removed > 0 {
            let pct = (removed as f64 / before as f64) * 100.0;
            info!("Dropped {} rows with missing values ({:.1}%)", removed, pct);
        } else {
            debug!("No rows with missing values found");
        }

        Ok((df, removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_incomplete_rows() {
        let df = df![
            "a" => [Some(1.0), None, Some(3.0), Some(f64::NAN)],
            "b" => [Some("x"), Some("y"), None, Some("w")],
            "c" => [1, 2, 3, 4],
        ]
        .unwrap();

        let (cleaned, removed) = DataCleaner.drop_incomplete_rows(df).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(cleaned.height(), 1);
        assert_eq!(
            cleaned.column("c").unwrap().as_materialized_series().i32().unwrap().get(0),
            Some(1)
        );
    }

    #[test]
    fn test_drop_incomplete_rows_keeps_complete_table() {
        let df = df!["a" => [1, 2], "b" => ["x", "y"]].unwrap();
        let (cleaned, removed) = DataCleaner.drop_incomplete_rows(df).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn test_drop_incomplete_rows_empty_table() {
        let df = DataFrame::empty();
        let (cleaned, removed) = DataCleaner.drop_incomplete_rows(df).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(cleaned.height(), 0);
    }
}
