//! Type coercion for the session table: instant splitting, symbol stripping,
//! measure casting and feature derivation.

use super::converters::{
    date_to_epoch_days, split_instant, strip_and_parse_f64, strip_to_string, time_to_nanos,
    to_float64,
};
use crate::error::{Result, ResultExt};
use crate::schema::{
    CHARGING_COST_USD, CHARGING_DURATION_HOURS, CHARGING_END_TIME, CHARGING_START_TIME,
    CHARGING_STATION_ID, MEASURE_COLUMNS, STATE_OF_CHARGE_END, STATE_OF_CHARGE_START, derived,
};
use crate::types::ColumnDtype;
use crate::utils::{dtype_category_str, require_series, series_to_strings};
use polars::prelude::*;
use tracing::debug;

/// Split a combined date-time text column into a `Date` and a `Time` column.
///
/// The source column is dropped and the two new columns are appended. The
/// time column may reuse the source name. With `strip_fraction`, a `.` and
/// everything after it is removed from the time token before parsing.
pub fn split_datetime_column(
    df: &mut DataFrame,
    source: &str,
    date_name: &str,
    time_name: &str,
    strip_fraction: bool,
) -> Result<()> {
    let values = series_to_strings(require_series(df, source)?)?;

    let mut days: Vec<Option<i32>> = Vec::with_capacity(values.len());
    let mut nanos: Vec<Option<i64>> = Vec::with_capacity(values.len());
    for (row, value) in values.iter().enumerate() {
        match value {
            Some(text) => {
                let (date, time) = split_instant(source, row, text, strip_fraction)?;
                days.push(Some(date_to_epoch_days(date)));
                nanos.push(Some(time_to_nanos(time)));
            }
            None => {
                days.push(None);
                nanos.push(None);
            }
        }
    }

    let dates = Series::new(date_name.into(), days).strict_cast(&DataType::Date)?;
    let times = Series::new(time_name.into(), nanos).strict_cast(&DataType::Time)?;

    df.drop_in_place(source)?;
    df.with_column(dates)?;
    df.with_column(times)?;

    debug!("Split '{}' into '{}' and '{}'", source, date_name, time_name);
    Ok(())
}

/// Cast every measurement column to Float64.
pub fn coerce_measures(df: &mut DataFrame) -> Result<Vec<String>> {
    let mut steps = Vec::new();

    for column in MEASURE_COLUMNS {
        let series = require_series(df, column)?;
        if series.dtype() == &DataType::Float64 {
            continue;
        }

        let before = series.dtype().to_string();
        let converted = to_float64(series).context(format!("Coercing '{column}'"))?;
        df.replace(column, converted)?;
        steps.push(format!("Converted '{column}' from {before} to Float64"));
    }

    Ok(steps)
}

/// Add `ChargeDifference%` and `ChargingDurationMinutes`.
pub fn derive_features(df: &mut DataFrame) -> Result<()> {
    let start = require_series(df, STATE_OF_CHARGE_START)?.cast(&DataType::Float64)?;
    let end = require_series(df, STATE_OF_CHARGE_END)?.cast(&DataType::Float64)?;
    let hours = require_series(df, CHARGING_DURATION_HOURS)?.cast(&DataType::Float64)?;

    let difference = (&end - &start)?.with_name(derived::CHARGE_DIFFERENCE.into());
    let minutes = (&hours * 60.0).with_name(derived::CHARGING_DURATION_MINUTES.into());

    df.with_column(difference)?;
    df.with_column(minutes)?;
    Ok(())
}

/// Name and dtype of every column, in order.
pub fn dtype_listing(df: &DataFrame) -> Vec<ColumnDtype> {
    df.get_columns()
        .iter()
        .map(|col| ColumnDtype {
            column: col.name().to_string(),
            dtype: col.dtype().to_string(),
            category: dtype_category_str(col.dtype()).to_string(),
        })
        .collect()
}

/// Type coercer for the session table.
///
/// Both entry points mutate the table in place and return human-readable
/// step descriptions.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeCoercer;

impl TypeCoercer {
    /// Split the start and end instants into date and time columns.
    ///
    /// Only the end instant has its fractional seconds removed.
    pub fn process_datetime_columns(&self, df: &mut DataFrame) -> Result<Vec<String>> {
        split_datetime_column(
            df,
            CHARGING_START_TIME,
            derived::CHARGING_START_DATE,
            derived::CHARGING_START_CLOCK,
            false,
        )?;
        split_datetime_column(
            df,
            CHARGING_END_TIME,
            derived::CHARGING_END_DATE,
            derived::CHARGING_END_CLOCK,
            true,
        )?;

        Ok(vec![
            format!(
                "Split '{}' into '{}' (Date) and '{}' (Time)",
                CHARGING_START_TIME,
                derived::CHARGING_START_DATE,
                derived::CHARGING_START_CLOCK
            ),
            format!(
                "Split '{}' into '{}' (Date) and '{}' (Time), fractional seconds removed",
                CHARGING_END_TIME,
                derived::CHARGING_END_DATE,
                derived::CHARGING_END_CLOCK
            ),
        ])
    }

    /// Strip formatting symbols, cast measures and derive the two features.
    pub fn clean_symbols_and_features(&self, df: &mut DataFrame) -> Result<Vec<String>> {
        let mut steps = Vec::new();

        for (column, symbol) in [
            (STATE_OF_CHARGE_START, '%'),
            (STATE_OF_CHARGE_END, '%'),
            (CHARGING_COST_USD, '$'),
        ] {
            let parsed = strip_and_parse_f64(require_series(df, column)?, symbol)?;
            df.replace(column, parsed)?;
            steps.push(format!("Stripped '{symbol}' from '{column}' and parsed as Float64"));
        }

        let station_ids = strip_to_string(require_series(df, CHARGING_STATION_ID)?, 'S')?;
        df.replace(CHARGING_STATION_ID, station_ids)?;
        steps.push(format!("Stripped 'S' from '{CHARGING_STATION_ID}'"));

        steps.extend(coerce_measures(df)?);

        derive_features(df)?;
        steps.push(format!(
            "Derived '{}' and '{}'",
            derived::CHARGE_DIFFERENCE,
            derived::CHARGING_DURATION_MINUTES
        ));

        for step in &steps {
            debug!("  {}", step);
        }
        Ok(steps)
    }
}
