//! Cell-level conversion functions used by the type coercer.
//!
//! All conversions are strict: a cell that cannot be converted aborts the
//! whole column with a [`PreprocessingError::ParseFailed`] naming the row.

use crate::error::{PreprocessingError, Result};
use crate::utils::{is_numeric_dtype, series_to_strings};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use polars::prelude::*;

/// Date formats tried in order for the date half of a session instant.
pub(crate) const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Only accepted format for the time half.
pub(crate) const TIME_FORMAT: &str = "%H:%M:%S";

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Parse a date token with [`DATE_FORMATS`].
pub(crate) fn parse_date(token: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
}

/// Parse a time token with [`TIME_FORMAT`].
///
/// Leap seconds (`23:59:60`) are rejected; polars `Time` cannot hold them.
pub(crate) fn parse_time(token: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(token, TIME_FORMAT)
        .ok()
        .filter(|time| (time.nanosecond() as i64) < NANOS_PER_SECOND)
}

/// Physical value of a polars `Date`.
pub(crate) fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Physical value of a polars `Time`.
pub(crate) fn time_to_nanos(time: NaiveTime) -> i64 {
    time.num_seconds_from_midnight() as i64 * NANOS_PER_SECOND + time.nanosecond() as i64
}

/// Remove a `.` and everything after it.
pub(crate) fn strip_fraction(token: &str) -> &str {
    match token.find('.') {
        Some(idx) => &token[..idx],
        None => token,
    }
}

/// Split a combined `"<date> <time>"` cell at its first space.
///
/// Returns the calendar date and the time of day. A cell with no time part
/// is rejected.
pub(crate) fn split_instant(
    column: &str,
    row: usize,
    raw: &str,
    drop_fraction: bool,
) -> Result<(NaiveDate, NaiveTime)> {
    let trimmed = raw.trim();
    let Some((date_token, time_token)) = trimmed.split_once(' ') else {
        return Err(PreprocessingError::parse_failed(
            column,
            row,
            raw,
            "expected '<date> <time>'",
        ));
    };

    let date = parse_date(date_token.trim()).ok_or_else(|| {
        PreprocessingError::parse_failed(column, row, raw, format!("invalid date '{date_token}'"))
    })?;

    let time_token = time_token.trim();
    let time_token = if drop_fraction {
        strip_fraction(time_token)
    } else {
        time_token
    };
    let time = parse_time(time_token).ok_or_else(|| {
        PreprocessingError::parse_failed(
            column,
            row,
            raw,
            format!("invalid time '{time_token}', expected HH:MM:SS"),
        )
    })?;

    Ok((date, time))
}

/// Parse a trimmed cell as `f64`.
pub(crate) fn parse_f64_cell(column: &str, row: usize, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| PreprocessingError::parse_failed(column, row, raw, e.to_string()))
}

/// Remove every `symbol` from the text form of each cell, then parse as `f64`.
///
/// `"20%"` with `'%'` becomes `20.0`, `"$10.50"` with `'$'` becomes `10.5`.
pub fn strip_and_parse_f64(series: &Series, symbol: char) -> Result<Series> {
    let column = series.name().to_string();
    let values = series_to_strings(series)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(text) => parse_f64_cell(&column, row, &text.replace(symbol, "")).map(Some),
            None => Ok(None),
        })
        .collect::<Result<Vec<Option<f64>>>>()?;

    Ok(Series::new(series.name().clone(), values))
}

/// Remove every `symbol` from the text form of each cell, keeping text.
///
/// `"S123"` with `'S'` becomes `"123"`.
pub fn strip_to_string(series: &Series, symbol: char) -> Result<Series> {
    let values: Vec<Option<String>> = series_to_strings(series)?
        .into_iter()
        .map(|value| value.map(|text| text.replace(symbol, "")))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Convert a series to Float64.
///
/// Numeric series are cast; text series are parsed cell by cell.
pub fn to_float64(series: &Series) -> Result<Series> {
    if is_numeric_dtype(series.dtype()) {
        return Ok(series.cast(&DataType::Float64)?);
    }

    let column = series.name().to_string();
    if !matches!(series.dtype(), DataType::String) {
        return Err(PreprocessingError::TypeConversionFailed {
            column,
            target_type: "Float64".to_string(),
            reason: format!("unsupported source type {}", series.dtype()),
        });
    }

    let values = series
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(text) => parse_f64_cell(&column, row, text).map(Some),
            None => Ok(None),
        })
        .collect::<Result<Vec<Option<f64>>>>()?;

    Ok(Series::new(series.name().clone(), values))
}
