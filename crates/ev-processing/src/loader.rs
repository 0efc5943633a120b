//! CSV loading and column renaming.

use crate::error::{PreprocessingError, Result};
use crate::schema::RENAME_MAP;
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Rows sampled for schema inference on the typed read.
pub const INFER_SCHEMA_ROWS: usize = 100;

/// Cell texts read as missing, in addition to empty fields.
pub const MISSING_MARKERS: [&str; 10] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-nan", "NULL", "null", "None", "<NA>",
];

fn null_values() -> NullValues {
    NullValues::AllColumns(MISSING_MARKERS.iter().map(|s| (*s).into()).collect())
}

fn read_csv(path: &Path, infer_schema_length: usize) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(infer_schema_length))
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(null_values())),
        )
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
}

/// Load a sessions CSV with a header row.
///
/// Types are inferred from the first [`INFER_SCHEMA_ROWS`] rows. When that
/// read fails (a dirty cell deep in a numeric column), the file is read
/// again with every column as text; the coercion stage parses it later.
pub fn load_sessions_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(PreprocessingError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    info!("Loading dataset from: {}", path.display());

    let df = match read_csv(path, INFER_SCHEMA_ROWS) {
        Ok(df) => df,
        Err(e) => {
            warn!("Typed CSV read failed ({}), reading every column as text", e);
            read_csv(path, 0)?
        }
    };

    info!("Dataset loaded successfully: {:?}", df.shape());
    Ok(df)
}

/// Apply [`RENAME_MAP`]. Headers absent from the table are skipped.
///
/// Returns the number of columns renamed.
pub fn rename_columns(df: &mut DataFrame) -> Result<usize> {
    let mut renamed = 0;
    for (source, internal) in RENAME_MAP {
        if source == internal {
            continue;
        }
        if df.get_column_index(source).is_some() {
            df.rename(source, internal.into())?;
            renamed += 1;
        }
    }

    debug!("Renamed {} columns", renamed);
    Ok(renamed)
}

/// Drop the listed columns that exist. Returns the names actually dropped.
pub fn drop_columns(df: &mut DataFrame, names: &[String]) -> Result<Vec<String>> {
    let mut dropped = Vec::new();
    for name in names {
        if df.get_column_index(name).is_some() {
            df.drop_in_place(name)?;
            dropped.push(name.clone());
        }
    }

    if !dropped.is_empty() {
        debug!("Dropped columns: {:?}", dropped);
    }
    Ok(dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_sessions_csv("/definitely/not/here.csv").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }

    #[test]
    fn test_load_reads_markers_as_missing() {
        let file = write_csv("a,b\n1,x\nNaN,\n3,NA\n");
        let df = load_sessions_csv(file.path()).unwrap();
        assert_eq!(df.shape(), (3, 2));
        assert_eq!(df.column("a").unwrap().null_count(), 1);
        assert_eq!(df.column("b").unwrap().null_count(), 2);
    }

    #[test]
    fn test_load_falls_back_to_text() {
        let mut content = String::from("id,value\n");
        for i in 0..(INFER_SCHEMA_ROWS + 20) {
            content.push_str(&format!("{i},{i}\n"));
        }
        content.push_str("999,not-a-number\n");
        let file = write_csv(&content);

        let df = load_sessions_csv(file.path()).unwrap();
        assert_eq!(df.height(), INFER_SCHEMA_ROWS + 21);
        assert_eq!(df.column("value").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_rename_columns() {
        let mut df = df![
            "user id" => ["u1"],
            "Charging_StationID" => ["S1"],
            "VehicleModel" => ["Tesla Model 3"],
            "Extra" => [1],
        ]
        .unwrap();

        let renamed = rename_columns(&mut df).unwrap();
        assert_eq!(renamed, 2);

        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["UserId", "ChargingStationId", "VehicleModel", "Extra"]);
    }

    #[test]
    fn test_drop_columns_ignores_absent() {
        let mut df = df!["UserId" => ["u1"], "a" => [1]].unwrap();
        let dropped =
            drop_columns(&mut df, &["UserId".to_string(), "Missing".to_string()]).unwrap();
        assert_eq!(dropped, vec!["UserId".to_string()]);
        assert_eq!(df.width(), 1);
    }
}
