//! Loading the raw match file.
//!
//! Every column is read as text with no schema inference, so that all
//! coercion happens in the cleaning stages where failures are recorded.

use crate::error::{CleaningError, Result, ResultExt};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn text_reader_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Read a match CSV file with a header row, every column as `String`.
///
/// Empty fields are read as nulls. If the file does not parse with standard
/// quoting it is retried with quoting disabled.
pub fn read_matches_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CleaningError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input file not found: {}", path.display()),
        )));
    }

    info!("Loading match data from: {}", path.display());

    // Strategy 1: standard quote handling
    match text_reader_options()
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .and_then(|reader| reader.finish())
    {
        Ok(df) => {
            info!("Loaded {} rows x {} columns", df.height(), df.width());
            return Ok(df);
        }
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: no quote handling
    let df = text_reader_options()
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .and_then(|reader| reader.finish())
        .context(format!("reading {}", path.display()))?;

    info!("Loaded {} rows x {} columns", df.height(), df.width());
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_matches_csv_keeps_text() {
        let dir = std::env::temp_dir().join(format!("football-clean-extract-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("matches.csv");
        fs::write(
            &path,
            "date,home_team,home_score,neutral\n1872-11-30,Scotland,0,FALSE\n1873-03-08,England,,TRUE\n",
        )
        .unwrap();

        let df = read_matches_csv(&path).unwrap();
        assert_eq!(df.shape(), (2, 4));
        assert_eq!(df.column("home_score").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("neutral").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("home_score").unwrap().null_count(), 1);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_matches_csv_missing_file() {
        let err = read_matches_csv("/nonexistent/matches.csv").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
