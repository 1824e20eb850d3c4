//! File output: cleaned CSV and JSON reports.

use crate::error::{Result, ResultExt};
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .context(format!("creating directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Write a table as CSV with a header row, creating parent directories.
///
/// The table itself is not modified.
pub fn export_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut file = File::create(path).context(format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .context(format!("writing {}", path.display()))?;

    info!("Cleaned data exported: {} ({} rows)", path.display(), df.height());
    Ok(())
}

/// Write any serializable value as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut file = File::create(path).context(format!("creating {}", path.display()))?;
    file.write_all(serde_json::to_string_pretty(value)?.as_bytes())
        .context(format!("writing {}", path.display()))?;

    info!("Report saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(format!("football-clean-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_export_csv_creates_directories() {
        let dir = scratch_dir("export");
        let path = dir.join("nested").join("clean.csv");
        let mut df = df![
            "home_team" => ["Uruguay", "Argentina"],
            "home_score" => [4i64, 2],
        ]
        .unwrap();

        export_csv(&mut df, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "home_team,home_score");
        assert_eq!(lines[1], "Uruguay,4");
        assert_eq!(lines.len(), 3);
        assert_eq!(df.height(), 2);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_csv_failure_is_io_error() {
        let dir = scratch_dir("blocked");
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("file");
        fs::write(&blocker, "x").unwrap();

        let mut df = df!["city" => ["Lima"]].unwrap();
        let err = export_csv(&mut df, blocker.join("out.csv")).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(!err.is_input_error());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_json() {
        let dir = scratch_dir("json");
        let path = dir.join("report.json");
        write_json(&serde_json::json!({"rows": 3}), &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"rows\": 3"));
        fs::remove_dir_all(&dir).ok();
    }
}
