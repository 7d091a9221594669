// src/utils/seeds.rs

//! Seed list input.
//!
//! Seeds arrive as one named column of a CSV file; cells may hold bare hosts
//! or full URLs. Blank cells are skipped.

use std::path::Path;

use crate::error::{AppError, Result};

/// Read all seed strings from the named column of a CSV file.
///
/// Failing to read the seed list is the one fatal error of a crawl run, so
/// this returns an error rather than an empty list when the file or the
/// column is missing.
pub fn read_seed_column(path: impl AsRef<Path>, column: &str) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| AppError::seed(format!("cannot open {}: {e}", path.display())))?;

    let headers = reader.headers()?.clone();
    let index = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| {
            AppError::seed(format!(
                "column '{column}' not found in {}",
                path.display()
            ))
        })?;

    let mut seeds = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(index) {
            let value = value.trim();
            if !value.is_empty() {
                seeds.push(value.to_string());
            }
        }
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_named_column() {
        let file = write_csv("Name,Website\nAcme,acme.test\nGlobex,https://globex.test\n");
        let seeds = read_seed_column(file.path(), "Website").unwrap();
        assert_eq!(seeds, vec!["acme.test", "https://globex.test"]);
    }

    #[test]
    fn skips_blank_cells() {
        let file = write_csv("Website\nacme.test\n\n   \nglobex.test\n");
        let seeds = read_seed_column(file.path(), "Website").unwrap();
        assert_eq!(seeds, vec!["acme.test", "globex.test"]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let file = write_csv("Name,Url\nAcme,acme.test\n");
        assert!(read_seed_column(file.path(), "Website").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_seed_column("does/not/exist.csv", "Website").is_err());
    }
}
