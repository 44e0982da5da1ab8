//! CSV loading.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while reading the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be opened.
    #[error("cannot open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV could not be parsed.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// A CSV table with every cell kept as text. Empty cells are missing values.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Load a dataset from a CSV file with a header row.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Parse a dataset from any CSV source with a header row.
    pub fn from_reader(reader: impl Read) -> Result<Self, DatasetError> {
        let mut csv = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = csv
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(ToString::to_string).collect();
            row.resize(columns.len(), String::new());
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Column names in file order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of column `name`, `None` for missing values.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = Option<&str>> + '_> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| {
            let cell = row[index].as_str();
            (!cell.is_empty()).then_some(cell)
        }))
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_rows_are_padded() {
        let data = "BORO_NM,LAW_CAT_CD\nBRONX,FELONY\nQUEENS\n";
        let dataset = Dataset::from_reader(data.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 2);
        let categories: Vec<_> = dataset.column("LAW_CAT_CD").unwrap().collect();
        assert_eq!(categories, vec![Some("FELONY"), None]);
    }

    #[test]
    fn test_unknown_column() {
        let dataset = Dataset::from_reader("A\n1\n".as_bytes()).unwrap();
        assert!(dataset.column("B").is_none());
        assert!(dataset.has_column("A"));
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::load("/nonexistent/sentinel.csv").unwrap_err();
        assert!(matches!(err, DatasetError::Open { .. }));
    }
}
