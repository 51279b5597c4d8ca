//! Catalog sources: where the raw CSV text of each table comes from

use super::CatalogTable;
use crate::core::diagnostics::DataSourceError;
use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Provider of raw CSV text, one call per catalog table
///
/// Implementations own the transport (local files, a spreadsheet export URL, ...);
/// the loader only sees CSV text.
pub trait CatalogSource {
    /// Short description for log lines (e.g. a directory path)
    fn describe(&self) -> String;

    /// Fetch the CSV text of one table
    ///
    /// # Errors
    /// Returns `DataSourceError::SourceUnavailable` when the table cannot be read
    fn fetch_table(&self, table: CatalogTable) -> Result<String, DataSourceError>;
}

/// Reads `<dir>/<Tab>.csv` for every table
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at a directory
    #[must_use]
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the CSV file backing a table
    #[must_use]
    pub fn table_path(&self, table: CatalogTable) -> PathBuf {
        self.dir.join(format!("{}.csv", table.tab_name()))
    }
}

impl CatalogSource for DirectorySource {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    fn fetch_table(&self, table: CatalogTable) -> Result<String, DataSourceError> {
        let path = self.table_path(table);
        fs::read_to_string(&path).map_err(|e| DataSourceError::SourceUnavailable {
            table: table.tab_name().to_string(),
            reason: format!("{}: {e}", path.display()),
        })
    }
}

/// Serves table text held in memory, e.g. a catalog embedded in the binary or
/// received from another process
///
/// Fetches are counted and reported by [`CatalogSource::describe`].
#[derive(Debug, Default)]
pub struct InMemorySource {
    tables: HashMap<CatalogTable, String>,
    fetches: Cell<usize>,
}

impl InMemorySource {
    /// Create an empty source (every fetch fails until tables are added)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table's CSV text
    #[must_use]
    pub fn with_table(mut self, table: CatalogTable, csv: impl Into<String>) -> Self {
        self.tables.insert(table, csv.into());
        self
    }

    /// Replace a table's CSV text in place
    pub fn set_table(&mut self, table: CatalogTable, csv: impl Into<String>) {
        self.tables.insert(table, csv.into());
    }

    /// Number of table fetches served so far
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl CatalogSource for InMemorySource {
    fn describe(&self) -> String {
        format!("in-memory ({} fetches served)", self.fetches.get())
    }

    fn fetch_table(&self, table: CatalogTable) -> Result<String, DataSourceError> {
        self.fetches.set(self.fetches.get() + 1);
        self.tables
            .get(&table)
            .cloned()
            .ok_or_else(|| DataSourceError::SourceUnavailable {
                table: table.tab_name().to_string(),
                reason: "table not provided".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_source_reads_tab_file() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("Faculty.csv"), "faculty_name,major_count\nEng,2\n")
            .expect("write");

        let source = DirectorySource::new(dir.path());
        let text = source.fetch_table(CatalogTable::Faculty).expect("fetch");
        assert!(text.starts_with("faculty_name"));
        assert!(source.table_path(CatalogTable::GenEd).ends_with("7group.csv"));
    }

    #[test]
    fn test_directory_source_missing_file() {
        let dir = TempDir::new().expect("temp dir");
        let source = DirectorySource::new(dir.path());
        let err = source.fetch_table(CatalogTable::Majors).unwrap_err();
        assert!(matches!(
            err,
            DataSourceError::SourceUnavailable { ref table, .. } if table == "Majors"
        ));
    }

    #[test]
    fn test_in_memory_source_counts_fetches() {
        let source = InMemorySource::new().with_table(CatalogTable::Core, "subject_id\n");
        assert!(source.fetch_table(CatalogTable::Core).is_ok());
        assert!(source.fetch_table(CatalogTable::Elective).is_err());
        assert_eq!(source.fetch_count(), 2);
        assert_eq!(source.describe(), "in-memory (2 fetches served)");
    }
}
