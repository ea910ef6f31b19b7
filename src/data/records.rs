//! Loading architecture records from tab-separated exports.

use crate::data::{tsv_reader, ArchitectureRecord};
use crate::error::{PromiscuityError, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Columns every record table must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["species", "protein", "architecture"];

/// An in-memory table of architecture records.
///
/// This is the materialised result of the upstream query; the graph builder
/// only needs the ordered sequence of records.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    records: Vec<ArchitectureRecord>,
}

impl RecordTable {
    /// Create a table from records.
    pub fn new(records: Vec<ArchitectureRecord>) -> Self {
        Self { records }
    }

    /// Load records from a TSV file.
    ///
    /// Expected format:
    /// - First row: header naming at least `species`, `protein`, `architecture`
    /// - Subsequent rows: one protein each; extra columns are ignored
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PromiscuityError::DataSource(format!("cannot open {}: {}", path.display(), e))
        })?;
        let table = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            records = table.len(),
            "loaded architecture records"
        );
        Ok(table)
    }

    /// Load records from any reader producing TSV text.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = tsv_reader(reader);

        let headers = rdr.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(PromiscuityError::MissingColumn(column.to_string()));
            }
        }

        let mut records = Vec::new();
        for row in rdr.deserialize() {
            let record: ArchitectureRecord = row?;
            records.push(record);
        }

        if records.is_empty() {
            return Err(PromiscuityError::EmptyData(
                "No architecture records in input".to_string(),
            ));
        }
        Ok(Self { records })
    }

    /// Keep only the records of the given species.
    ///
    /// An empty filter keeps everything.
    pub fn filter_species(self, species: &[String]) -> Self {
        if species.is_empty() {
            return self;
        }
        let keep: BTreeSet<&str> = species.iter().map(String::as_str).collect();
        let before = self.records.len();
        let records: Vec<_> = self
            .records
            .into_iter()
            .filter(|r| keep.contains(r.species.as_str()))
            .collect();
        debug!(before, after = records.len(), "applied species filter");
        Self { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in input order.
    pub fn records(&self) -> &[ArchitectureRecord] {
        &self.records
    }

    /// Iterate over records.
    pub fn iter(&self) -> impl Iterator<Item = &ArchitectureRecord> {
        self.records.iter()
    }
}

impl IntoIterator for RecordTable {
    type Item = ArchitectureRecord;
    type IntoIter = std::vec::IntoIter<ArchitectureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl From<Vec<ArchitectureRecord>> for RecordTable {
    fn from(records: Vec<ArchitectureRecord>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_reader_any_column_order() {
        let tsv = "protein\tarchitecture\tspecies\textra\n\
                   P1\tD1~D2\tS\tx\n\
                   P2\tD2~D3\tS\ty\n";
        let table = RecordTable::from_reader(tsv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0], ArchitectureRecord::new("S", "P1", "D1~D2"));
        assert_eq!(table.records()[1].architecture, "D2~D3");
    }

    #[test]
    fn test_missing_column() {
        let tsv = "species\tprotein\nS\tP1\n";
        let err = RecordTable::from_reader(tsv.as_bytes()).unwrap_err();
        assert!(matches!(err, PromiscuityError::MissingColumn(c) if c == "architecture"));
    }

    #[test]
    fn test_header_only_is_empty_data() {
        let tsv = "species\tprotein\tarchitecture\n";
        let err = RecordTable::from_reader(tsv.as_bytes()).unwrap_err();
        assert!(matches!(err, PromiscuityError::EmptyData(_)));
    }

    #[test]
    fn test_missing_file_is_data_source_error() {
        let err = RecordTable::from_tsv("/nonexistent/records.tsv").unwrap_err();
        assert!(matches!(err, PromiscuityError::DataSource(_)));
    }

    #[test]
    fn test_from_tsv_and_filter() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "species\tprotein\tarchitecture").unwrap();
        writeln!(file, "HUMAN\tP1\tD1~D2").unwrap();
        writeln!(file, "YEAST\tP2\tD3").unwrap();
        writeln!(file, "HUMAN\tP3\tD2").unwrap();
        file.flush().unwrap();

        let table = RecordTable::from_tsv(file.path()).unwrap();
        assert_eq!(table.len(), 3);

        let human = table.filter_species(&["HUMAN".to_string()]);
        assert_eq!(human.len(), 2);
        assert!(human.iter().all(|r| r.species == "HUMAN"));
    }
}
