//! Named columns identifying a feature (domain or architecture) in a TSV
//! export.

use crate::error::{PromiscuityError, Result};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// The identifying column of a feature plus descriptor columns carried
/// through to the output unchanged (accession, description, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureColumns {
    pub feature: String,
    #[serde(default)]
    pub descriptors: Vec<String>,
}

impl FeatureColumns {
    /// Identify features by `feature` alone.
    pub fn new(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            descriptors: Vec::new(),
        }
    }

    /// Carry these descriptor columns after the feature.
    pub fn with_descriptors<I, S>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptors = descriptors.into_iter().map(Into::into).collect();
        self
    }

    /// Output labels: the feature column, then the descriptors.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.feature.as_str()).chain(self.descriptors.iter().map(String::as_str))
    }

    /// Resolve the columns against a header row.
    pub(crate) fn locate(&self, headers: &StringRecord) -> Result<ColumnIndex> {
        let feature = column_position(headers, &self.feature)?;
        let descriptors = self
            .descriptors
            .iter()
            .map(|d| column_position(headers, d))
            .collect::<Result<_>>()?;
        Ok(ColumnIndex {
            feature,
            descriptors,
        })
    }
}

impl Default for FeatureColumns {
    fn default() -> Self {
        Self::new("feature")
    }
}

/// Positions of a [`FeatureColumns`] set within one header row.
#[derive(Debug, Clone)]
pub(crate) struct ColumnIndex {
    feature: usize,
    descriptors: Vec<usize>,
}

impl ColumnIndex {
    pub(crate) fn feature(&self, row: &StringRecord) -> String {
        row.get(self.feature).unwrap_or_default().to_string()
    }

    pub(crate) fn descriptors(&self, row: &StringRecord) -> Vec<String> {
        self.descriptors
            .iter()
            .map(|&i| row.get(i).unwrap_or_default().to_string())
            .collect()
    }
}

/// Position of `name` in a header row.
pub(crate) fn column_position(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| PromiscuityError::MissingColumn(name.to_string()))
}

/// Tab-separated reader with a trimmed header row and no quoting.
pub(crate) fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .quoting(false)
        .trim(csv::Trim::Headers)
        .from_reader(reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_and_read() {
        let headers = StringRecord::from(vec!["pfamA_acc", "species", "pfamA_id"]);
        let row = StringRecord::from(vec!["PF00578", "C. albicans", "AhpC-TSA"]);

        let columns = FeatureColumns::new("pfamA_id").with_descriptors(["pfamA_acc"]);
        let index = columns.locate(&headers).unwrap();
        assert_eq!(index.feature(&row), "AhpC-TSA");
        assert_eq!(index.descriptors(&row), vec!["PF00578"]);
        assert_eq!(columns.labels().collect::<Vec<_>>(), vec!["pfamA_id", "pfamA_acc"]);
    }

    #[test]
    fn test_missing_descriptor_column() {
        let headers = StringRecord::from(vec!["feature"]);
        let columns = FeatureColumns::default().with_descriptors(["description"]);
        assert!(matches!(
            columns.locate(&headers),
            Err(PromiscuityError::MissingColumn(c)) if c == "description"
        ));
    }
}
