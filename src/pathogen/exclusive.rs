//! Features (domains or architectures) exclusive to one pathogen type.

use crate::data::{column_position, tsv_reader, FeatureColumns};
use crate::error::{PromiscuityError, Result};
use crate::pathogen::{group_member_counts, is_exclusive, GroupCounts, PathogenType};
use crate::report::write_to_path;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// One occurrence of a feature in a species of a given pathogen type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathogenRecord {
    pub feature: String,
    /// Values of the descriptor columns, in column order.
    pub descriptors: Vec<String>,
    pub pathogen_type: PathogenType,
}

impl PathogenRecord {
    /// Create a record without descriptors.
    pub fn new(feature: impl Into<String>, pathogen_type: PathogenType) -> Self {
        Self {
            feature: feature.into(),
            descriptors: Vec::new(),
            pathogen_type,
        }
    }

    /// Attach descriptor values.
    pub fn with_descriptors<I, S>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptors = descriptors.into_iter().map(Into::into).collect();
        self
    }
}

/// Pathogen records together with the columns they were read from.
#[derive(Debug, Clone, Default)]
pub struct PathogenTable {
    pub columns: FeatureColumns,
    pub records: Vec<PathogenRecord>,
}

impl PathogenTable {
    /// Create a table from records.
    pub fn new(columns: FeatureColumns, records: Vec<PathogenRecord>) -> Self {
        Self { columns, records }
    }

    /// Read records from TSV text with a header row.
    ///
    /// `columns` names the feature column (e.g. `pfamA_id` or
    /// `architecture`) and the descriptor columns to carry through; the
    /// pathogen code is read from `pathogen_type`. Other columns are ignored.
    pub fn read_tsv<R: Read>(reader: R, columns: FeatureColumns) -> Result<Self> {
        let mut rdr = tsv_reader(reader);
        let headers = rdr.headers()?.clone();
        let index = columns.locate(&headers)?;
        let type_idx = column_position(&headers, "pathogen_type")?;

        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row?;
            let pathogen_type: PathogenType = row.get(type_idx).unwrap_or_default().parse()?;
            records.push(PathogenRecord {
                feature: index.feature(&row),
                descriptors: index.descriptors(&row),
                pathogen_type,
            });
        }
        Ok(Self { columns, records })
    }

    /// Read records from a TSV file.
    pub fn from_tsv<P: AsRef<Path>>(path: P, columns: FeatureColumns) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PromiscuityError::DataSource(format!("cannot open {}: {}", path.display(), e))
        })?;
        let table = Self::read_tsv(file, columns)?;
        info!(path = %path.display(), records = table.len(), "loaded pathogen records");
        Ok(table)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A feature whose pathogen types are exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusiveFeature {
    pub feature: String,
    /// Descriptors of the first record seen for the feature.
    pub descriptors: Vec<String>,
    /// Distinct pathogen types the feature was seen in.
    pub pathogen_types: BTreeSet<PathogenType>,
}

impl ExclusiveFeature {
    /// Reported pathogen type: the lowest code present.
    pub fn pathogen_type(&self) -> Option<PathogenType> {
        self.pathogen_types.iter().next().copied()
    }
}

/// Exclusive features sorted by pathogen type, then feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusiveReport {
    pub collapse: bool,
    pub columns: FeatureColumns,
    pub features: Vec<ExclusiveFeature>,
    /// Per-type totals; adds `num_species` and `num_strains` columns.
    pub group_counts: Option<HashMap<PathogenType, GroupCounts>>,
}

/// Keep the features whose set of pathogen types is exclusive.
pub fn exclusive_features(table: &PathogenTable, collapse: bool) -> ExclusiveReport {
    let mut by_feature: BTreeMap<&str, (&[String], BTreeSet<PathogenType>)> = BTreeMap::new();
    for record in &table.records {
        by_feature
            .entry(record.feature.as_str())
            .or_insert_with(|| (record.descriptors.as_slice(), BTreeSet::new()))
            .1
            .insert(record.pathogen_type);
    }

    let mut features: Vec<ExclusiveFeature> = by_feature
        .into_iter()
        .filter(|(_, (_, types))| is_exclusive(types, collapse))
        .map(|(feature, (descriptors, pathogen_types))| ExclusiveFeature {
            feature: feature.to_string(),
            descriptors: descriptors.to_vec(),
            pathogen_types,
        })
        .collect();
    // Stable: features stay alphabetical within a pathogen type.
    features.sort_by_key(|f| f.pathogen_type());

    ExclusiveReport {
        collapse,
        columns: table.columns.clone(),
        features,
        group_counts: None,
    }
}

impl ExclusiveReport {
    /// Add species and strain totals of each row's pathogen type.
    pub fn with_group_counts(mut self, counts: HashMap<PathogenType, GroupCounts>) -> Self {
        self.group_counts = Some(counts);
        self
    }

    /// Number of exclusive features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Write the report as TSV with a header row.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> Result<()> {
        write!(writer, "pathogen_type")?;
        for label in self.columns.labels() {
            write!(writer, "\t{}", label)?;
        }
        if self.group_counts.is_some() {
            write!(writer, "\tnum_species\tnum_strains")?;
        }
        writeln!(writer)?;

        for f in &self.features {
            let Some(t) = f.pathogen_type() else {
                continue;
            };
            write!(writer, "{}\t{}", t, f.feature)?;
            for d in &f.descriptors {
                write!(writer, "\t{}", d)?;
            }
            if let Some(counts) = &self.group_counts {
                let total = group_member_counts(counts, t, self.collapse);
                write!(writer, "\t{}\t{}", total.n_species, total.n_strains)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Write the report to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_to_path(path, |w| self.write_tsv(w))
    }
}
