//! Taxonomic distribution of domains and architectures.
//!
//! Every strain sits in a lineage `phylum > subphylum > order > genus >
//! species > strain`. At each rank above the strain a feature is
//! *exclusive* when all of its occurrences fall in one taxon, and *core*
//! when it is additionally found in every strain of that taxon.

mod membership;

pub use membership::{
    core_features, CoreFeature, CoreReport, LevelMembership, TaxonRecord, TaxonTable,
};

use crate::data::{column_position, tsv_reader};
use crate::error::{PromiscuityError, Result};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// A taxonomic rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonLevel {
    Phylum,
    Subphylum,
    Order,
    Genus,
    Species,
    Strain,
}

impl TaxonLevel {
    /// All ranks, outermost first.
    pub const ALL: [TaxonLevel; 6] = [
        Self::Phylum,
        Self::Subphylum,
        Self::Order,
        Self::Genus,
        Self::Species,
        Self::Strain,
    ];

    /// Ranks reported for exclusivity; the strain is the unit being counted.
    pub const REPORTED: [TaxonLevel; 5] = [
        Self::Phylum,
        Self::Subphylum,
        Self::Order,
        Self::Genus,
        Self::Species,
    ];

    /// Column name of the rank in TSV input and output.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Phylum => "phylum",
            Self::Subphylum => "subphylum",
            Self::Order => "order",
            Self::Genus => "genus",
            Self::Species => "species",
            Self::Strain => "strains",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for TaxonLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// The taxa a strain belongs to, one per rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lineage {
    taxa: [String; 6],
}

impl Lineage {
    /// Build from taxon names, outermost rank first.
    pub fn new(
        phylum: impl Into<String>,
        subphylum: impl Into<String>,
        order: impl Into<String>,
        genus: impl Into<String>,
        species: impl Into<String>,
        strain: impl Into<String>,
    ) -> Self {
        Self {
            taxa: [
                phylum.into(),
                subphylum.into(),
                order.into(),
                genus.into(),
                species.into(),
                strain.into(),
            ],
        }
    }

    /// Taxon at `level`.
    pub fn get(&self, level: TaxonLevel) -> &str {
        &self.taxa[level.index()]
    }

    /// The strain name.
    pub fn strain(&self) -> &str {
        self.get(TaxonLevel::Strain)
    }
}

/// Positions of the six rank columns in a header row.
#[derive(Debug, Clone)]
pub(crate) struct LineageIndex([usize; 6]);

impl LineageIndex {
    pub(crate) fn locate(headers: &StringRecord) -> Result<Self> {
        let mut positions = [0usize; 6];
        for level in TaxonLevel::ALL {
            positions[level.index()] = column_position(headers, level.column())?;
        }
        Ok(Self(positions))
    }

    pub(crate) fn read(&self, row: &StringRecord) -> Lineage {
        Lineage {
            taxa: self
                .0
                .map(|i| row.get(i).unwrap_or_default().trim().to_string()),
        }
    }
}

/// Number of strains under each taxon.
///
/// Taxa are keyed by rank as well as name, so a genus and a species that
/// share a name are counted apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyCounts {
    strains: HashMap<(TaxonLevel, String), usize>,
}

impl TaxonomyCounts {
    /// Count strains from one lineage per strain.
    pub fn from_lineages<'a, I>(lineages: I) -> Self
    where
        I: IntoIterator<Item = &'a Lineage>,
    {
        let mut counts = Self::default();
        for lineage in lineages {
            counts.add(lineage);
        }
        counts
    }

    /// Count one strain under each of its taxa.
    pub fn add(&mut self, lineage: &Lineage) {
        for level in TaxonLevel::ALL {
            *self
                .strains
                .entry((level, lineage.get(level).to_string()))
                .or_default() += 1;
        }
    }

    /// Strains under `taxon` at `level`; zero for unknown taxa.
    pub fn strains_in(&self, level: TaxonLevel, taxon: &str) -> usize {
        self.strains
            .get(&(level, taxon.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Read the taxonomy table: one row per strain with the six rank columns.
    pub fn read_tsv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = tsv_reader(reader);
        let headers = rdr.headers()?.clone();
        let index = LineageIndex::locate(&headers)?;

        let mut counts = Self::default();
        for row in rdr.records() {
            counts.add(&index.read(&row?));
        }
        Ok(counts)
    }

    /// Read the taxonomy table from a TSV file.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PromiscuityError::DataSource(format!("cannot open {}: {}", path.display(), e))
        })?;
        let counts = Self::read_tsv(file)?;
        info!(
            path = %path.display(),
            strains = counts.n_strains(),
            "loaded taxonomy"
        );
        Ok(counts)
    }

    /// Number of distinct strains counted.
    pub fn n_strains(&self) -> usize {
        self.strains
            .keys()
            .filter(|(level, _)| *level == TaxonLevel::Strain)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lineage_lookup() {
        let lineage = Lineage::new(
            "Ascomycota",
            "Saccharomycotina",
            "Saccharomycetales",
            "Candida",
            "C. albicans",
            "SC5314",
        );
        assert_eq!(lineage.get(TaxonLevel::Genus), "Candida");
        assert_eq!(lineage.strain(), "SC5314");
        assert_eq!(TaxonLevel::Strain.to_string(), "strains");
    }

    #[test]
    fn test_counts_by_level() {
        let tsv = "phylum\tsubphylum\torder\tgenus\tspecies\tstrains\n\
                   Asco\tSacch\tSaccales\tCandida\tC. albicans\tSC5314\n\
                   Asco\tSacch\tSaccales\tCandida\tC. albicans\tWO-1\n\
                   Asco\tPezi\tEurotiales\tAspergillus\tA. fumigatus\tAf293\n";
        let counts = TaxonomyCounts::read_tsv(tsv.as_bytes()).unwrap();

        assert_eq!(counts.n_strains(), 3);
        assert_eq!(counts.strains_in(TaxonLevel::Phylum, "Asco"), 3);
        assert_eq!(counts.strains_in(TaxonLevel::Species, "C. albicans"), 2);
        assert_eq!(counts.strains_in(TaxonLevel::Genus, "Aspergillus"), 1);
        assert_eq!(counts.strains_in(TaxonLevel::Genus, "Asco"), 0);
    }

    #[test]
    fn test_counts_missing_rank_column() {
        let tsv = "phylum\tsubphylum\torder\tgenus\tspecies\nA\tB\tC\tD\tE\n";
        assert!(matches!(
            TaxonomyCounts::read_tsv(tsv.as_bytes()),
            Err(PromiscuityError::MissingColumn(c)) if c == "strains"
        ));
    }
}
