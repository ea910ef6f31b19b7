//! Per-rank exclusive and core classification of features.

use crate::data::{tsv_reader, FeatureColumns};
use crate::error::{PromiscuityError, Result};
use crate::report::write_to_path;
use crate::taxonomy::{Lineage, LineageIndex, TaxonLevel, TaxonomyCounts};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// One occurrence of a feature in a strain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonRecord {
    pub feature: String,
    pub descriptors: Vec<String>,
    pub lineage: Lineage,
}

impl TaxonRecord {
    /// Create a record without descriptors.
    pub fn new(feature: impl Into<String>, lineage: Lineage) -> Self {
        Self {
            feature: feature.into(),
            descriptors: Vec::new(),
            lineage,
        }
    }
}

/// Feature occurrences together with the columns they were read from.
#[derive(Debug, Clone, Default)]
pub struct TaxonTable {
    pub columns: FeatureColumns,
    pub records: Vec<TaxonRecord>,
}

impl TaxonTable {
    /// Create a table from records.
    pub fn new(columns: FeatureColumns, records: Vec<TaxonRecord>) -> Self {
        Self { columns, records }
    }

    /// Read occurrences from TSV text with a header row.
    ///
    /// Besides the feature and descriptor columns, every row needs the rank
    /// columns `phylum`, `subphylum`, `order`, `genus`, `species` and
    /// `strains`.
    pub fn read_tsv<R: Read>(reader: R, columns: FeatureColumns) -> Result<Self> {
        let mut rdr = tsv_reader(reader);
        let headers = rdr.headers()?.clone();
        let index = columns.locate(&headers)?;
        let lineage_index = LineageIndex::locate(&headers)?;

        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row?;
            records.push(TaxonRecord {
                feature: index.feature(&row),
                descriptors: index.descriptors(&row),
                lineage: lineage_index.read(&row),
            });
        }
        Ok(Self { columns, records })
    }

    /// Read occurrences from a TSV file.
    pub fn from_tsv<P: AsRef<Path>>(path: P, columns: FeatureColumns) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PromiscuityError::DataSource(format!("cannot open {}: {}", path.display(), e))
        })?;
        let table = Self::read_tsv(file, columns)?;
        info!(path = %path.display(), records = table.len(), "loaded taxon records");
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

/// Where a feature stands at one rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMembership {
    /// The single taxon holding every occurrence, if there is one.
    pub taxon: Option<String>,
    /// Whether every strain of that taxon carries the feature.
    pub core: bool,
}

impl LevelMembership {
    /// Whether the feature is confined to one taxon at this rank.
    pub fn is_exclusive(&self) -> bool {
        self.taxon.is_some()
    }
}

/// Classification of one feature at every reported rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreFeature {
    pub feature: String,
    pub descriptors: Vec<String>,
    /// Distinct strains carrying the feature.
    pub n_strains: usize,
    /// One entry per rank of [`TaxonLevel::REPORTED`], in that order.
    pub levels: Vec<LevelMembership>,
}

impl CoreFeature {
    /// Membership at `level`; `None` for the strain rank.
    pub fn level(&self, level: TaxonLevel) -> Option<&LevelMembership> {
        TaxonLevel::REPORTED
            .iter()
            .position(|l| *l == level)
            .and_then(|i| self.levels.get(i))
    }
}

/// Exclusive/core table of every feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreReport {
    pub columns: FeatureColumns,
    /// Sorted by feature, ignoring case.
    pub features: Vec<CoreFeature>,
}

#[derive(Default)]
struct Occurrences<'a> {
    descriptors: &'a [String],
    taxa: [BTreeSet<&'a str>; 5],
    strains: BTreeSet<&'a str>,
}

/// Classify every feature of `table` at each rank above the strain.
///
/// A feature is exclusive at a rank when all its occurrences share one
/// taxon there. It is core when, in addition, the number of distinct
/// strains carrying it equals the strain count of that taxon in `counts`.
pub fn core_features(table: &TaxonTable, counts: &TaxonomyCounts) -> CoreReport {
    let mut by_feature: BTreeMap<&str, Occurrences<'_>> = BTreeMap::new();
    for record in &table.records {
        let occ = by_feature
            .entry(record.feature.as_str())
            .or_insert_with(|| Occurrences {
                descriptors: record.descriptors.as_slice(),
                ..Default::default()
            });
        for (i, level) in TaxonLevel::REPORTED.iter().enumerate() {
            occ.taxa[i].insert(record.lineage.get(*level));
        }
        occ.strains.insert(record.lineage.strain());
    }

    let mut features: Vec<CoreFeature> = by_feature
        .into_iter()
        .map(|(feature, occ)| {
            let n_strains = occ.strains.len();
            let levels = TaxonLevel::REPORTED
                .iter()
                .zip(occ.taxa.iter())
                .map(|(level, taxa)| match taxa.iter().next() {
                    Some(taxon) if taxa.len() == 1 => LevelMembership {
                        taxon: Some(taxon.to_string()),
                        core: n_strains == counts.strains_in(*level, taxon),
                    },
                    _ => LevelMembership::default(),
                })
                .collect();
            CoreFeature {
                feature: feature.to_string(),
                descriptors: occ.descriptors.to_vec(),
                n_strains,
                levels,
            }
        })
        .collect();
    features.sort_by_cached_key(|f| (f.feature.to_lowercase(), f.feature.clone()));

    CoreReport {
        columns: table.columns.clone(),
        features,
    }
}

impl CoreReport {
    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Look up a feature.
    pub fn get(&self, feature: &str) -> Option<&CoreFeature> {
        self.features.iter().find(|f| f.feature == feature)
    }

    /// Write the report as TSV.
    ///
    /// Columns: the feature and descriptor columns, then `<rank>` and `core`
    /// for each rank. A rank where the feature is not exclusive reads `0`
    /// in both columns.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> Result<()> {
        let labels: Vec<&str> = self.columns.labels().collect();
        write!(writer, "{}", labels.join("\t"))?;
        for level in TaxonLevel::REPORTED {
            write!(writer, "\t{}\tcore", level)?;
        }
        writeln!(writer)?;

        for f in &self.features {
            write!(writer, "{}", f.feature)?;
            for d in &f.descriptors {
                write!(writer, "\t{}", d)?;
            }
            for m in &f.levels {
                match &m.taxon {
                    Some(taxon) => write!(writer, "\t{}\t{}", taxon, u8::from(m.core))?,
                    None => write!(writer, "\t0\t0")?,
                }
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

#[cfg(test)]
mod tests {
    use super::*;

    /// Two Candida strains of one species, one Aspergillus strain.
    fn lineages() -> Vec<Lineage> {
        vec![
            Lineage::new("Asco", "Sacch", "Saccales", "Candida", "C. albicans", "SC5314"),
            Lineage::new("Asco", "Sacch", "Saccales", "Candida", "C. albicans", "WO-1"),
            Lineage::new(
                "Asco",
                "Pezi",
                "Eurotiales",
                "Aspergillus",
                "A. fumigatus",
                "Af293",
            ),
        ]
    }

    fn report(occurrences: &[(&str, usize)]) -> CoreReport {
        let strains = lineages();
        let counts = TaxonomyCounts::from_lineages(&strains);
        let records = occurrences
            .iter()
            .map(|(feature, strain)| TaxonRecord::new(*feature, strains[*strain].clone()))
            .collect();
        core_features(&TaxonTable::new(FeatureColumns::default(), records), &counts)
    }

    #[test]
    fn test_core_in_every_strain_of_taxon() {
        // Both C. albicans strains, nothing else
        let report = report(&[("Hyphal_reg", 0), ("Hyphal_reg", 1), ("Hyphal_reg", 0)]);
        let f = report.get("Hyphal_reg").unwrap();
        assert_eq!(f.n_strains, 2);

        let species = f.level(TaxonLevel::Species).unwrap();
        assert_eq!(species.taxon.as_deref(), Some("C. albicans"));
        assert!(species.core);

        // Exclusive to the phylum, but Af293 lacks it
        let phylum = f.level(TaxonLevel::Phylum).unwrap();
        assert_eq!(phylum.taxon.as_deref(), Some("Asco"));
        assert!(!phylum.core);
    }

    #[test]
    fn test_exclusive_but_not_core() {
        let report = report(&[("Adhesin", 1)]);
        let f = report.get("Adhesin").unwrap();
        let genus = f.level(TaxonLevel::Genus).unwrap();
        assert!(genus.is_exclusive());
        assert!(!genus.core);
    }

    #[test]
    fn test_neither_exclusive_nor_core() {
        let report = report(&[("Pkinase", 0), ("Pkinase", 1), ("Pkinase", 2)]);
        let f = report.get("Pkinase").unwrap();

        assert!(f.level(TaxonLevel::Phylum).unwrap().core);
        for level in [
            TaxonLevel::Subphylum,
            TaxonLevel::Order,
            TaxonLevel::Genus,
            TaxonLevel::Species,
        ] {
            let m = f.level(level).unwrap();
            assert!(!m.is_exclusive());
            assert!(!m.core);
        }
        assert!(f.level(TaxonLevel::Strain).is_none());
    }

    #[test]
    fn test_write_tsv() {
        let report = report(&[("b_dom", 2), ("A_dom", 0), ("A_dom", 2)]);
        let mut out = Vec::new();
        report.write_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "feature\tphylum\tcore\tsubphylum\tcore\torder\tcore\tgenus\tcore\tspecies\tcore"
        );
        assert_eq!(lines[1], "A_dom\tAsco\t0\t0\t0\t0\t0\t0\t0\t0\t0");
        assert_eq!(
            lines[2],
            "b_dom\tAsco\t0\tPezi\t1\tEurotiales\t1\tAspergillus\t1\tA. fumigatus\t1"
        );
    }

    #[test]
    fn test_read_tsv_with_descriptors() {
        let tsv = "pfamA_id\tpfamA_acc\tphylum\tsubphylum\torder\tgenus\tspecies\tstrains\n\
                   AhpC-TSA\tPF00578\tAsco\tSacch\tSaccales\tCandida\tC. albicans\tSC5314\n";
        let columns = FeatureColumns::new("pfamA_id").with_descriptors(["pfamA_acc"]);
        let table = TaxonTable::read_tsv(tsv.as_bytes(), columns).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].descriptors, vec!["PF00578"]);
        assert_eq!(table.records[0].lineage.strain(), "SC5314");

        let counts = TaxonomyCounts::from_lineages(table.records.iter().map(|r| &r.lineage));
        let report = core_features(&table, &counts);
        let mut out = Vec::new();
        report.write_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("pfamA_id\tpfamA_acc\tphylum\tcore"));
        assert!(text.contains("AhpC-TSA\tPF00578\tAsco\t1\t"));
    }
}
