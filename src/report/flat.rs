//! Flat per-(species, domain) metric table.

use crate::error::Result;
use crate::metric::{DomainMetrics, SpeciesMetrics};
use crate::report::{format_float, write_to_path};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Column labels of the flat report, in output order.
pub const FLAT_HEADER: [&str; 8] = [
    "species",
    "domain",
    "num_bigrams",
    "domain_promiscuity",
    "singleton_promiscuity_cutoff",
    "IAF_d",
    "IV_d",
    "weight_score",
];

/// One row per computable (species, domain) pair, sorted by species then
/// domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatReport {
    pub rows: Vec<DomainMetrics>,
    /// Pairs left out because the domain has no bigrams.
    pub n_skipped: usize,
}

impl FlatReport {
    /// Flatten per-species metrics.
    pub fn from_metrics(species: &[SpeciesMetrics]) -> Self {
        let rows = species
            .iter()
            .flat_map(|s| s.metrics.iter().cloned())
            .collect();
        let n_skipped = species.iter().map(|s| s.skipped.len()).sum();
        Self { rows, n_skipped }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose promiscuity exceeds their species' singleton cutoff.
    pub fn above_cutoff(&self) -> Vec<&DomainMetrics> {
        self.rows
            .iter()
            .filter(|m| m.above_singleton_cutoff())
            .collect()
    }

    /// Write the report as TSV with a header row.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", FLAT_HEADER.join("\t"))?;
        for m in &self.rows {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                m.species,
                m.domain,
                m.num_bigrams,
                format_float(m.domain_promiscuity),
                format_float(m.singleton_promiscuity_cutoff),
                format_float(m.iaf),
                format_float(m.iv),
                format_float(m.weight_score),
            )?;
        }
        Ok(())
    }

    /// Write the report to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_to_path(path, |w| self.write_tsv(w))
    }
}
