//! Species-level quantities shared by every domain's metrics.

use crate::graph::SpeciesGraph;
use serde::{Deserialize, Serialize};

/// Genome-wide totals for one species.
///
/// These do not depend on the domain being scored, so they are computed
/// once per species and reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesStats {
    /// Species name.
    pub species: String,
    /// Number of distinct domain types (`t`).
    pub n_domain_types: usize,
    /// Total domain occurrences (`N`).
    pub total_appearances: u64,
    /// Sum of distinct-neighbour counts over all domains.
    pub total_distinct_neighbours: usize,
    /// Distinct proteins across all domains (`p_t`).
    pub n_proteins: usize,
}

impl SpeciesStats {
    /// Compute the totals of a species graph.
    pub fn from_graph(species: &str, graph: &SpeciesGraph) -> Self {
        Self {
            species: species.to_string(),
            n_domain_types: graph.n_domain_types(),
            total_appearances: graph.total_appearances(),
            total_distinct_neighbours: graph.total_distinct_neighbours(),
            n_proteins: graph.n_distinct_proteins(),
        }
    }

    /// Half the neighbour-count sum: the number of distinct bigram types.
    #[inline]
    pub fn bigram_types(&self) -> f64 {
        0.5 * self.total_distinct_neighbours as f64
    }

    /// Promiscuity of a domain seen once with a single neighbour type.
    ///
    /// Used as the cutoff below which a score is no better than a singleton.
    /// `None` when the species has no multi-domain architectures.
    pub fn singleton_cutoff(&self) -> Option<f64> {
        if self.total_distinct_neighbours == 0 || self.total_appearances == 0 {
            return None;
        }
        let beta = 1.0 / self.bigram_types();
        let f = 1.0 / self.total_appearances as f64;
        Some(beta * (beta / f).log10())
    }
}
