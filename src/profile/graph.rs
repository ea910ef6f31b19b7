//! Summary profile of a bigram graph.

use crate::graph::{BigramGraph, SpeciesGraph};
use crate::metric::SpeciesStats;
use serde::{Deserialize, Serialize};

/// Profile of one species' bigram statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesProfile {
    /// Species name.
    pub species: String,
    /// Architecture records folded in.
    pub n_architectures: usize,
    /// Records with more than one domain.
    pub n_multi_domain: usize,
    /// Distinct proteins.
    pub n_proteins: usize,
    /// Distinct domain types.
    pub n_domain_types: usize,
    /// Total domain occurrences.
    pub total_appearances: u64,
    /// Domains with at least one neighbour.
    pub n_computable: usize,
    /// Promiscuity of a singleton domain, if any bigram exists.
    pub singleton_cutoff: Option<f64>,
}

impl SpeciesProfile {
    /// Profile one species graph.
    pub fn from_graph(species: &str, graph: &SpeciesGraph) -> Self {
        let stats = SpeciesStats::from_graph(species, graph);
        let n_computable = graph
            .domains()
            .filter(|(_, d)| !d.neighbours().is_empty())
            .count();
        Self {
            species: species.to_string(),
            n_architectures: graph.n_architectures(),
            n_multi_domain: graph.n_multi_domain(),
            n_proteins: stats.n_proteins,
            n_domain_types: stats.n_domain_types,
            total_appearances: stats.total_appearances,
            n_computable,
            singleton_cutoff: stats.singleton_cutoff(),
        }
    }

    /// Fraction of architectures with more than one domain.
    pub fn multi_domain_fraction(&self) -> f64 {
        if self.n_architectures == 0 {
            0.0
        } else {
            self.n_multi_domain as f64 / self.n_architectures as f64
        }
    }
}

/// Profile of every species in a graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphProfile {
    pub n_species: usize,
    pub species: Vec<SpeciesProfile>,
}

impl GraphProfile {
    /// Total architecture records across species.
    pub fn n_architectures(&self) -> usize {
        self.species.iter().map(|s| s.n_architectures).sum()
    }

    /// Total computable (species, domain) pairs.
    pub fn n_computable(&self) -> usize {
        self.species.iter().map(|s| s.n_computable).sum()
    }
}

impl std::fmt::Display for GraphProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Bigram Graph Profile")?;
        writeln!(f, "  Species:       {}", self.n_species)?;
        writeln!(f, "  Architectures: {}", self.n_architectures())?;
        writeln!(f, "  Computable domain pairs: {}", self.n_computable())?;
        for s in &self.species {
            writeln!(f)?;
            writeln!(f, "  {}", s.species)?;
            writeln!(f, "    Architectures:  {}", s.n_architectures)?;
            writeln!(
                f,
                "    Multi-domain:   {} ({:.2}%)",
                s.n_multi_domain,
                s.multi_domain_fraction() * 100.0
            )?;
            writeln!(f, "    Proteins:       {}", s.n_proteins)?;
            writeln!(f, "    Domain types:   {}", s.n_domain_types)?;
            writeln!(f, "    Domain occurrences: {}", s.total_appearances)?;
            writeln!(f, "    Computable domains: {}", s.n_computable)?;
            match s.singleton_cutoff {
                Some(c) => writeln!(f, "    Singleton cutoff:   {:.6}", c)?,
                None => writeln!(f, "    Singleton cutoff:   n/a")?,
            }
        }
        Ok(())
    }
}

/// Profile every species of a bigram graph.
pub fn profile_graph(graph: &BigramGraph) -> GraphProfile {
    let species: Vec<SpeciesProfile> = graph
        .iter()
        .map(|(name, g)| SpeciesProfile::from_graph(name, g))
        .collect();
    GraphProfile {
        n_species: species.len(),
        species,
    }
}
