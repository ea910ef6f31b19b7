//! Domain promiscuity scores.
//!
//! Two independent measures are computed per (species, domain):
//!
//! 1. Weighted bigram frequency (Basu et al. 2008), a Kullback-Leibler
//!    style score:
//!
//!    ```text
//!    pi_i   = beta_i * log10(beta_i / f_i)
//!    beta_i = T_i / (0.5 * Sum[j=1..t] T_j)
//!    f_i    = n_i / N
//!    ```
//!
//!    where `T_i` is the number of distinct neighbours of domain `i`, `n_i`
//!    its occurrence count and `N` the occurrence count of all domains in
//!    the genome.
//!
//! 2. Weight score (Lee & Lee 2009):
//!
//!    ```text
//!    weight_score = IAF_d * IV_d
//!    IAF_d        = log2(p_t / p_d)
//!    IV_d         = 1 / T_i
//!    ```
//!
//!    where `p_t` is the number of proteins in the genome and `p_d` the
//!    number containing the domain.

use crate::error::{PromiscuityError, Result};
use crate::graph::{BigramGraph, SpeciesGraph};
use crate::metric::SpeciesStats;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The six metric values of one (species, domain) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainMetrics {
    pub species: String,
    pub domain: String,
    /// Distinct neighbour domain types (`T_i`).
    pub num_bigrams: usize,
    /// Weighted bigram frequency score (`pi_i`).
    pub domain_promiscuity: f64,
    /// Score of a singleton domain in the same species.
    pub singleton_promiscuity_cutoff: f64,
    /// Inverse abundance frequency.
    #[serde(rename = "IAF_d")]
    pub iaf: f64,
    /// Inverse versatility.
    #[serde(rename = "IV_d")]
    pub iv: f64,
    pub weight_score: f64,
}

impl DomainMetrics {
    /// Whether the promiscuity score exceeds the singleton cutoff.
    pub fn above_singleton_cutoff(&self) -> bool {
        self.domain_promiscuity > self.singleton_promiscuity_cutoff
    }
}

/// Compute the metrics of `domain` using precomputed species totals.
///
/// Returns [`PromiscuityError::NonComputable`] when the domain never sits
/// next to another domain in the species.
pub fn domain_metrics(
    graph: &SpeciesGraph,
    stats: &SpeciesStats,
    domain: &str,
) -> Result<DomainMetrics> {
    let record = graph.get(domain).ok_or_else(|| PromiscuityError::UnknownKey {
        species: stats.species.clone(),
        domain: domain.to_string(),
    })?;

    let t_i = record.n_distinct_neighbours();
    let singleton = match stats.singleton_cutoff() {
        Some(cutoff) if t_i > 0 => cutoff,
        _ => {
            return Err(PromiscuityError::NonComputable {
                species: stats.species.clone(),
                domain: domain.to_string(),
            })
        }
    };

    let n_i = record.appearances() as f64;
    let f_i = n_i / stats.total_appearances as f64;
    let beta_i = t_i as f64 / stats.bigram_types();
    let pi_i = beta_i * (beta_i / f_i).log10();

    let iv = 1.0 / t_i as f64;
    let p_d = record.n_distinct_proteins() as f64;
    let iaf = (stats.n_proteins as f64 / p_d).log2();

    Ok(DomainMetrics {
        species: stats.species.clone(),
        domain: domain.to_string(),
        num_bigrams: t_i,
        domain_promiscuity: pi_i,
        singleton_promiscuity_cutoff: singleton,
        iaf,
        iv,
        weight_score: iaf * iv,
    })
}

/// Compute the metrics of one (species, domain) key of the full graph.
///
/// Species totals are recomputed on every call; use [`species_metrics`]
/// when scoring many domains of the same species.
pub fn compute_promiscuity(
    graph: &BigramGraph,
    species: &str,
    domain: &str,
) -> Result<DomainMetrics> {
    let species_graph = graph
        .species(species)
        .ok_or_else(|| PromiscuityError::UnknownKey {
            species: species.to_string(),
            domain: domain.to_string(),
        })?;
    let stats = SpeciesStats::from_graph(species, species_graph);
    domain_metrics(species_graph, &stats, domain)
}

/// Metrics of every domain of one species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesMetrics {
    pub stats: SpeciesStats,
    /// Computable domains, in domain order.
    pub metrics: Vec<DomainMetrics>,
    /// Domains without any neighbour.
    pub skipped: Vec<String>,
}

impl SpeciesMetrics {
    /// Species name.
    pub fn species(&self) -> &str {
        &self.stats.species
    }

    /// Number of computable domains.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Check if no domain was computable.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Score every domain of one species.
///
/// Non-computable domains are logged and listed in `skipped`; they never
/// abort the species.
pub fn species_metrics(species: &str, graph: &SpeciesGraph) -> Result<SpeciesMetrics> {
    let stats = SpeciesStats::from_graph(species, graph);
    let mut metrics = Vec::with_capacity(graph.n_domain_types());
    let mut skipped = Vec::new();

    for domain in graph.domain_ids() {
        match domain_metrics(graph, &stats, domain) {
            Ok(m) => metrics.push(m),
            Err(e) if e.is_non_computable() => {
                debug!(species, domain, "skipping domain without bigrams");
                skipped.push(domain.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(SpeciesMetrics {
        stats,
        metrics,
        skipped,
    })
}

/// Score every species of the graph.
///
/// Species are scored in parallel over the read-only graph; the result is
/// in species-name order.
pub fn graph_metrics(graph: &BigramGraph) -> Result<Vec<SpeciesMetrics>> {
    let species: Vec<(&str, &SpeciesGraph)> = graph.iter().collect();
    let results: Vec<SpeciesMetrics> = species
        .into_par_iter()
        .map(|(name, g)| species_metrics(name, g))
        .collect::<Result<_>>()?;

    let n_scored: usize = results.iter().map(SpeciesMetrics::len).sum();
    let n_skipped: usize = results.iter().map(|s| s.skipped.len()).sum();
    info!(
        species = results.len(),
        scored = n_scored,
        skipped = n_skipped,
        "computed domain promiscuity"
    );
    Ok(results)
}
