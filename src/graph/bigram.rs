//! Per-species domain adjacency (bigram) statistics.

use crate::data::{Architecture, ArchitectureRecord, DEFAULT_DELIMITER};
use crate::error::{PromiscuityError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Accumulated statistics for one domain within one species.
///
/// `neighbours` and `proteins` are multisets; duplicates are resolved to
/// sets when read through the `distinct_*` accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    appearances: u64,
    neighbours: Vec<String>,
    proteins: Vec<String>,
}

impl DomainRecord {
    /// Count one occurrence of the domain in `protein`.
    pub fn record_occurrence(&mut self, protein: &str) {
        self.appearances += 1;
        self.proteins.push(protein.to_string());
    }

    /// Record `domain` as directly adjacent to this one.
    pub fn record_neighbour(&mut self, domain: &str) {
        self.neighbours.push(domain.to_string());
    }

    /// Number of occurrences across all architectures of the species.
    #[inline]
    pub fn appearances(&self) -> u64 {
        self.appearances
    }

    /// Adjacent domains, with repetition.
    #[inline]
    pub fn neighbours(&self) -> &[String] {
        &self.neighbours
    }

    /// Proteins containing the domain, one entry per occurrence.
    #[inline]
    pub fn proteins(&self) -> &[String] {
        &self.proteins
    }

    /// Distinct adjacent domain types.
    pub fn distinct_neighbours(&self) -> BTreeSet<&str> {
        self.neighbours.iter().map(String::as_str).collect()
    }

    /// Number of distinct adjacent domain types (`T_i`).
    pub fn n_distinct_neighbours(&self) -> usize {
        self.distinct_neighbours().len()
    }

    /// Number of distinct proteins containing the domain (`p_d`).
    pub fn n_distinct_proteins(&self) -> usize {
        self.proteins
            .iter()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Bigram statistics of every domain seen in one species.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesGraph {
    domains: BTreeMap<String, DomainRecord>,
    n_architectures: usize,
    n_multi_domain: usize,
}

impl SpeciesGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one protein architecture into the statistics.
    ///
    /// Every domain occurrence is counted exactly once: the left member of
    /// each bigram is counted inside the loop, the final domain after it.
    pub fn add_architecture(&mut self, protein: &str, architecture: &Architecture) {
        self.n_architectures += 1;
        if architecture.is_multi_domain() {
            self.n_multi_domain += 1;
        }

        for (left, right) in architecture.bigrams() {
            self.domain_mut(left).record_occurrence(protein);
            self.domain_mut(left).record_neighbour(right);
            self.domain_mut(right).record_neighbour(left);
        }
        if let Some(last) = architecture.domains().last() {
            self.domain_mut(last).record_occurrence(protein);
        }
    }

    fn domain_mut(&mut self, domain: &str) -> &mut DomainRecord {
        self.domains.entry(domain.to_string()).or_default()
    }

    /// Look up a domain.
    pub fn get(&self, domain: &str) -> Option<&DomainRecord> {
        self.domains.get(domain)
    }

    /// Iterate over domains in identifier order.
    pub fn domains(&self) -> impl Iterator<Item = (&str, &DomainRecord)> {
        self.domains.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Domain identifiers in order.
    pub fn domain_ids(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    /// Number of distinct domain types (`t`).
    #[inline]
    pub fn n_domain_types(&self) -> usize {
        self.domains.len()
    }

    /// Number of architectures folded in.
    #[inline]
    pub fn n_architectures(&self) -> usize {
        self.n_architectures
    }

    /// Number of folded architectures with more than one domain.
    #[inline]
    pub fn n_multi_domain(&self) -> usize {
        self.n_multi_domain
    }

    /// Sum of appearances over all domains (`N`).
    pub fn total_appearances(&self) -> u64 {
        self.domains.values().map(DomainRecord::appearances).sum()
    }

    /// Sum of distinct-neighbour counts over all domains.
    pub fn total_distinct_neighbours(&self) -> usize {
        self.domains
            .values()
            .map(DomainRecord::n_distinct_neighbours)
            .sum()
    }

    /// Number of distinct proteins across all domains (`p_t`).
    pub fn n_distinct_proteins(&self) -> usize {
        self.domains
            .values()
            .flat_map(|d| d.proteins().iter().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Bigram statistics for every species in a record set.
///
/// Built once from a full scan of the records and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BigramGraph {
    species: BTreeMap<String, SpeciesGraph>,
    delimiter: char,
}

impl Default for BigramGraph {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl BigramGraph {
    /// Create an empty graph parsing architectures with `delimiter`.
    pub fn new(delimiter: char) -> Self {
        Self {
            species: BTreeMap::new(),
            delimiter,
        }
    }

    /// Build the graph in a single pass over `records`.
    pub fn build<I>(records: I, delimiter: char) -> Self
    where
        I: IntoIterator<Item = ArchitectureRecord>,
    {
        let mut graph = Self::new(delimiter);
        let mut n_records = 0usize;
        for record in records {
            graph.add_record(&record);
            n_records += 1;
        }
        debug!(
            records = n_records,
            species = graph.n_species(),
            "built bigram graph"
        );
        graph
    }

    /// Fold one record into the graph.
    pub fn add_record(&mut self, record: &ArchitectureRecord) {
        if record.architecture.trim().is_empty() {
            warn!(
                species = %record.species,
                protein = %record.protein,
                "empty architecture string, treating as a single unnamed domain"
            );
        }
        let architecture = record.parse_architecture(self.delimiter);
        self.species
            .entry(record.species.clone())
            .or_default()
            .add_architecture(&record.protein, &architecture);
    }

    /// Delimiter used to split architecture strings.
    #[inline]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Look up the graph of one species.
    pub fn species(&self, species: &str) -> Option<&SpeciesGraph> {
        self.species.get(species)
    }

    /// Look up one (species, domain) record.
    pub fn domain(&self, species: &str, domain: &str) -> Result<&DomainRecord> {
        self.species(species)
            .and_then(|g| g.get(domain))
            .ok_or_else(|| PromiscuityError::UnknownKey {
                species: species.to_string(),
                domain: domain.to_string(),
            })
    }

    /// Species names in order.
    pub fn species_names(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(String::as_str)
    }

    /// Iterate over species graphs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpeciesGraph)> {
        self.species.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of species.
    #[inline]
    pub fn n_species(&self) -> usize {
        self.species.len()
    }

    /// Check if no records were folded in.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}
