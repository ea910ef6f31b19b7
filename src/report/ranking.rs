//! Top-N domain rankings aggregated across species.

use crate::error::{PromiscuityError, Result};
use crate::metric::{DomainMetrics, SpeciesMetrics};
use crate::report::{format_float, write_to_path};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Number of domains kept per species when none is given.
pub const DEFAULT_TOP_N: usize = 25;

/// Metric used to rank domains within a species.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    /// Highest `domain_promiscuity` first.
    #[default]
    Promiscuity,
    /// Lowest `weight_score` first.
    WeightScore,
}

impl RankBy {
    /// The ranked metric of a row.
    pub fn value(&self, m: &DomainMetrics) -> f64 {
        match self {
            Self::Promiscuity => m.domain_promiscuity,
            Self::WeightScore => m.weight_score,
        }
    }

    /// Column label of the ranked metric.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Promiscuity => "domain_promiscuity",
            Self::WeightScore => "weight_score",
        }
    }

    /// Ordering placing the better-ranked row first; ties by domain.
    fn compare(&self, a: &DomainMetrics, b: &DomainMetrics) -> Ordering {
        let by_value = match self {
            Self::Promiscuity => self.value(b).total_cmp(&self.value(a)),
            Self::WeightScore => self.value(a).total_cmp(&self.value(b)),
        };
        by_value.then_with(|| a.domain.cmp(&b.domain))
    }
}

impl std::str::FromStr for RankBy {
    type Err = PromiscuityError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "promiscuity" | "pi" | "domain_promiscuity" => Ok(Self::Promiscuity),
            "weight_score" | "weight-score" | "ws" => Ok(Self::WeightScore),
            _ => Err(PromiscuityError::InvalidParameter(format!(
                "unknown ranking metric '{}'",
                s
            ))),
        }
    }
}

impl std::fmt::Display for RankBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// The best `n` rows of one species under `by`.
///
/// Returns fewer than `n` rows when the species has fewer computable domains.
pub fn top_n(metrics: &[DomainMetrics], by: RankBy, n: usize) -> Vec<&DomainMetrics> {
    let mut sorted: Vec<&DomainMetrics> = metrics.iter().collect();
    sorted.sort_by(|a, b| by.compare(a, b));
    sorted.truncate(n);
    sorted
}

/// A domain's standing across the top-N lists of all species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDomain {
    pub domain: String,
    /// Number of species whose top-N list contains the domain.
    pub n_species: usize,
    /// Mean ranked metric over those appearances.
    pub mean_value: f64,
    /// Mean distinct-neighbour count over those appearances.
    pub mean_num_bigrams: f64,
}

/// Aggregated top-N ranking, most frequent domains first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopNRanking {
    pub rank_by: RankBy,
    pub n: usize,
    pub entries: Vec<RankedDomain>,
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    value_sum: f64,
    bigram_sum: usize,
}

/// Rank every species' domains and aggregate the top `n` across species.
pub fn rank_top_n(species: &[SpeciesMetrics], by: RankBy, n: usize) -> Result<TopNRanking> {
    if n == 0 {
        return Err(PromiscuityError::InvalidParameter(
            "top-N size must be at least 1".to_string(),
        ));
    }

    let mut acc: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for s in species {
        for m in top_n(&s.metrics, by, n) {
            let entry = acc.entry(m.domain.as_str()).or_default();
            entry.count += 1;
            entry.value_sum += by.value(m);
            entry.bigram_sum += m.num_bigrams;
        }
    }

    let mut entries: Vec<RankedDomain> = acc
        .into_iter()
        .map(|(domain, a)| RankedDomain {
            domain: domain.to_string(),
            n_species: a.count,
            mean_value: a.value_sum / a.count as f64,
            mean_num_bigrams: a.bigram_sum as f64 / a.count as f64,
        })
        .collect();
    // Stable: equal counts keep domain order from the map.
    entries.sort_by(|a, b| b.n_species.cmp(&a.n_species));

    Ok(TopNRanking {
        rank_by: by,
        n,
        entries,
    })
}

impl TopNRanking {
    /// Number of distinct domains ranked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a domain's entry.
    pub fn get(&self, domain: &str) -> Option<&RankedDomain> {
        self.entries.iter().find(|e| e.domain == domain)
    }

    /// Write the ranking as TSV with a header row.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(
            writer,
            "domain\tnum_species\tavg_{}\tavg_num_bigrams",
            self.rank_by.column()
        )?;
        for e in &self.entries {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                e.domain,
                e.n_species,
                format_float(e.mean_value),
                format_float(e.mean_num_bigrams),
            )?;
        }
        Ok(())
    }

    /// Write the ranking to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_to_path(path, |w| self.write_tsv(w))
    }
}
