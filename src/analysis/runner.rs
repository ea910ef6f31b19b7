//! Analysis runner: configuration and end-to-end execution.

use crate::data::{ArchitectureRecord, RecordTable, DEFAULT_DELIMITER};
use crate::error::{PromiscuityError, Result};
use crate::graph::BigramGraph;
use crate::metric::graph_metrics;
use crate::profile::{profile_graph, GraphProfile};
use crate::report::{
    rank_top_n, species_distance_matrix, write_to_path, DistanceMatrix, FlatReport, RankBy,
    TopNRanking, DEFAULT_TOP_N,
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Report produced by an analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportKind {
    /// Every computable (species, domain) pair.
    #[default]
    Flat,
    /// Top-N domains per species, aggregated across species.
    TopN {
        #[serde(default = "default_top_n")]
        n: usize,
        #[serde(default)]
        rank_by: RankBy,
    },
    /// Species distance matrix over top-N domains by promiscuity.
    Distance {
        #[serde(default = "default_top_n")]
        n: usize,
    },
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

/// Analysis configuration for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Name of the analysis.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Separator between domains in architecture strings.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Species to keep; empty keeps all.
    #[serde(default)]
    pub species: Vec<String>,
    /// Report to produce.
    #[serde(default)]
    pub report: ReportKind,
}

impl AnalysisConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(PromiscuityError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(PromiscuityError::from)
    }

    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }
}

/// Builder for configuring and running an analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    name: String,
    delimiter: char,
    species: Vec<String>,
    report: ReportKind,
}

impl Default for Analysis {
    fn default() -> Self {
        Self::new()
    }
}

impl Analysis {
    /// Create an analysis producing the flat report.
    pub fn new() -> Self {
        Self {
            name: "unnamed".to_string(),
            delimiter: DEFAULT_DELIMITER,
            species: Vec::new(),
            report: ReportKind::Flat,
        }
    }

    /// Create from a config.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            name: config.name.clone(),
            delimiter: config.delimiter,
            species: config.species.clone(),
            report: config.report.clone(),
        }
    }

    /// Set the analysis name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the architecture delimiter.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Restrict the analysis to the given species.
    pub fn species<I, S>(mut self, species: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.species = species.into_iter().map(Into::into).collect();
        self
    }

    /// Produce the flat report.
    pub fn flat(mut self) -> Self {
        self.report = ReportKind::Flat;
        self
    }

    /// Produce a top-N ranking.
    pub fn top_n(mut self, rank_by: RankBy, n: usize) -> Self {
        self.report = ReportKind::TopN { n, rank_by };
        self
    }

    /// Produce a species distance matrix.
    pub fn distance(mut self, n: usize) -> Self {
        self.report = ReportKind::Distance { n };
        self
    }

    /// Convert to config for serialization.
    pub fn to_config(&self, description: Option<&str>) -> AnalysisConfig {
        AnalysisConfig {
            name: self.name.clone(),
            description: description.map(String::from),
            delimiter: self.delimiter,
            species: self.species.clone(),
            report: self.report.clone(),
        }
    }

    /// Run the analysis over architecture records.
    pub fn run<I>(&self, records: I) -> Result<AnalysisOutput>
    where
        I: IntoIterator<Item = ArchitectureRecord>,
    {
        let graph = self.prepare(records)?;
        let metrics = graph_metrics(&graph)?;

        let output = match &self.report {
            ReportKind::Flat => AnalysisOutput::Flat(FlatReport::from_metrics(&metrics)),
            ReportKind::TopN { n, rank_by } => {
                let ranking = rank_top_n(&metrics, *rank_by, *n).map_err(|e| {
                    PromiscuityError::Analysis(format!(
                        "'{}' top-N ranking failed: {}",
                        self.name, e
                    ))
                })?;
                AnalysisOutput::TopN(ranking)
            }
            ReportKind::Distance { n } => {
                let matrix = species_distance_matrix(&metrics, *n).map_err(|e| {
                    PromiscuityError::Analysis(format!(
                        "'{}' distance matrix failed: {}",
                        self.name, e
                    ))
                })?;
                AnalysisOutput::Distance(matrix)
            }
        };
        Ok(output)
    }

    /// Profile the bigram graph of the records the analysis keeps.
    pub fn profile<I>(&self, records: I) -> Result<GraphProfile>
    where
        I: IntoIterator<Item = ArchitectureRecord>,
    {
        let graph = self.prepare(records)?;
        Ok(profile_graph(&graph))
    }

    /// Apply the species filter and build the graph; fails when no record
    /// survives the filter.
    fn prepare<I>(&self, records: I) -> Result<BigramGraph>
    where
        I: IntoIterator<Item = ArchitectureRecord>,
    {
        let table = RecordTable::new(records.into_iter().collect()).filter_species(&self.species);
        if table.is_empty() {
            return Err(PromiscuityError::EmptyData(format!(
                "analysis '{}' has no records to process",
                self.name
            )));
        }

        info!(analysis = %self.name, records = table.len(), "running analysis");
        Ok(BigramGraph::build(table, self.delimiter))
    }
}

/// Result of running an analysis.
#[derive(Debug, Clone)]
pub enum AnalysisOutput {
    Flat(FlatReport),
    TopN(TopNRanking),
    Distance(DistanceMatrix),
}

impl AnalysisOutput {
    /// Number of data rows the output will write.
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(r) => r.len(),
            Self::TopN(r) => r.len(),
            Self::Distance(m) => m.len(),
        }
    }

    /// Check if the output has no data rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the output as TSV.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Self::Flat(r) => r.write_tsv(writer),
            Self::TopN(r) => r.write_tsv(writer),
            Self::Distance(m) => m.write_tsv(writer),
        }
    }

    /// Write the output to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_to_path(path, |w| self.write_tsv(w))
    }
}

/// Build the example configuration written by `pfam example`.
pub fn example_config() -> AnalysisConfig {
    Analysis::new()
        .name("top-promiscuous-domains")
        .top_n(RankBy::Promiscuity, DEFAULT_TOP_N)
        .to_config(Some(
            "Rank each species' 25 most promiscuous domains and count how often each domain recurs",
        ))
}
