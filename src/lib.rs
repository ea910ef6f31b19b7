//! Protein Domain Promiscuity Library
//!
//! This library computes promiscuity statistics for protein domains (Pfam)
//! from the domain architectures of each species' proteins.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Architectures and record tables (TSV input)
//! - **graph**: Per-species domain adjacency (bigram) statistics
//! - **metric**: Weighted bigram frequency and weight score per domain
//! - **report**: Flat report, top-N ranking, species distance matrix
//! - **profile**: Graph summary statistics
//! - **analysis**: Configurable end-to-end runs
//! - **pathogen**: Pathogen-type exclusivity of domains and architectures
//! - **taxonomy**: Per-rank exclusive and core domains and architectures
//!
//! # Example
//!
//! ```no_run
//! use pfam_promiscuity::prelude::*;
//!
//! // Load records exported from the annotation database
//! let records = RecordTable::from_tsv("architectures.tsv").unwrap();
//!
//! // Rank each species' most promiscuous domains
//! let output = Analysis::new()
//!     .top_n(RankBy::Promiscuity, 25)
//!     .run(records)
//!     .unwrap();
//! output.to_tsv("top_promiscuous.tsv").unwrap();
//! ```

pub mod analysis;
pub mod data;
pub mod error;
pub mod graph;
pub mod logging;
pub mod metric;
pub mod pathogen;
pub mod profile;
pub mod report;
pub mod taxonomy;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::analysis::{
        example_config, Analysis, AnalysisConfig, AnalysisOutput, ReportKind,
    };
    pub use crate::data::{
        Architecture, ArchitectureRecord, FeatureColumns, RecordTable, DEFAULT_DELIMITER,
    };
    pub use crate::error::{PromiscuityError, Result};
    pub use crate::graph::{BigramGraph, DomainRecord, SpeciesGraph};
    pub use crate::metric::{
        compute_promiscuity, domain_metrics, graph_metrics, species_metrics, DomainMetrics,
        SpeciesMetrics, SpeciesStats,
    };
    pub use crate::pathogen::{
        exclusive_features, group_counts_from_tsv, group_member_counts, is_exclusive,
        read_group_counts, ExclusiveFeature, ExclusiveReport, GroupCounts, PathogenGroup,
        PathogenRecord, PathogenTable, PathogenType,
    };
    pub use crate::profile::{profile_graph, GraphProfile, SpeciesProfile};
    pub use crate::report::{
        rank_top_n, species_distance_matrix, top_n, DistanceMatrix, FlatReport, RankBy,
        RankedDomain, SpeciesVector, TopNRanking, DEFAULT_TOP_N,
    };
    pub use crate::taxonomy::{
        core_features, CoreFeature, CoreReport, LevelMembership, Lineage, TaxonLevel,
        TaxonRecord, TaxonTable, TaxonomyCounts,
    };
}
