//! Promiscuity metrics over bigram graphs.

mod promiscuity;
mod stats;

pub use promiscuity::{
    compute_promiscuity, domain_metrics, graph_metrics, species_metrics, DomainMetrics,
    SpeciesMetrics,
};
pub use stats::SpeciesStats;
