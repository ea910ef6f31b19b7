//! Data profiling for bigram graphs.

mod graph;

pub use graph::{profile_graph, GraphProfile, SpeciesProfile};
