//! Domain adjacency graphs built from protein architectures.

mod bigram;

pub use bigram::{BigramGraph, DomainRecord, SpeciesGraph};
