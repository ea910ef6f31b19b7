//! Species distance from the overlap of their most promiscuous domains.

use crate::error::{PromiscuityError, Result};
use crate::metric::SpeciesMetrics;
use crate::report::{format_float, top_n, write_to_path, RankBy};
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Sparse vector of a species' top domains keyed by domain, valued by
/// promiscuity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesVector {
    pub species: String,
    pub scores: BTreeMap<String, f64>,
}

impl SpeciesVector {
    /// Build the vector from the top `n` domains by promiscuity.
    pub fn from_metrics(metrics: &SpeciesMetrics, n: usize) -> Self {
        let scores = top_n(&metrics.metrics, RankBy::Promiscuity, n)
            .into_iter()
            .map(|m| (m.domain.clone(), m.domain_promiscuity))
            .collect();
        Self {
            species: metrics.species().to_string(),
            scores,
        }
    }

    /// Sum of squared scores.
    pub fn magnitude_sq(&self) -> f64 {
        self.scores.values().map(|v| v * v).sum()
    }

    /// Dot product over the domains both vectors share.
    pub fn dot(&self, other: &SpeciesVector) -> f64 {
        let (small, large) = if self.scores.len() <= other.scores.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .scores
            .iter()
            .filter_map(|(domain, a)| large.scores.get(domain).map(|b| a * b))
            .sum()
    }

    /// Cosine similarity, or `None` when either vector has zero magnitude.
    pub fn cosine_similarity(&self, other: &SpeciesVector) -> Option<f64> {
        let norm = (self.magnitude_sq() * other.magnitude_sq()).sqrt();
        if norm == 0.0 {
            return None;
        }
        Some((self.dot(other) / norm).clamp(-1.0, 1.0))
    }

    /// `1 - cosine similarity`; 1 when the similarity is undefined.
    pub fn distance(&self, other: &SpeciesVector) -> f64 {
        self.cosine_similarity(other).map_or(1.0, |s| 1.0 - s)
    }
}

/// Symmetric species × species distance matrix with a zero diagonal.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    species: Vec<String>,
    data: DMatrix<f64>,
}

impl DistanceMatrix {
    /// Species labels in row/column order.
    pub fn species(&self) -> &[String] {
        &self.species
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Distance between species at `row` and `col`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    /// Distance between two species by name.
    pub fn distance(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.species.iter().position(|s| s == a)?;
        let j = self.species.iter().position(|s| s == b)?;
        Some(self.get(i, j))
    }

    /// Get reference to the underlying matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Write the matrix: a species-count line, then one row per species.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", self.len())?;
        for (i, name) in self.species.iter().enumerate() {
            write!(writer, "{}", name)?;
            for j in 0..self.len() {
                write!(writer, "\t{}", format_float(self.get(i, j)))?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Write the matrix to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_to_path(path, |w| self.write_tsv(w))
    }
}

/// Pairwise cosine distances between species' top `n` domains.
///
/// Each unordered pair is computed once and mirrored, so the matrix is
/// exactly symmetric.
pub fn species_distance_matrix(species: &[SpeciesMetrics], n: usize) -> Result<DistanceMatrix> {
    if n == 0 {
        return Err(PromiscuityError::InvalidParameter(
            "top-N size must be at least 1".to_string(),
        ));
    }

    let vectors: Vec<SpeciesVector> = species
        .iter()
        .map(|s| SpeciesVector::from_metrics(s, n))
        .collect();
    let k = vectors.len();

    let pairs: Vec<(usize, usize)> = (0..k)
        .flat_map(|i| ((i + 1)..k).map(move |j| (i, j)))
        .collect();
    let distances: Vec<(usize, usize, f64)> = pairs
        .into_par_iter()
        .map(|(i, j)| (i, j, vectors[i].distance(&vectors[j])))
        .collect();

    let mut data = DMatrix::zeros(k, k);
    for (i, j, d) in distances {
        data[(i, j)] = d;
        data[(j, i)] = d;
    }
    debug!(species = k, top_n = n, "computed species distance matrix");

    Ok(DistanceMatrix {
        species: vectors.into_iter().map(|v| v.species).collect(),
        data,
    })
}
