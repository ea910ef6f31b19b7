//! Error types for the pfam-promiscuity library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum PromiscuityError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("Missing column '{0}' in input")]
    MissingColumn(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid pathogen type code '{0}' (expected 0-4)")]
    InvalidPathogenType(String),

    #[error("Unknown key: domain '{domain}' in species '{species}'")]
    UnknownKey { species: String, domain: String },

    /// The domain has no neighbours in any multi-domain protein of the species.
    #[error("Domain '{domain}' has no bigrams in species '{species}'")]
    NonComputable { species: String, domain: String },

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Logging setup error: {0}")]
    Logging(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PromiscuityError {
    /// Whether this error only concerns a single (species, domain) pair.
    pub fn is_non_computable(&self) -> bool {
        matches!(self, Self::NonComputable { .. })
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, PromiscuityError>;
