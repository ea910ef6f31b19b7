//! Domain architectures: the ordered domain composition of one protein.

use serde::{Deserialize, Serialize};

/// Default separator between domain identifiers in an architecture string.
pub const DEFAULT_DELIMITER: char = '~';

/// An ordered sequence of domain identifiers.
///
/// Order is meaningful: two domains are neighbours when they sit next to
/// each other in the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    domains: Vec<String>,
}

impl Architecture {
    /// Parse an architecture string such as `"D1~D2~D3"`.
    ///
    /// A string without the delimiter (including the empty string) yields a
    /// single-domain architecture. Identifiers are trimmed of surrounding
    /// whitespace.
    pub fn parse(raw: &str, delimiter: char) -> Self {
        let domains = raw
            .split(delimiter)
            .map(|d| d.trim().to_string())
            .collect();
        Self { domains }
    }

    /// Build an architecture from already separated identifiers.
    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domains: domains.into_iter().map(Into::into).collect(),
        }
    }

    /// Domain identifiers in order.
    #[inline]
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Number of domain occurrences.
    #[inline]
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Whether there are no domains. Never true for a parsed architecture.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Whether the architecture has more than one domain.
    #[inline]
    pub fn is_multi_domain(&self) -> bool {
        self.domains.len() > 1
    }

    /// Iterate over adjacent domain pairs (bigrams), left to right.
    pub fn bigrams(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.domains
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    /// Re-join the domains with the given delimiter.
    pub fn to_string_with(&self, delimiter: char) -> String {
        let mut buf = [0u8; 4];
        self.domains.join(delimiter.encode_utf8(&mut buf))
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_with(DEFAULT_DELIMITER))
    }
}

/// One input row: a protein of a species and its architecture string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureRecord {
    pub species: String,
    pub protein: String,
    pub architecture: String,
}

impl ArchitectureRecord {
    /// Create a new record.
    pub fn new(
        species: impl Into<String>,
        protein: impl Into<String>,
        architecture: impl Into<String>,
    ) -> Self {
        Self {
            species: species.into(),
            protein: protein.into(),
            architecture: architecture.into(),
        }
    }

    /// Parse the architecture string of this record.
    pub fn parse_architecture(&self, delimiter: char) -> Architecture {
        Architecture::parse(&self.architecture, delimiter)
    }
}
