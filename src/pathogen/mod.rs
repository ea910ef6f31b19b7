//! Pathogen-type classification of domains and architectures.
//!
//! Species carry one of five pathogen-type codes. The codes can be
//! collapsed into three groups ({0, 1}, {2}, {3, 4}); a feature is
//! exclusive when all of its occurrences fall in one code, or in one group
//! when collapsing.

mod counts;
mod exclusive;

pub use counts::{group_counts_from_tsv, group_member_counts, read_group_counts, GroupCounts};
pub use exclusive::{
    exclusive_features, ExclusiveFeature, ExclusiveReport, PathogenRecord, PathogenTable,
};

use crate::error::{PromiscuityError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Pathogen-type code of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PathogenType {
    /// 0: no defined criteria.
    Undefined,
    /// 1: strains present in the collection of clinical isolates.
    ClinicalIsolate,
    /// 2: isolated in surveillance studies, or frequent dermatophytes.
    Isolated,
    /// 3: over 50 strains in surveys, or very frequent worldwide.
    Frequent,
    /// 4: over 100 strains in two epidemiological studies.
    Epidemic,
}

impl PathogenType {
    /// All codes in order.
    pub const ALL: [PathogenType; 5] = [
        Self::Undefined,
        Self::ClinicalIsolate,
        Self::Isolated,
        Self::Frequent,
        Self::Epidemic,
    ];

    /// Numeric code.
    pub fn code(&self) -> u8 {
        match self {
            Self::Undefined => 0,
            Self::ClinicalIsolate => 1,
            Self::Isolated => 2,
            Self::Frequent => 3,
            Self::Epidemic => 4,
        }
    }

    /// Parse a numeric code.
    pub fn from_code(code: u8) -> Result<Self> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| PromiscuityError::InvalidPathogenType(code.to_string()))
    }

    /// The other code of this code's collapsed group, if any.
    ///
    /// 0 and 1 redirect to each other, as do 3 and 4; 2 stands alone.
    pub fn collapse_partner(&self) -> Option<PathogenType> {
        match self {
            Self::Undefined => Some(Self::ClinicalIsolate),
            Self::ClinicalIsolate => Some(Self::Undefined),
            Self::Isolated => None,
            Self::Frequent => Some(Self::Epidemic),
            Self::Epidemic => Some(Self::Frequent),
        }
    }

    /// Collapsed group of this code.
    pub fn group(&self) -> PathogenGroup {
        match self {
            Self::Undefined | Self::ClinicalIsolate => PathogenGroup::Low,
            Self::Isolated => PathogenGroup::Medium,
            Self::Frequent | Self::Epidemic => PathogenGroup::High,
        }
    }
}

impl TryFrom<u8> for PathogenType {
    type Error = PromiscuityError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code(code)
    }
}

impl From<PathogenType> for u8 {
    fn from(t: PathogenType) -> u8 {
        t.code()
    }
}

impl std::str::FromStr for PathogenType {
    type Err = PromiscuityError;

    fn from_str(s: &str) -> Result<Self> {
        let code: u8 = s
            .trim()
            .parse()
            .map_err(|_| PromiscuityError::InvalidPathogenType(s.to_string()))?;
        Self::from_code(code)
    }
}

impl std::fmt::Display for PathogenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The three groups obtained by collapsing pathogen-type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PathogenGroup {
    /// Codes 0 and 1.
    Low,
    /// Code 2.
    Medium,
    /// Codes 3 and 4.
    High,
}

/// Whether a set of pathogen types is exclusive to a single type, or with
/// `collapse` to a single group.
pub fn is_exclusive(types: &BTreeSet<PathogenType>, collapse: bool) -> bool {
    if types.len() == 1 {
        return true;
    }
    if collapse && types.len() == 2 {
        let groups: BTreeSet<PathogenGroup> = types.iter().map(PathogenType::group).collect();
        return groups.len() == 1;
    }
    false
}
