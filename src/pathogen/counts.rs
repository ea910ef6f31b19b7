//! Species and strain totals per pathogen type.

use crate::data::{column_position, tsv_reader};
use crate::error::{PromiscuityError, Result};
use crate::pathogen::PathogenType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Species and strain totals of one pathogen type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCounts {
    pub n_species: usize,
    pub n_strains: usize,
}

/// Species and strain totals for `pathogen`, adding its collapse partner's
/// totals when `collapse` is set.
pub fn group_member_counts(
    counts: &HashMap<PathogenType, GroupCounts>,
    pathogen: PathogenType,
    collapse: bool,
) -> GroupCounts {
    let mut total = counts.get(&pathogen).copied().unwrap_or_default();
    if collapse {
        if let Some(partner) = pathogen.collapse_partner() {
            let extra = counts.get(&partner).copied().unwrap_or_default();
            total.n_species += extra.n_species;
            total.n_strains += extra.n_strains;
        }
    }
    total
}

/// Read per-type totals from TSV with columns `pathogen_type`,
/// `num_species` and `num_strains`.
///
/// A type listed twice keeps the sum of its rows.
pub fn read_group_counts<R: Read>(reader: R) -> Result<HashMap<PathogenType, GroupCounts>> {
    let mut rdr = tsv_reader(reader);
    let headers = rdr.headers()?.clone();
    let type_idx = column_position(&headers, "pathogen_type")?;
    let species_idx = column_position(&headers, "num_species")?;
    let strains_idx = column_position(&headers, "num_strains")?;

    let mut counts: HashMap<PathogenType, GroupCounts> = HashMap::new();
    for row in rdr.records() {
        let row = row?;
        let pathogen: PathogenType = row.get(type_idx).unwrap_or_default().parse()?;
        let entry = counts.entry(pathogen).or_default();
        entry.n_species += parse_count(row.get(species_idx), "num_species")?;
        entry.n_strains += parse_count(row.get(strains_idx), "num_strains")?;
    }
    Ok(counts)
}

/// Read per-type totals from a TSV file.
pub fn group_counts_from_tsv<P: AsRef<Path>>(
    path: P,
) -> Result<HashMap<PathogenType, GroupCounts>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        PromiscuityError::DataSource(format!("cannot open {}: {}", path.display(), e))
    })?;
    read_group_counts(file)
}

fn parse_count(value: Option<&str>, column: &str) -> Result<usize> {
    let value = value.unwrap_or_default().trim();
    value.parse().map_err(|_| {
        PromiscuityError::InvalidParameter(format!("{} must be a count, got '{}'", column, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_member_counts() {
        let mut counts = HashMap::new();
        counts.insert(
            PathogenType::Frequent,
            GroupCounts {
                n_species: 3,
                n_strains: 10,
            },
        );
        counts.insert(
            PathogenType::Epidemic,
            GroupCounts {
                n_species: 2,
                n_strains: 7,
            },
        );
        counts.insert(
            PathogenType::Isolated,
            GroupCounts {
                n_species: 5,
                n_strains: 5,
            },
        );

        let plain = group_member_counts(&counts, PathogenType::Frequent, false);
        assert_eq!(plain.n_species, 3);
        assert_eq!(plain.n_strains, 10);

        let collapsed = group_member_counts(&counts, PathogenType::Frequent, true);
        assert_eq!(collapsed.n_species, 5);
        assert_eq!(collapsed.n_strains, 17);

        let alone = group_member_counts(&counts, PathogenType::Isolated, true);
        assert_eq!(alone.n_species, 5);
        assert_eq!(alone.n_strains, 5);

        let missing = group_member_counts(&counts, PathogenType::Undefined, true);
        assert_eq!(missing, GroupCounts::default());
    }

    #[test]
    fn test_read_group_counts() {
        let tsv = "pathogen_type\tnum_species\tnum_strains\n\
                   3\t4\t12\n\
                   4\t1\t9\n";
        let counts = read_group_counts(tsv.as_bytes()).unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&PathogenType::Frequent].n_strains, 12);

        let collapsed = group_member_counts(&counts, PathogenType::Epidemic, true);
        assert_eq!(collapsed.n_species, 5);
        assert_eq!(collapsed.n_strains, 21);
    }

    #[test]
    fn test_read_group_counts_rejects_bad_values() {
        let tsv = "pathogen_type\tnum_species\tnum_strains\n3\tmany\t1\n";
        assert!(matches!(
            read_group_counts(tsv.as_bytes()),
            Err(PromiscuityError::InvalidParameter(_))
        ));
        let tsv = "pathogen_type\tnum_species\n3\t1\n";
        assert!(matches!(
            read_group_counts(tsv.as_bytes()),
            Err(PromiscuityError::MissingColumn(c)) if c == "num_strains"
        ));
    }
}
