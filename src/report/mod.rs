//! Reports derived from promiscuity metrics.
//!
//! - **flat**: every computable (species, domain) pair with all six metrics
//! - **ranking**: per-species top-N domains aggregated across species
//! - **distance**: pairwise cosine distance between species' top domains

mod distance;
mod flat;
mod ranking;

pub use distance::{species_distance_matrix, DistanceMatrix, SpeciesVector};
pub use flat::{FlatReport, FLAT_HEADER};
pub use ranking::{rank_top_n, top_n, RankBy, RankedDomain, TopNRanking, DEFAULT_TOP_N};

use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Format a float as its shortest round-trip representation.
///
/// Whole numbers keep a trailing `.0` (`0.0`, `1.0`), matching what
/// downstream consumers of the TSV output already parse. Magnitudes below
/// `1e-4` or from `1e16` up switch to exponent form (`1e-5`).
pub(crate) fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Open `path` for buffered writing and hand it to `write`.
pub(crate) fn write_to_path<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_float(1.0034333188799373e-5), "1.0034333188799373e-5");
        assert_eq!(format_float(0.0001), "0.0001");
    }
}
