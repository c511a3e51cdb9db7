//! # Batch
//!
//! Maps many simplex/duplex read pairs in parallel. A pair that cannot be
//! mapped is counted and skipped; it never stops the rest of the batch.
//! Pairs are read from and written to tab-separated files with the header
//! `read_id  simplex  duplex`.

use crate::{AlignScoring, Error, LocalAligner, SimplexToDuplexMapping, map_simplex_to_duplex_with};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io;

/// A simplex read and the duplex read it contributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct DuplexPair {
    /// Identifier of the simplex read
    pub read_id: String,
    /// Basecalled simplex sequence
    pub simplex: String,
    /// Basecalled duplex sequence
    pub duplex: String,
}

impl DuplexPair {
    /// Creates a pair from its parts
    pub fn new(
        read_id: impl Into<String>,
        simplex: impl Into<String>,
        duplex: impl Into<String>,
    ) -> Self {
        Self {
            read_id: read_id.into(),
            simplex: simplex.into(),
            duplex: duplex.into(),
        }
    }
}

/// A successfully mapped pair
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct MappedPair {
    /// Identifier of the simplex read
    pub read_id: String,
    /// Mapping of the simplex read onto its duplex read
    pub mapping: SimplexToDuplexMapping,
}

/// Options for a batch run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct BatchOptions {
    /// Alignment scores
    pub scoring: AlignScoring,
    /// Pairs with either sequence longer than this are rejected before alignment
    pub max_len: Option<usize>,
}

/// Counts of how pairs in a batch fared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct BatchSummary {
    /// Pairs seen
    pub num_pairs: usize,
    /// Pairs mapped successfully
    pub num_mapped: usize,
    /// Pairs rejected because of empty, invalid or over-long sequences
    pub num_input_error: usize,
    /// Pairs whose sequences could not be aligned
    pub num_unalignable: usize,
    /// Pairs with unusable coordinates
    pub num_coordinate_error: usize,
}

impl BatchSummary {
    /// Records a per-pair failure against the right counter
    fn record_failure(&mut self, error: &Error) {
        match error {
            Error::Unalignable => self.num_unalignable += 1,
            Error::CoordinateRange(_) => self.num_coordinate_error += 1,
            _ => self.num_input_error += 1,
        }
    }
}

/// Maps one pair, rejecting over-long sequences first.
fn map_pair(
    aligner: &mut LocalAligner,
    pair: &DuplexPair,
    max_len: Option<usize>,
) -> Result<SimplexToDuplexMapping, Error> {
    if let Some(max) = max_len {
        for len in [pair.simplex.len(), pair.duplex.len()] {
            if len > max {
                return Err(Error::SequenceTooLong { len, max });
            }
        }
    }
    map_simplex_to_duplex_with(aligner, pair.simplex.as_bytes(), pair.duplex.as_bytes())
}

/// Maps all pairs in parallel on the current rayon thread pool.
///
/// Mapped pairs are returned in input order. Per-pair failures
/// (see [`Error::is_per_pair`]) are logged at debug level and counted in the
/// summary.
///
/// # Errors
/// Returns `Error::InvalidScoring` for bad scores, or the first error that
/// is not specific to a single pair.
///
/// # Examples
///
/// ```
/// use nanoduplex_core::batch::{BatchOptions, DuplexPair, map_pairs};
///
/// let pairs = vec![
///     DuplexPair::new("read_0", "ACGTACGTACG", "TCGTTACGTACGTACG"),
///     DuplexPair::new("read_1", "AAAAAAAA", "CCCCCCCC"),
///     DuplexPair::new("read_2", "", "ACGT"),
/// ];
/// let (mapped, summary) = map_pairs(&pairs, &BatchOptions::default())?;
/// assert_eq!(mapped.len(), 1);
/// assert_eq!(mapped[0].read_id, "read_0");
/// assert_eq!(summary.num_unalignable, 1);
/// assert_eq!(summary.num_input_error, 1);
/// # Ok::<(), nanoduplex_core::Error>(())
/// ```
pub fn map_pairs(
    pairs: &[DuplexPair],
    options: &BatchOptions,
) -> Result<(Vec<MappedPair>, BatchSummary), Error> {
    options.scoring.validate()?;
    let scoring = options.scoring;
    let max_len = options.max_len;

    let results: Vec<Result<SimplexToDuplexMapping, Error>> = pairs
        .par_iter()
        .map_init(
            || LocalAligner::new(scoring),
            |aligner, pair| match aligner {
                Ok(v) => map_pair(v, pair, max_len),
                Err(e) => Err(Error::InvalidScoring(e.to_string())),
            },
        )
        .collect();

    let mut summary = BatchSummary {
        num_pairs: pairs.len(),
        ..BatchSummary::default()
    };
    let mut mapped = Vec::with_capacity(pairs.len());
    for (pair, result) in pairs.iter().zip(results) {
        match result {
            Ok(mapping) => {
                summary.num_mapped += 1;
                mapped.push(MappedPair {
                    read_id: pair.read_id.clone(),
                    mapping,
                });
            }
            Err(e) if e.is_per_pair() => {
                log::debug!("skipping pair {}: {e}", pair.read_id);
                summary.record_failure(&e);
            }
            Err(e) => return Err(e),
        }
    }
    log::info!(
        "mapped {} of {} pairs ({} input errors, {} unalignable, {} coordinate errors)",
        summary.num_mapped,
        summary.num_pairs,
        summary.num_input_error,
        summary.num_unalignable,
        summary.num_coordinate_error
    );
    Ok((mapped, summary))
}

/// Reads pairs from a tab-separated file with a header line.
///
/// # Errors
/// Returns `Error::CsvError` on malformed rows.
pub fn read_pairs<R: io::Read>(reader: R) -> Result<Vec<DuplexPair>, Error> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(reader)
        .into_deserialize()
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Writes pairs as a tab-separated file with a header line.
///
/// # Errors
/// Returns `Error::CsvError` or `Error::InputOutputError` on write failure.
pub fn write_pairs<W: io::Write>(writer: W, pairs: &[DuplexPair]) -> Result<(), Error> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    for pair in pairs {
        writer.serialize(pair)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn max_len_rejects_long_pairs() {
        let pairs = vec![
            DuplexPair::new("short", "ACGTACGTACG", "ACGTACGTACG"),
            DuplexPair::new("long", "ACGTACGTACGTACGTACGT", "ACGTACGTACG"),
        ];
        let options = BatchOptions {
            max_len: Some(12),
            ..BatchOptions::default()
        };
        let (mapped, summary) = map_pairs(&pairs, &options).expect("no error");
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].read_id, "short");
        assert_eq!(summary.num_input_error, 1);
        assert_eq!(summary.num_pairs, 2);
    }

    #[test]
    #[should_panic(expected = "InvalidScoring")]
    fn bad_scoring_aborts_batch() {
        let options = BatchOptions {
            scoring: AlignScoring {
                match_score: -1,
                ..AlignScoring::default()
            },
            max_len: None,
        };
        let _ = map_pairs(&[DuplexPair::new("a", "ACGT", "ACGT")], &options).unwrap();
    }

    #[test]
    fn output_order_matches_input_order() {
        let pairs: Vec<DuplexPair> = (0..50)
            .map(|k| DuplexPair::new(format!("read_{k}"), "GGGTACGTACG", "TCGTTACGTACGTACG"))
            .collect();
        let (mapped, summary) = map_pairs(&pairs, &BatchOptions::default()).expect("no error");
        assert_eq!(summary.num_mapped, 50);
        for (k, pair) in mapped.iter().enumerate() {
            assert_eq!(pair.read_id, format!("read_{k}"));
            assert_eq!(pair.mapping.duplex_offset(), 7);
        }
    }

    #[test]
    fn read_pairs_from_tsv() {
        let tsv = indoc! {"
            read_id\tsimplex\tduplex
            a\tACGTACGTACG\tTCGTTACGTACGTACG
            b\tGGGTACGTACG\tTCGTTACGTACGTACG
        "};
        let pairs = read_pairs(tsv.as_bytes()).expect("no error");
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], DuplexPair::new("b", "GGGTACGTACG", "TCGTTACGTACGTACG"));
    }

    #[test]
    fn write_then_read_pairs() {
        let pairs = vec![DuplexPair::new("x", "ACG", "TACG")];
        let mut buffer = Vec::new();
        write_pairs(&mut buffer, &pairs).expect("no error");
        assert_eq!(
            String::from_utf8(buffer.clone()).expect("utf8"),
            "read_id\tsimplex\tduplex\nx\tACG\tTACG\n"
        );
        assert_eq!(read_pairs(buffer.as_slice()).expect("no error"), pairs);
    }
}
