//! # Error
//!
//! Covers all errors in our crate. These errors arise while validating
//! basecalled sequences, aligning simplex reads against duplex reads, and
//! projecting base coordinates into signal coordinates. We convert errors
//! from other packages to this error type so that error handling in our
//! package becomes easier.

use std::io;
use std::num::{ParseFloatError, TryFromIntError};
use thiserror::Error;

/// Enum that covers errors in our crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An input sequence has no bases
    #[error("empty sequence")]
    EmptySequence,

    /// Sequence contains symbols other than A, C, G, T
    #[error("invalid sequence")]
    InvalidSeq,

    /// Sequence is longer than the caller allows us to align
    #[error("sequence of length {len} exceeds maximum alignable length {max}")]
    SequenceTooLong {
        /// Length of the offending sequence
        len: usize,
        /// Maximum permitted length
        max: usize,
    },

    /// The aligner did not find a single matched or substituted column,
    /// i.e. the two sequences share no detectable homology.
    #[error("simplex and duplex sequences could not be aligned")]
    Unalignable,

    /// A coordinate mapping supplied from upstream is unusable, e.g.
    /// an empty query to signal mapping or knots that decrease.
    #[error("coordinate range error: `{0}`")]
    CoordinateRange(String),

    /// Alignment scoring parameters are not usable
    #[error("invalid alignment scoring: `{0}`")]
    InvalidScoring(String),

    /// `OrdPair` is an ordered pair, which can be obtained from
    /// a string of the correct format. This error says string
    /// conversion failed.
    #[error("ordered pair conversion error: `{0}`")]
    OrdPairConversionError(String),

    /// General error when ordering of items in some context is wrong.
    #[error("items in wrong order")]
    WrongOrder,

    /// Zero values used where they should not be
    #[error("zero values not allowed")]
    Zero,

    /// Generic error used when program hits an invalid state
    #[error("`{0}`")]
    InvalidState(String),

    /// Error upon conversion from integer
    #[error("integer conversion error: `{0}`")]
    IntConversionError(#[from] TryFromIntError),

    /// Problem parsing floats
    #[error("float parsing error: `{0}`")]
    FloatParseError(#[from] ParseFloatError),

    /// Error parsing JSON
    #[error("JSON parsing error: `{0}`")]
    JsonParseError(#[from] serde_json::Error),

    /// Problem reading or writing tab-separated pair files
    #[error("error parsing csv: `{0}`")]
    CsvError(#[from] csv::Error),

    /// Generic Input-Output error
    #[error("input output error: `{0}`")]
    InputOutputError(#[from] io::Error),
}

impl Error {
    /// Whether this error concerns only the single read pair being mapped.
    ///
    /// Batch callers skip such pairs and carry on; every other error
    /// should abort the run.
    ///
    /// ```
    /// use nanoduplex_core::Error;
    /// assert!(Error::Unalignable.is_per_pair());
    /// assert!(Error::EmptySequence.is_per_pair());
    /// assert!(!Error::Zero.is_per_pair());
    /// ```
    #[must_use]
    pub fn is_per_pair(&self) -> bool {
        matches!(
            self,
            Error::EmptySequence
                | Error::InvalidSeq
                | Error::SequenceTooLong { .. }
                | Error::Unalignable
                | Error::CoordinateRange(_)
        )
    }
}
