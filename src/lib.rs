//! # Nanoduplex
//!
//! Maps simplex nanopore reads onto the duplex reads they contributed to,
//! and projects duplex base positions into the raw signal of the simplex
//! read. Typical use is to take a duplex basecall, find which span of it a
//! simplex read covers, and look up the signal samples behind each duplex
//! base so that per-base signal features can be compared across strands.
//!
//! ```
//! use nanoduplex_core::map_simplex_to_duplex;
//!
//! let mapping = map_simplex_to_duplex(b"TTTTTACGTACGTACG", b"ACGTACGTACG")?;
//! // one signal sample per simplex base
//! let query_to_signal: Vec<usize> = (0..16).collect();
//! let signal = mapping.project_to_signal(&query_to_signal)?;
//! assert_eq!(signal, vec![5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 15]);
//! # Ok::<(), nanoduplex_core::Error>(())
//! ```

// Declare the modules.
pub mod aligner;
pub mod batch;
pub mod cli;
pub mod commands;
pub mod duplex_utils;
pub mod error;
pub mod signal_mapping;
pub mod simulate_duplex;
pub mod utils;

// Re-exports
pub use aligner::{AlignScoring, AlignmentTrace, Column, LocalAligner, PairwiseAligner, TraceOp};
pub use cli::ScoringArgs;
pub use duplex_utils::{SimplexToDuplexMapping, map_simplex_to_duplex, map_simplex_to_duplex_with};
pub use error::Error;
pub use signal_mapping::{map_ref_to_signal, query_to_signal_from_moves};
pub use utils::*;
