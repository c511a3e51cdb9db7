//! # Commands run in `main.rs`
//!
//! We set up the commands and their code in this file.
use crate::batch::{BatchOptions, map_pairs, read_pairs};
use crate::{
    AlignScoring, Error, LocalAligner, ScoringArgs, map_ref_to_signal,
    map_simplex_to_duplex_with, query_to_signal_from_moves,
};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::num::NonZeroUsize;

/// Main command line parsing struct
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[non_exhaustive]
pub struct Cli {
    /// Our subcommands
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
#[non_exhaustive]
/// Commands of nanoduplex CLI used in `main.rs`
pub enum Commands {
    /// Maps one simplex read onto its duplex read and prints the mapping as JSON
    Map {
        /// Simplex basecalled sequence
        simplex: String,
        /// Duplex basecalled sequence
        duplex: String,
        /// Alignment scores
        #[clap(flatten)]
        scoring: ScoringArgs,
        /// Pretty-print the JSON output
        #[clap(long)]
        pretty: bool,
    },
    /// Maps every pair in a tab-separated file with columns `read_id`, `simplex`
    /// and `duplex`. Prints one JSON line per mapped pair and a final summary
    /// line starting with '#'.
    MapPairs {
        /// Input pairs file, '-' for stdin
        #[clap(default_value = "-")]
        pairs: String,
        /// Number of worker threads; defaults to one per core
        #[clap(long)]
        threads: Option<NonZeroUsize>,
        /// Skip pairs where either sequence is longer than this
        #[clap(long)]
        max_len: Option<usize>,
        /// Alignment scores
        #[clap(flatten)]
        scoring: ScoringArgs,
    },
    /// Projects reference-to-query knots into signal coordinates
    Project {
        /// Reference-to-query knots e.g. 0,1,1,2,3
        #[clap(long, value_delimiter = ',', required = true)]
        knots: Vec<usize>,
        /// Signal sample at which each query base starts e.g. 0,5,12,20
        #[clap(
            long,
            value_delimiter = ',',
            conflicts_with = "moves",
            required_unless_present = "moves"
        )]
        query_to_signal: Vec<usize>,
        /// Move table to derive the query-to-signal mapping from e.g. 1,0,1,1,0
        #[clap(long, value_delimiter = ',')]
        moves: Vec<u8>,
        /// Signal samples per move table entry
        #[clap(long, default_value = "5")]
        stride: NonZeroUsize,
        /// Signal samples trimmed from the start of the read before the move table
        #[clap(long, default_value_t = 0)]
        num_trimmed_samples: usize,
    },
}

/// Runs the subcommand, writing output to the given handle.
///
/// # Errors
/// Returns errors associated with the subcommands or if command line
/// options are problematic
pub fn run<W>(cli: Cli, mut handle: W) -> Result<(), Error>
where
    W: io::Write,
{
    match cli.command {
        Commands::Map {
            simplex,
            duplex,
            scoring,
            pretty,
        } => {
            let mut aligner = LocalAligner::new(scoring.try_into()?)?;
            let mapping =
                map_simplex_to_duplex_with(&mut aligner, simplex.as_bytes(), duplex.as_bytes())?;
            if pretty {
                serde_json::to_writer_pretty(&mut handle, &mapping)?;
            } else {
                serde_json::to_writer(&mut handle, &mapping)?;
            }
            writeln!(handle)?;
        }
        Commands::MapPairs {
            pairs,
            threads,
            max_len,
            scoring,
        } => {
            let pairs = if pairs == "-" {
                read_pairs(io::stdin().lock())?
            } else {
                read_pairs(File::open(&pairs)?)?
            };
            let options = BatchOptions {
                scoring: AlignScoring::try_from(scoring)?,
                max_len,
            };
            let (mapped, summary) = match threads {
                Some(n) => rayon::ThreadPoolBuilder::new()
                    .num_threads(n.get())
                    .build()
                    .map_err(|e| Error::InvalidState(format!("cannot start thread pool: {e}")))?
                    .install(|| map_pairs(&pairs, &options))?,
                None => map_pairs(&pairs, &options)?,
            };
            for pair in &mapped {
                serde_json::to_writer(&mut handle, pair)?;
                writeln!(handle)?;
            }
            write!(handle, "# ")?;
            serde_json::to_writer(&mut handle, &summary)?;
            writeln!(handle)?;
        }
        Commands::Project {
            knots,
            query_to_signal,
            moves,
            stride,
            num_trimmed_samples,
        } => {
            let query_to_signal = if moves.is_empty() {
                query_to_signal
            } else {
                query_to_signal_from_moves(&moves, stride, num_trimmed_samples)?
            };
            let projected = map_ref_to_signal(&knots, &query_to_signal)?;
            serde_json::to_writer(&mut handle, &projected)?;
            writeln!(handle)?;
        }
    }
    handle.flush()?;
    Ok(())
}
