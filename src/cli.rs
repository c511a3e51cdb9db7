//! # Cli
//!
//! This file provides some global options in the command line interface.
use crate::{AlignScoring, Error};
use clap::Args;

/// Alignment scores shared by every subcommand that aligns reads.
/// Defaults match [`AlignScoring::default`].
#[derive(Debug, Clone, Copy, Args)]
pub struct ScoringArgs {
    /// Score for a matched base pair (positive)
    #[clap(long, default_value_t = 5)]
    pub match_score: i32,
    /// Score for a mismatched base pair (zero or negative)
    #[clap(long, default_value_t = -4, allow_negative_numbers = true)]
    pub mismatch_score: i32,
    /// Score for opening a gap (zero or negative)
    #[clap(long, default_value_t = -8, allow_negative_numbers = true)]
    pub gap_open: i32,
    /// Score for extending a gap by one base (zero or negative)
    #[clap(long, default_value_t = -2, allow_negative_numbers = true)]
    pub gap_extend: i32,
}

impl TryFrom<ScoringArgs> for AlignScoring {
    type Error = Error;

    fn try_from(value: ScoringArgs) -> Result<Self, Self::Error> {
        AlignScoring::new(
            value.match_score,
            value.mismatch_score,
            value.gap_open,
            value.gap_extend,
        )
    }
}
