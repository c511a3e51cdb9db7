//! # Aligner
//!
//! Pairwise alignment primitive used to place a simplex read on a duplex read.
//! Any aligner that reports an ends-free alignment as an [`AlignmentTrace`]
//! can be plugged in through the [`PairwiseAligner`] trait; the default,
//! [`LocalAligner`], wraps the Smith-Waterman implementation in `bio`.
//!
//! Throughout this module the "query" is the sequence whose bases we map
//! *to* (the simplex read) and the "reference" is the sequence whose bases we
//! map *from* (the duplex read).

use crate::Error;
use bio::alignment::pairwise::{Aligner, MatchParams, Scoring};
use bio::alignment::{Alignment, AlignmentOperation};
use itertools::Itertools as _;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores used by the default aligner. Gap penalties are affine:
/// a gap of length `k` costs `gap_open + k * gap_extend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct AlignScoring {
    /// Score for identical bases, must be positive
    pub match_score: i32,
    /// Score for differing bases, must not be positive
    pub mismatch_score: i32,
    /// Gap opening penalty, must not be positive
    pub gap_open: i32,
    /// Gap extension penalty, must not be positive
    pub gap_extend: i32,
}

impl Default for AlignScoring {
    fn default() -> Self {
        Self {
            match_score: 5,
            mismatch_score: -4,
            gap_open: -8,
            gap_extend: -2,
        }
    }
}

impl AlignScoring {
    /// Constructor that validates the signs of all scores.
    ///
    /// ```
    /// use nanoduplex_core::AlignScoring;
    /// let _ = AlignScoring::new(2, -3, -5, -1)?;
    /// assert!(AlignScoring::new(0, -3, -5, -1).is_err());
    /// assert!(AlignScoring::new(2, -3, 5, -1).is_err());
    /// # Ok::<(), nanoduplex_core::Error>(())
    /// ```
    ///
    /// # Errors
    /// Returns `Error::InvalidScoring` if any score has the wrong sign.
    pub fn new(
        match_score: i32,
        mismatch_score: i32,
        gap_open: i32,
        gap_extend: i32,
    ) -> Result<Self, Error> {
        let scoring = Self {
            match_score,
            mismatch_score,
            gap_open,
            gap_extend,
        };
        scoring.validate()?;
        Ok(scoring)
    }

    /// Checks the signs of all scores.
    ///
    /// # Errors
    /// Returns `Error::InvalidScoring` if any score has the wrong sign.
    pub fn validate(&self) -> Result<(), Error> {
        if self.match_score <= 0 {
            return Err(Error::InvalidScoring(format!(
                "match score must be positive, got {}",
                self.match_score
            )));
        }
        if self.mismatch_score > 0 || self.gap_open > 0 || self.gap_extend > 0 {
            return Err(Error::InvalidScoring(format!(
                "mismatch ({}), gap open ({}) and gap extend ({}) must not be positive",
                self.mismatch_score, self.gap_open, self.gap_extend
            )));
        }
        Ok(())
    }
}

/// One column of a pairwise alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraceOp {
    /// Query and reference bases are identical
    Match,
    /// Query and reference bases differ
    Subst,
    /// Query base with no reference counterpart
    Ins,
    /// Reference base with no query counterpart
    Del,
}

impl TraceOp {
    /// Whether this column consumes a query base
    #[must_use]
    pub fn consumes_query(self) -> bool {
        matches!(self, TraceOp::Match | TraceOp::Subst | TraceOp::Ins)
    }

    /// Whether this column consumes a reference base
    #[must_use]
    pub fn consumes_ref(self) -> bool {
        matches!(self, TraceOp::Match | TraceOp::Subst | TraceOp::Del)
    }

    /// Whether this column pairs a query base with a reference base
    #[must_use]
    pub fn is_aligned(self) -> bool {
        matches!(self, TraceOp::Match | TraceOp::Subst)
    }

    /// Extended CIGAR symbol
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            TraceOp::Match => '=',
            TraceOp::Subst => 'X',
            TraceOp::Ins => 'I',
            TraceOp::Del => 'D',
        }
    }
}

/// A column together with the query and reference positions it sits at.
/// For gap columns the position on the gapped sequence is that of the next
/// base to be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Column {
    /// Alignment operation
    pub op: TraceOp,
    /// Query position of this column
    pub query_pos: usize,
    /// Reference position of this column
    pub ref_pos: usize,
}

/// The path of an alignment: where it starts on both sequences and which
/// operations it walks through. Clipped ends are not part of the trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentTrace {
    query_start: usize,
    ref_start: usize,
    ops: Vec<TraceOp>,
}

impl AlignmentTrace {
    /// Creates a trace starting at the given query and reference positions.
    ///
    /// ```
    /// use nanoduplex_core::{AlignmentTrace, TraceOp};
    /// let trace = AlignmentTrace::new(2, 0, vec![TraceOp::Match, TraceOp::Del, TraceOp::Match]);
    /// assert_eq!(trace.query_end(), 4);
    /// assert_eq!(trace.ref_end(), 3);
    /// assert_eq!(trace.cigar(), "1=1D1=");
    /// ```
    #[must_use]
    pub fn new(query_start: usize, ref_start: usize, ops: Vec<TraceOp>) -> Self {
        Self {
            query_start,
            ref_start,
            ops,
        }
    }

    /// Query position of the first column
    #[must_use]
    pub fn query_start(&self) -> usize {
        self.query_start
    }

    /// Reference position of the first column
    #[must_use]
    pub fn ref_start(&self) -> usize {
        self.ref_start
    }

    /// One past the last query base consumed by the trace
    #[must_use]
    pub fn query_end(&self) -> usize {
        self.query_start + self.ops.iter().filter(|op| op.consumes_query()).count()
    }

    /// One past the last reference base consumed by the trace
    #[must_use]
    pub fn ref_end(&self) -> usize {
        self.ref_start + self.ops.iter().filter(|op| op.consumes_ref()).count()
    }

    /// Operations of the trace in order
    #[must_use]
    pub fn ops(&self) -> &[TraceOp] {
        &self.ops
    }

    /// Run-length encoded operations, e.g. `5=1X2I`
    #[must_use]
    pub fn cigar(&self) -> String {
        self.ops
            .iter()
            .dedup_with_count()
            .map(|(count, op)| format!("{count}{}", op.symbol()))
            .collect()
    }

    /// Iterates over columns along with their positions on both sequences.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.ops
            .iter()
            .scan((self.query_start, self.ref_start), |pos, &op| {
                let column = Column {
                    op,
                    query_pos: pos.0,
                    ref_pos: pos.1,
                };
                if op.consumes_query() {
                    pos.0 += 1;
                }
                if op.consumes_ref() {
                    pos.1 += 1;
                }
                Some(column)
            })
    }

    /// Sub-trace running from the first to the last match/substitution
    /// column, both inclusive. Gap columns hanging off either end are dropped.
    /// Returns `None` if the trace has no aligned column at all.
    ///
    /// ```
    /// use nanoduplex_core::{AlignmentTrace, TraceOp};
    /// let trace = AlignmentTrace::new(0, 0,
    ///     vec![TraceOp::Ins, TraceOp::Match, TraceOp::Del, TraceOp::Subst, TraceOp::Del]);
    /// let core = trace.aligned_core().unwrap();
    /// assert_eq!((core.query_start(), core.ref_start()), (1, 0));
    /// assert_eq!(core.cigar(), "1=1D1X");
    /// assert!(AlignmentTrace::new(0, 0, vec![TraceOp::Del]).aligned_core().is_none());
    /// ```
    #[must_use]
    pub fn aligned_core(&self) -> Option<AlignmentTrace> {
        let columns: Vec<Column> = self.columns().collect();
        let first = columns.iter().position(|c| c.op.is_aligned())?;
        let last = columns.iter().rposition(|c| c.op.is_aligned())?;
        Some(AlignmentTrace {
            query_start: columns[first].query_pos,
            ref_start: columns[first].ref_pos,
            ops: self.ops[first..=last].to_vec(),
        })
    }

    /// Reference-to-query knots for every reference base consumed by the
    /// trace, plus a final end knot.
    ///
    /// * match or substitution: the aligned query position.
    /// * deletion: the query position of the nearest preceding aligned
    ///   column, so knots never decrease. Before any aligned column the
    ///   next query position is used instead.
    /// * insertion: nothing is emitted.
    ///
    /// The end knot is one past the last aligned query position.
    /// The output has length `ref_end() - ref_start() + 1`.
    ///
    /// ```
    /// use nanoduplex_core::{AlignmentTrace, TraceOp};
    /// use TraceOp::{Del, Ins, Match};
    /// let trace = AlignmentTrace::new(3, 0, vec![Match, Ins, Match, Del, Del, Match]);
    /// assert_eq!(trace.ref_to_query_knots(), vec![3, 5, 5, 5, 6, 7]);
    /// ```
    #[must_use]
    pub fn ref_to_query_knots(&self) -> Vec<usize> {
        let mut knots = Vec::with_capacity(self.ref_end() - self.ref_start + 1);
        let mut last_aligned: Option<usize> = None;
        let mut query_pos = self.query_start;
        for column in self.columns() {
            match column.op {
                TraceOp::Match | TraceOp::Subst => {
                    knots.push(column.query_pos);
                    last_aligned = Some(column.query_pos);
                }
                TraceOp::Del => knots.push(last_aligned.unwrap_or(column.query_pos)),
                TraceOp::Ins => {}
            }
            if column.op.consumes_query() {
                query_pos = column.query_pos + 1;
            }
        }
        knots.push(last_aligned.map_or(query_pos, |q| q + 1));
        knots
    }
}

impl From<&Alignment> for AlignmentTrace {
    /// Converts a `bio` alignment where `x` is the query and `y` the reference.
    /// Clip operations lie outside the trace and are skipped; `xstart` and
    /// `ystart` already point at the first aligned base.
    fn from(alignment: &Alignment) -> Self {
        let ops = alignment
            .operations
            .iter()
            .filter_map(|op| match *op {
                AlignmentOperation::Match => Some(TraceOp::Match),
                AlignmentOperation::Subst => Some(TraceOp::Subst),
                AlignmentOperation::Ins => Some(TraceOp::Ins),
                AlignmentOperation::Del => Some(TraceOp::Del),
                AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => None,
            })
            .collect();
        AlignmentTrace::new(alignment.xstart, alignment.ystart, ops)
    }
}

/// Narrow interface for pairwise alignment used by the duplex mapper.
///
/// Implementations must be ends-free: unaligned prefixes and suffixes of
/// either sequence must not be penalised, and must not appear in the trace.
pub trait PairwiseAligner {
    /// Aligns `query` against `reference`.
    ///
    /// # Errors
    /// Implementation specific; the default aligner never fails.
    fn align(&mut self, query: &[u8], reference: &[u8]) -> Result<AlignmentTrace, Error>;
}

impl<F> PairwiseAligner for F
where
    F: FnMut(&[u8], &[u8]) -> Result<AlignmentTrace, Error>,
{
    fn align(&mut self, query: &[u8], reference: &[u8]) -> Result<AlignmentTrace, Error> {
        self(query, reference)
    }
}

/// Local (Smith-Waterman) aligner with affine gaps.
///
/// Reuses its dynamic programming buffers across calls, so one instance
/// should be kept per worker thread.
pub struct LocalAligner {
    scoring: AlignScoring,
    inner: Aligner<MatchParams>,
}

impl LocalAligner {
    /// Creates an aligner with the given scores.
    ///
    /// # Errors
    /// Returns `Error::InvalidScoring` if the scores are invalid.
    pub fn new(scoring: AlignScoring) -> Result<Self, Error> {
        scoring.validate()?;
        let inner = Aligner::with_scoring(Scoring::from_scores(
            scoring.gap_open,
            scoring.gap_extend,
            scoring.match_score,
            scoring.mismatch_score,
        ));
        Ok(Self { scoring, inner })
    }
}

impl Default for LocalAligner {
    fn default() -> Self {
        LocalAligner::new(AlignScoring::default()).expect("default scoring is valid")
    }
}

impl fmt::Debug for LocalAligner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAligner")
            .field("scoring", &self.scoring)
            .finish_non_exhaustive()
    }
}

impl PairwiseAligner for LocalAligner {
    fn align(&mut self, query: &[u8], reference: &[u8]) -> Result<AlignmentTrace, Error> {
        let alignment = self.inner.local(query, reference);
        log::trace!(
            "local alignment score {} query {}..{} reference {}..{}",
            alignment.score,
            alignment.xstart,
            alignment.xend,
            alignment.ystart,
            alignment.yend
        );
        Ok(AlignmentTrace::from(&alignment))
    }
}
