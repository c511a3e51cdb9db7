//! # Duplex utils
//!
//! Places a simplex read on the duplex read it contributed to. The duplex
//! sequence is trimmed down to the span the simplex read actually covers,
//! and every trimmed duplex base is mapped to a simplex base, so that
//! duplex positions can later be projected into the simplex read's signal.

use crate::{
    AlignmentTrace, DNARestrictive, Error, LocalAligner, OrdPair, PairwiseAligner,
    map_ref_to_signal,
};
use serde::Serialize;

/// Result of mapping a simplex read onto a duplex read.
///
/// `duplex_to_simplex_mapping` is a knot array with one entry per trimmed
/// duplex base and one final end knot, one past the last simplex base
/// covered. It never decreases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimplexToDuplexMapping {
    trimmed_duplex_seq: DNARestrictive,
    duplex_offset: usize,
    duplex_to_simplex_mapping: Vec<usize>,
}

impl SimplexToDuplexMapping {
    /// Portion of the duplex sequence covered by the simplex read
    #[must_use]
    pub fn trimmed_duplex_seq(&self) -> &[u8] {
        self.trimmed_duplex_seq.get()
    }

    /// Start of the trimmed sequence within the original duplex sequence
    #[must_use]
    pub fn duplex_offset(&self) -> usize {
        self.duplex_offset
    }

    /// One past the end of the trimmed sequence within the original duplex sequence
    #[must_use]
    pub fn duplex_end(&self) -> usize {
        self.duplex_offset + self.trimmed_duplex_seq.len()
    }

    /// Trimmed span in original duplex coordinates, both ends inclusive
    #[must_use]
    #[expect(
        clippy::missing_panics_doc,
        reason = "trimmed sequence is never empty so offset <= end - 1"
    )]
    pub fn duplex_span(&self) -> OrdPair<usize> {
        OrdPair::new(self.duplex_offset, self.duplex_end() - 1).expect("non-empty trimmed sequence")
    }

    /// Knots from trimmed duplex positions to simplex positions, including
    /// the end knot; length is one more than the trimmed sequence.
    #[must_use]
    pub fn duplex_to_simplex_mapping(&self) -> &[usize] {
        &self.duplex_to_simplex_mapping
    }

    /// Simplex position of every trimmed duplex base, without the end knot
    #[must_use]
    pub fn base_mapping(&self) -> &[usize] {
        &self.duplex_to_simplex_mapping[..self.trimmed_duplex_seq.len()]
    }

    /// Converts a trimmed duplex position into an original duplex position.
    ///
    /// ```
    /// use nanoduplex_core::map_simplex_to_duplex;
    ///
    /// let mapping = map_simplex_to_duplex(b"ACGTACGTACG", b"TCGTTACGTACGTACG")?;
    /// assert_eq!(mapping.to_original_coord(0), Some(5));
    /// assert_eq!(mapping.to_original_coord(11), None);
    /// assert_eq!(mapping.to_trimmed_coord(15), Some(10));
    /// assert_eq!(mapping.to_trimmed_coord(2), None);
    /// # Ok::<(), nanoduplex_core::Error>(())
    /// ```
    #[must_use]
    pub fn to_original_coord(&self, trimmed_pos: usize) -> Option<usize> {
        (trimmed_pos < self.trimmed_duplex_seq.len()).then(|| self.duplex_offset + trimmed_pos)
    }

    /// Converts an original duplex position into a trimmed duplex position,
    /// `None` if the position lies in an overhang.
    #[must_use]
    pub fn to_trimmed_coord(&self, original_pos: usize) -> Option<usize> {
        self.duplex_span()
            .contains(&original_pos)
            .then(|| original_pos - self.duplex_offset)
    }

    /// Projects the knots into the simplex read's signal.
    ///
    /// # Errors
    /// See [`map_ref_to_signal`].
    pub fn project_to_signal(&self, query_to_signal: &[usize]) -> Result<Vec<usize>, Error> {
        map_ref_to_signal(&self.duplex_to_simplex_mapping, query_to_signal)
    }
}

/// Maps a simplex read onto a duplex read with the default local aligner.
///
/// # Errors
/// Returns `Error::EmptySequence` or `Error::InvalidSeq` for bad input and
/// `Error::Unalignable` if the two sequences share no aligned column.
///
/// # Examples
///
/// ```
/// use nanoduplex_core::map_simplex_to_duplex;
///
/// // TTTTTACGTACGTACG  [simplex]
/// //      |||||||||||
/// // -----ACGTACGTACG  [duplex]
/// let mapping = map_simplex_to_duplex(b"TTTTTACGTACGTACG", b"ACGTACGTACG")?;
/// assert_eq!(mapping.trimmed_duplex_seq(), b"ACGTACGTACG");
/// assert_eq!(mapping.duplex_offset(), 0);
/// assert_eq!(
///     mapping.duplex_to_simplex_mapping(),
///     &[5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]
/// );
/// # Ok::<(), nanoduplex_core::Error>(())
/// ```
pub fn map_simplex_to_duplex(
    simplex_seq: &[u8],
    duplex_seq: &[u8],
) -> Result<SimplexToDuplexMapping, Error> {
    map_simplex_to_duplex_with(&mut LocalAligner::default(), simplex_seq, duplex_seq)
}

/// Maps a simplex read onto a duplex read using the given aligner.
///
/// The duplex sequence is trimmed to the span between the first and last
/// aligned (match or substitution) columns. Within that span each duplex
/// base gets the simplex position it aligns to; duplex bases deleted in the
/// simplex read carry the previous aligned simplex position forward.
///
/// # Errors
/// As [`map_simplex_to_duplex`], plus whatever the aligner returns, and
/// `Error::InvalidState` if the aligner's trace does not fit its inputs.
pub fn map_simplex_to_duplex_with<A>(
    aligner: &mut A,
    simplex_seq: &[u8],
    duplex_seq: &[u8],
) -> Result<SimplexToDuplexMapping, Error>
where
    A: PairwiseAligner + ?Sized,
{
    let simplex = DNARestrictive::try_from(simplex_seq)?;
    let duplex = DNARestrictive::try_from(duplex_seq)?;

    let trace = aligner.align(simplex.get(), duplex.get())?;
    if trace.query_end() > simplex.len() || trace.ref_end() > duplex.len() {
        return Err(Error::InvalidState(format!(
            "alignment trace ends at simplex {} / duplex {}, beyond input lengths {} / {}",
            trace.query_end(),
            trace.ref_end(),
            simplex.len(),
            duplex.len()
        )));
    }
    let core: AlignmentTrace = trace.aligned_core().ok_or(Error::Unalignable)?;
    log::trace!(
        "simplex {}..{} aligned to duplex {}..{} with {}",
        core.query_start(),
        core.query_end(),
        core.ref_start(),
        core.ref_end(),
        core.cigar()
    );

    let duplex_offset = core.ref_start();
    let trimmed_duplex_seq =
        DNARestrictive::try_from(&duplex.get()[duplex_offset..core.ref_end()])?;
    let duplex_to_simplex_mapping = core.ref_to_query_knots();

    Ok(SimplexToDuplexMapping {
        trimmed_duplex_seq,
        duplex_offset,
        duplex_to_simplex_mapping,
    })
}
