//! # Signal mapping
//!
//! Converts between base coordinates and raw signal sample coordinates.
//! Nothing here knows about duplex pairing: the same projection maps plain
//! reference-to-read alignments and duplex-to-simplex alignments into signal.

use crate::Error;
use std::num::NonZeroUsize;

/// Composes a reference-to-query knot mapping with a query-to-signal
/// mapping, giving the signal sample at which each reference knot begins.
///
/// Knots at or past the end of `query_to_signal` are clamped to its last
/// entry, so no out-of-range sample index is ever produced. The output has
/// the same length as `ref_to_query_knots`.
///
/// # Errors
/// Returns `Error::CoordinateRange` if `query_to_signal` is empty, or if
/// either input decreases anywhere.
///
/// # Examples
///
/// ```
/// use nanoduplex_core::map_ref_to_signal;
///
/// // the last knot sits one past the final query base and is clamped
/// let query_to_signal = [0, 4, 9, 12];
/// let knots = [1, 1, 2, 3, 4];
/// assert_eq!(map_ref_to_signal(&knots, &query_to_signal)?, vec![4, 4, 9, 12, 12]);
/// # Ok::<(), nanoduplex_core::Error>(())
/// ```
pub fn map_ref_to_signal(
    ref_to_query_knots: &[usize],
    query_to_signal: &[usize],
) -> Result<Vec<usize>, Error> {
    let Some(last_query) = query_to_signal.len().checked_sub(1) else {
        return Err(Error::CoordinateRange(
            "query to signal mapping is empty".to_string(),
        ));
    };
    if !ref_to_query_knots.is_sorted() {
        return Err(Error::CoordinateRange(
            "reference to query knots decrease".to_string(),
        ));
    }
    if !query_to_signal.is_sorted() {
        return Err(Error::CoordinateRange(
            "query to signal mapping decreases".to_string(),
        ));
    }

    let num_clamped = ref_to_query_knots
        .iter()
        .rev()
        .take_while(|k| **k > last_query)
        .count();
    if num_clamped > 0 {
        log::trace!("clamped {num_clamped} knot(s) to query position {last_query}");
    }

    Ok(ref_to_query_knots
        .iter()
        .map(|k| query_to_signal[(*k).min(last_query)])
        .collect())
}

/// Decodes a basecaller move table into a query-to-signal mapping.
///
/// Every `1` in `moves` starts a new base; entry `i` of the move table
/// covers signal samples `i * stride .. (i + 1) * stride` after the
/// `num_trimmed_samples` removed from the start of the signal. The output
/// holds exactly one start sample per base, so every entry is a valid
/// sample index and [`map_ref_to_signal`] clamps end knots onto the last base.
///
/// # Errors
/// Returns `Error::CoordinateRange` if the move table is empty, does not
/// begin with a move, or contains values other than 0 and 1.
///
/// # Examples
///
/// ```
/// use nanoduplex_core::query_to_signal_from_moves;
/// use std::num::NonZeroUsize;
///
/// let stride = NonZeroUsize::new(5).unwrap();
/// let q2s = query_to_signal_from_moves(&[1, 0, 1, 1, 0, 0], stride, 10)?;
/// assert_eq!(q2s, vec![10, 20, 25]);
/// # Ok::<(), nanoduplex_core::Error>(())
/// ```
pub fn query_to_signal_from_moves(
    moves: &[u8],
    stride: NonZeroUsize,
    num_trimmed_samples: usize,
) -> Result<Vec<usize>, Error> {
    match moves.first() {
        None => {
            return Err(Error::CoordinateRange("move table is empty".to_string()));
        }
        Some(1) => {}
        Some(_) => {
            return Err(Error::CoordinateRange(
                "move table must begin with a move".to_string(),
            ));
        }
    }
    if let Some(bad) = moves.iter().find(|m| **m > 1) {
        return Err(Error::CoordinateRange(format!(
            "move table contains value {bad}, expected 0 or 1"
        )));
    }

    let stride = stride.get();
    Ok(moves
        .iter()
        .enumerate()
        .filter(|(_, m)| **m == 1)
        .map(|(i, _)| i * stride + num_trimmed_samples)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_projection_returns_knots() {
        let query_to_signal: Vec<usize> = (0..20).collect();
        let knots = vec![2, 3, 3, 7, 19];
        assert_eq!(
            map_ref_to_signal(&knots, &query_to_signal).expect("no error"),
            knots
        );
    }

    #[test]
    fn knots_past_end_are_clamped() {
        let query_to_signal: Vec<usize> = (0..16).collect();
        let knots: Vec<usize> = (5..=16).collect();
        let mut expected: Vec<usize> = (5..=15).collect();
        expected.push(15);
        assert_eq!(
            map_ref_to_signal(&knots, &query_to_signal).expect("no error"),
            expected
        );
    }

    #[test]
    fn far_out_of_range_knots_are_clamped() {
        let knots = [0, 100, 1_000];
        assert_eq!(
            map_ref_to_signal(&knots, &[7, 8]).expect("no error"),
            vec![7, 8, 8]
        );
    }

    #[test]
    fn empty_knots_give_empty_projection() {
        assert!(map_ref_to_signal(&[], &[0, 1]).expect("no error").is_empty());
    }

    #[test]
    #[should_panic(expected = "CoordinateRange")]
    fn empty_query_to_signal_panics() {
        let _ = map_ref_to_signal(&[0, 1], &[]).unwrap();
    }

    #[test]
    #[should_panic(expected = "CoordinateRange")]
    fn decreasing_knots_panics() {
        let _ = map_ref_to_signal(&[3, 2], &[0, 1, 2, 3]).unwrap();
    }

    #[test]
    #[should_panic(expected = "CoordinateRange")]
    fn decreasing_query_to_signal_panics() {
        let _ = map_ref_to_signal(&[0, 1], &[5, 4]).unwrap();
    }

    #[test]
    fn moves_with_stride_one_and_no_trim() {
        let stride = NonZeroUsize::new(1).expect("non-zero");
        assert_eq!(
            query_to_signal_from_moves(&[1, 1, 0, 1], stride, 0).expect("no error"),
            vec![0, 1, 3]
        );
    }

    #[test]
    #[should_panic(expected = "CoordinateRange")]
    fn moves_not_starting_with_move_panics() {
        let stride = NonZeroUsize::new(6).expect("non-zero");
        let _ = query_to_signal_from_moves(&[0, 1, 1], stride, 0).unwrap();
    }

    #[test]
    #[should_panic(expected = "CoordinateRange")]
    fn moves_with_bad_value_panics() {
        let stride = NonZeroUsize::new(6).expect("non-zero");
        let _ = query_to_signal_from_moves(&[1, 2, 1], stride, 0).unwrap();
    }

    #[test]
    #[should_panic(expected = "CoordinateRange")]
    fn empty_moves_panics() {
        let stride = NonZeroUsize::new(6).expect("non-zero");
        let _ = query_to_signal_from_moves(&[], stride, 0).unwrap();
    }

    /// Decoded moves feed straight into the projector
    #[test]
    fn moves_then_projection() {
        let stride = NonZeroUsize::new(2).expect("non-zero");
        let q2s = query_to_signal_from_moves(&[1, 0, 1, 0, 0, 1], stride, 3).expect("no error");
        assert_eq!(q2s, vec![3, 7, 13]);
        assert_eq!(
            map_ref_to_signal(&[0, 2, 3], &q2s).expect("no error"),
            vec![3, 13, 13]
        );
    }

    /// One move per base at stride one gives the identity mapping, so the end
    /// knot of a mapped pair clamps onto the last signal sample.
    #[test]
    fn moves_projection_stays_inside_signal() {
        let stride = NonZeroUsize::new(1).expect("non-zero");
        let q2s = query_to_signal_from_moves(&[1; 16], stride, 0).expect("no error");
        assert_eq!(q2s, (0..16).collect::<Vec<usize>>());

        let knots: Vec<usize> = (5..=16).collect();
        let projected = map_ref_to_signal(&knots, &q2s).expect("no error");
        let mut expected: Vec<usize> = (5..=15).collect();
        expected.push(15);
        assert_eq!(projected, expected);
        assert!(projected.iter().all(|s| *s < 16));
    }
}
