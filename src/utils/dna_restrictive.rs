//! # DNA Restrictive
//!
//! Validated DNA sequence wrapper that guarantees only valid bases (A, C, G, T).
//! Simplex and duplex basecalls pass through this type before alignment.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validated DNA sequence wrapper that guarantees only valid bases (A, C, G, T).
/// Stores sequences in uppercase and is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DNARestrictive(Vec<u8>);

impl DNARestrictive {
    /// Returns a reference to the underlying DNA sequence bytes
    #[must_use]
    pub fn get(&self) -> &[u8] {
        &self.0
    }

    /// Number of bases in the sequence
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, as empty sequences are rejected at creation.
    /// Present to keep clippy's `len_without_is_empty` happy.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<&[u8]> for DNARestrictive {
    type Error = Error;

    /// Validates and uppercases a byte slice.
    ///
    /// ```
    /// use nanoduplex_core::{DNARestrictive, Error};
    ///
    /// let seq = DNARestrictive::try_from(&b"acgT"[..])?;
    /// assert_eq!(seq.get(), b"ACGT");
    /// assert!(matches!(DNARestrictive::try_from(&b""[..]), Err(Error::EmptySequence)));
    /// assert!(matches!(DNARestrictive::try_from(&b"ACGN"[..]), Err(Error::InvalidSeq)));
    /// # Ok::<(), nanoduplex_core::Error>(())
    /// ```
    fn try_from(seq: &[u8]) -> Result<Self, Self::Error> {
        if seq.is_empty() {
            return Err(Error::EmptySequence);
        }
        if !is_valid_dna_restrictive(seq) {
            return Err(Error::InvalidSeq);
        }
        Ok(DNARestrictive(seq.to_ascii_uppercase()))
    }
}

impl FromStr for DNARestrictive {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DNARestrictive::try_from(s.as_bytes())
    }
}

impl fmt::Display for DNARestrictive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // only ACGT bytes are ever stored
        String::from_utf8_lossy(&self.0).fmt(f)
    }
}

impl Serialize for DNARestrictive {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DNARestrictive {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DNARestrictive::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Validates that a DNA sequence contains only valid bases (A, C, G, T),
/// in either case. Does not accept ambiguous bases like 'N'.
///
/// # Examples
/// ```
/// use nanoduplex_core::utils::is_valid_dna_restrictive;
///
/// assert!(is_valid_dna_restrictive(b"ACGT"));
/// assert!(is_valid_dna_restrictive(b"acgt"));
/// assert!(!is_valid_dna_restrictive(b"ACGTN"));
/// assert!(!is_valid_dna_restrictive(b""));
/// ```
#[must_use]
#[expect(
    clippy::module_name_repetitions,
    reason = "function is exported in public API and full name provides clarity to users"
)]
pub fn is_valid_dna_restrictive(seq: &[u8]) -> bool {
    (!seq.is_empty())
        && seq
            .iter()
            .all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T'))
}
