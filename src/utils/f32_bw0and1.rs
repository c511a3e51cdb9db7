//! `F32Bw0and1` struct for constrained float between 0 and 1
//! Used for per-base mutation rates when simulating read pairs.

use crate::Error;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Datatype holding a float (f32) between 0 and 1 (both inclusive) guaranteed at creation.
#[derive(Debug, Clone, Default, Copy, PartialOrd, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32")]
pub struct F32Bw0and1(f32);

impl F32Bw0and1 {
    /// Constructor, will fail if float is not between 0 and 1
    ///
    /// ```should_panic
    /// use nanoduplex_core::F32Bw0and1;
    /// let x = F32Bw0and1::new(-0.1).unwrap();
    /// ```
    /// ```
    /// # use nanoduplex_core::F32Bw0and1;
    /// let x = F32Bw0and1::new(0.05)?;
    /// # Ok::<(), nanoduplex_core::Error>(())
    /// ```
    ///
    /// # Errors
    /// Returns an error if the value is not between 0.0 and 1.0 (inclusive).
    pub fn new(val: f32) -> Result<Self, Error> {
        if (0.0..=1.0).contains(&val) {
            Ok(F32Bw0and1(val))
        } else {
            Err(Error::InvalidState("Num not b/w 0 and 1!".to_string()))
        }
    }

    /// Returns the value of the float.
    #[must_use]
    pub fn val(&self) -> f32 {
        self.0
    }

    /// Shortcut for 0.0
    #[must_use]
    #[expect(clippy::missing_panics_doc, reason = "no error possible here")]
    pub fn zero() -> Self {
        F32Bw0and1::new(0.0).expect("no error")
    }

    /// Treats the value as a probability and draws one Bernoulli event.
    /// A rate of zero never fires and a rate of one always does.
    ///
    /// ```
    /// use nanoduplex_core::F32Bw0and1;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// assert!(!F32Bw0and1::zero().happens(&mut rng));
    /// assert!(F32Bw0and1::new(1.0)?.happens(&mut rng));
    /// # Ok::<(), nanoduplex_core::Error>(())
    /// ```
    pub fn happens<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.random::<f32>() < self.0
    }
}

impl FromStr for F32Bw0and1 {
    type Err = Error;

    /// Parse a string to obtain float and then convert if b/w 0 and 1
    fn from_str(val_str: &str) -> Result<Self, Self::Err> {
        Self::new(f32::from_str(val_str)?)
    }
}

impl TryFrom<f32> for F32Bw0and1 {
    type Error = Error;

    /// attempts conversion from `f32`, will succeed if 0 <= value <= 1
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        F32Bw0and1::new(value)
    }
}

impl fmt::Display for F32Bw0and1 {
    /// converts to string for display.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.val().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    #[test]
    fn f32_bw0and1_basic() {
        let _: F32Bw0and1 = F32Bw0and1::new(0.0).unwrap();
        let _: F32Bw0and1 = F32Bw0and1::new(1.0).unwrap();
        let _: F32Bw0and1 = F32Bw0and1::new(0.000_001).unwrap();

        let _: Error = F32Bw0and1::new(-0.000_001).unwrap_err();
        let _: Error = F32Bw0and1::new(1.000_001).unwrap_err();
        let _: Error = F32Bw0and1::new(f32::NAN).unwrap_err();
    }

    #[test]
    fn f32_bw0and1_from_str() {
        let _: F32Bw0and1 = F32Bw0and1::from_str("0.1").unwrap();
        let _: Error = F32Bw0and1::from_str("1.1").unwrap_err();
        let _: Error = F32Bw0and1::from_str("abc").unwrap_err();
    }

    #[test]
    #[should_panic(expected = "Num not b/w 0 and 1")]
    fn f32_bw0and1_deserialize_out_of_range() {
        let _: F32Bw0and1 = serde_json::from_str("1.5").unwrap();
    }

    /// Tests that an intermediate rate fires roughly as often as it should
    #[test]
    fn f32_bw0and1_happens_rate() {
        let mut rng = StdRng::seed_from_u64(42);
        let rate = F32Bw0and1::new(0.1).expect("should create");
        let count = (0..10_000).filter(|_| rate.happens(&mut rng)).count();
        assert!((800..1200).contains(&count), "{count}");
    }

    #[test]
    fn f32_bw0and1_display() {
        let val = F32Bw0and1::new(0.05).expect("should create");
        assert_eq!(format!("{val}"), "0.05");
    }
}
