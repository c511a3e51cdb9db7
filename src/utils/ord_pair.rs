//! `OrdPair` struct for ordered pairs with low <= high guarantee
//! Used for aligned spans and for length ranges in simulation configs.

use crate::Error;
use rand::Rng;
use rand::distr::uniform::SampleUniform;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Debug;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Datatype holding two values low, high such that low <= high is guaranteed at creation.
/// Deserialises from a two-element JSON array e.g. `[5, 100]`.
#[derive(Debug, Clone, Copy, PartialOrd, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(T, T)", into = "(T, T)")]
#[serde(bound(deserialize = "T: Deserialize<'de> + PartialOrd"))]
#[serde(bound(serialize = "T: Serialize"))]
pub struct OrdPair<T: Clone + Copy + Debug> {
    low: T,
    high: T,
}

impl<T: Clone + Copy + Debug + PartialEq + PartialOrd> OrdPair<T> {
    /// Constructor with two values, will fail if ordering in input is not respected.
    ///
    /// ```should_panic
    /// use nanoduplex_core::OrdPair;
    /// let x = OrdPair::<f32>::new(1.0,0.0).unwrap();
    /// ```
    /// ```
    /// # use nanoduplex_core::OrdPair;
    /// let x = OrdPair::<usize>::new(5, 16)?;
    /// # Ok::<(), nanoduplex_core::Error>(())
    /// ```
    ///
    /// # Errors
    /// Returns `Error::WrongOrder` if `low > high`.
    pub fn new(low: T, high: T) -> Result<Self, Error> {
        if low <= high {
            Ok(OrdPair { low, high })
        } else {
            Err(Error::WrongOrder)
        }
    }
    /// Gets the low value
    #[must_use]
    pub fn get_low(&self) -> T {
        self.low
    }
    /// Gets the high value
    #[must_use]
    pub fn get_high(&self) -> T {
        self.high
    }
    /// Check if the provided value lies within low..=high
    ///
    /// ```
    /// use nanoduplex_core::OrdPair;
    /// let x = OrdPair::new(10, 20)?;
    /// assert!(x.contains(&10));
    /// assert!(!x.contains(&21));
    /// # Ok::<(), nanoduplex_core::Error>(())
    /// ```
    pub fn contains(&self, val: &T) -> bool {
        RangeInclusive::<T>::from(*self).contains(val)
    }
}

impl<T: Clone + Copy + Debug + PartialOrd + SampleUniform> OrdPair<T> {
    /// Draws a value uniformly from low..=high
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        rng.random_range(self.low..=self.high)
    }
}

impl<T: Clone + Copy + Debug + PartialEq + PartialOrd> TryFrom<(T, T)> for OrdPair<T> {
    type Error = Error;

    fn try_from(value: (T, T)) -> Result<Self, Self::Error> {
        OrdPair::new(value.0, value.1)
    }
}

impl<T: Clone + Copy + Debug> From<OrdPair<T>> for (T, T) {
    fn from(value: OrdPair<T>) -> Self {
        (value.low, value.high)
    }
}

impl<T: Clone + Copy + Debug + PartialEq + PartialOrd + FromStr> FromStr for OrdPair<T> {
    type Err = Error;

    /// Parse a string to obtain an Ordered Pair, return Error if cannot be done.
    fn from_str(val_str: &str) -> Result<Self, Self::Err> {
        macro_rules! parse_error {
            () => {
                Err(Error::OrdPairConversionError(
                    "Bad ordered pair inputs!".to_string(),
                ))
            };
        }
        let v: Vec<&str> = val_str.split(',').map(str::trim).collect();
        match v.len() {
            2 => {
                let Ok(low) = T::from_str(v[0]) else {
                    parse_error!()?
                };
                let Ok(high) = T::from_str(v[1]) else {
                    parse_error!()?
                };
                OrdPair::<T>::new(low, high)
            }
            _ => parse_error!(),
        }
    }
}

impl<T: Clone + Copy + Debug + PartialEq + PartialOrd> From<OrdPair<T>> for RangeInclusive<T> {
    /// Convert the `OrdPair` into a `RangeInclusive` i.e. (start..=end)
    fn from(value: OrdPair<T>) -> Self {
        RangeInclusive::<T>::new(value.get_low(), value.get_high())
    }
}

impl<T: Clone + Copy + Debug + fmt::Display + PartialEq + PartialOrd> fmt::Display for OrdPair<T> {
    /// converts to string for display i.e. "low, high"
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, {}", self.get_low(), self.get_high())
    }
}
