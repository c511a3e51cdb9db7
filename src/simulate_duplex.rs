//! # Simulate duplex pairs
//! Generates simplex/duplex read pairs for testing the duplex mapper.
//! A random duplex sequence is mutated with substitutions and indels to
//! give the simplex read, and either read can be padded with overhangs.
//! Output is fully determined by the seed in the configuration.
//!
//! ## Example Usage
//!
//! ```no_run
//! use nanoduplex_core::simulate_duplex::run;
//!
//! let config_json = r#"{
//!   "seed": 42,
//!   "number": 100,
//!   "len_range": [2000, 5000],
//!   "sub_rate": 0.05,
//!   "indel_rate": 0.1,
//!   "overhang": {
//!     "len_range": [5, 100],
//!     "unit": "T",
//!     "on_simplex": true,
//!     "on_duplex": false
//!   }
//! }"#;
//!
//! // Note: "overhang" is optional; without it reads are not padded.
//! run(config_json, "pairs.tsv").unwrap();
//! ```

use crate::batch::{DuplexPair, write_pairs};
use crate::{DNARestrictive, Error, F32Bw0and1, OrdPair};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng as _};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::iter;
use std::num::{NonZeroU32, NonZeroU64};
use std::path::Path;
use std::str::FromStr;
use uuid::Builder;

const DNA_BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Main configuration struct for simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct SimulationConfig {
    /// Seed for the random number generator
    pub seed: u64,
    /// Number of pairs to generate
    pub number: NonZeroU32,
    /// Duplex length range in bp [min, max]
    pub len_range: OrdPair<NonZeroU64>,
    /// Per-base probability of substituting a random base into the simplex read
    pub sub_rate: F32Bw0and1,
    /// Per-base probability of an insertion or deletion in the simplex read
    pub indel_rate: F32Bw0and1,
    /// Optional overhangs padding either read
    pub overhang: Option<OverhangConfig>,
}

/// Configuration for overhangs, added to both ends of a read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct OverhangConfig {
    /// Overhang length range in bp [min, max], drawn per read
    pub len_range: OrdPair<u64>,
    /// Sequence repeated to build the overhang, e.g. "T" for poly-T
    pub unit: DNARestrictive,
    /// Pad the simplex read
    pub on_simplex: bool,
    /// Pad the duplex read
    pub on_duplex: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            number: NonZeroU32::MIN,
            len_range: {
                let len = NonZeroU64::new(5000).expect("non-zero");
                OrdPair::new(len, len).expect("equal bounds are ordered")
            },
            sub_rate: F32Bw0and1::new(0.05).expect("valid rate"),
            indel_rate: F32Bw0and1::new(0.1).expect("valid rate"),
            overhang: None,
        }
    }
}

impl Default for OverhangConfig {
    fn default() -> Self {
        Self {
            len_range: OrdPair::new(5, 100).expect("ordered"),
            unit: DNARestrictive::from_str("T").expect("valid DNA"),
            on_simplex: true,
            on_duplex: true,
        }
    }
}

/// Generates a random DNA sequence of the given length
///
/// # Examples
///
/// ```
/// use nanoduplex_core::simulate_duplex::generate_random_dna_sequence;
/// use std::num::NonZeroU64;
///
/// let seq = generate_random_dna_sequence(NonZeroU64::new(50).unwrap(), &mut rand::rng());
/// assert_eq!(seq.len(), 50);
/// assert!(seq.iter().all(|b| b"ACGT".contains(b)));
/// ```
///
/// # Panics
/// Panics if the length does not fit in `usize`.
pub fn generate_random_dna_sequence<R: Rng + ?Sized>(length: NonZeroU64, rng: &mut R) -> Vec<u8> {
    iter::repeat_with(|| DNA_BASES[rng.random_range(0..4)])
        .take(usize::try_from(length.get()).expect("sequence length exceeds usize::MAX"))
        .collect()
}

/// Mutates a sequence base by base. Each base is first replaced by a random
/// base with probability `sub_rate` (which may pick the same base). Then,
/// with probability `indel_rate`, it is either dropped or followed by an
/// extra random base, each with even odds.
///
/// ```
/// use nanoduplex_core::F32Bw0and1;
/// use nanoduplex_core::simulate_duplex::mutate_sequence;
///
/// let unchanged = mutate_sequence(b"ACGT", F32Bw0and1::zero(), F32Bw0and1::zero(), &mut rand::rng());
/// assert_eq!(unchanged, b"ACGT".to_vec());
/// ```
pub fn mutate_sequence<R: Rng + ?Sized>(
    seq: &[u8],
    sub_rate: F32Bw0and1,
    indel_rate: F32Bw0and1,
    rng: &mut R,
) -> Vec<u8> {
    let mut mutated = Vec::with_capacity(seq.len() + seq.len() / 10);
    for &original in seq {
        let base = if sub_rate.happens(rng) {
            DNA_BASES[rng.random_range(0..4)]
        } else {
            original
        };
        if indel_rate.happens(rng) {
            if rng.random_bool(0.5) {
                mutated.push(base);
                mutated.push(DNA_BASES[rng.random_range(0..4)]);
            }
            continue;
        }
        mutated.push(base);
    }
    mutated
}

/// Pads both ends of a sequence with `len` bases built by repeating `unit`.
///
/// ```
/// use nanoduplex_core::DNARestrictive;
/// use nanoduplex_core::simulate_duplex::add_overhang;
/// use std::str::FromStr;
///
/// let unit = DNARestrictive::from_str("AC").unwrap();
/// assert_eq!(add_overhang(b"GGG", &unit, 3), b"ACAGGGACA".to_vec());
/// assert_eq!(add_overhang(b"GGG", &unit, 0), b"GGG".to_vec());
/// ```
#[must_use]
pub fn add_overhang(seq: &[u8], unit: &DNARestrictive, len: usize) -> Vec<u8> {
    let overhang: Vec<u8> = unit.get().iter().copied().cycle().take(len).collect();
    [overhang.as_slice(), seq, overhang.as_slice()].concat()
}

/// Simulates read pairs according to the configuration.
///
/// # Errors
/// Returns an error if a length in the configuration does not fit in `usize`.
pub fn simulate_pairs(config: &SimulationConfig) -> Result<Vec<DuplexPair>, Error> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let len_range = OrdPair::new(config.len_range.get_low().get(), config.len_range.get_high().get())?;

    let mut pairs = Vec::with_capacity(usize::try_from(config.number.get())?);
    for _ in 0..config.number.get() {
        let read_id = Builder::from_random_bytes(rng.random()).into_uuid().to_string();
        let len = NonZeroU64::new(len_range.sample(&mut rng)).ok_or(Error::Zero)?;
        let mut duplex = generate_random_dna_sequence(len, &mut rng);
        let mut simplex = mutate_sequence(&duplex, config.sub_rate, config.indel_rate, &mut rng);

        if let Some(overhang) = &config.overhang {
            if overhang.on_duplex {
                let len = usize::try_from(overhang.len_range.sample(&mut rng))?;
                duplex = add_overhang(&duplex, &overhang.unit, len);
            }
            if overhang.on_simplex {
                let len = usize::try_from(overhang.len_range.sample(&mut rng))?;
                simplex = add_overhang(&simplex, &overhang.unit, len);
            }
        }

        pairs.push(DuplexPair::new(
            read_id,
            String::from_utf8_lossy(&simplex),
            String::from_utf8_lossy(&duplex),
        ));
    }
    log::debug!("simulated {} pairs with seed {}", pairs.len(), config.seed);
    Ok(pairs)
}

/// Simulates read pairs from a JSON configuration and writes them as a
/// tab-separated file.
///
/// # Errors
/// Returns errors from parsing the configuration or writing the output.
pub fn run<F>(config_json: &str, output_path: &F) -> Result<(), Error>
where
    F: AsRef<Path> + ?Sized,
{
    let config: SimulationConfig = serde_json::from_str(config_json)?;
    let pairs = simulate_pairs(&config)?;
    write_pairs(BufWriter::new(File::create(output_path)?), &pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::read_pairs;
    use uuid::Uuid;

    #[test]
    fn generate_random_dna_sequence_works() {
        let seq = generate_random_dna_sequence(NonZeroU64::new(100).unwrap(), &mut rand::rng());
        assert_eq!(seq.len(), 100);
        for base in seq {
            assert!(DNA_BASES.contains(&base));
        }
    }

    #[test]
    fn mutate_sequence_full_deletion_rate_with_seed() {
        let mut rng = StdRng::seed_from_u64(3);
        let seq = generate_random_dna_sequence(NonZeroU64::new(1000).unwrap(), &mut rng);
        let mutated = mutate_sequence(
            &seq,
            F32Bw0and1::zero(),
            F32Bw0and1::new(1.0).unwrap(),
            &mut rng,
        );
        // every base is either dropped or doubled
        assert_eq!(mutated.len() % 2, 0);
        assert!(mutated.len() <= 2000);
    }

    #[test]
    fn simulate_pairs_is_deterministic() {
        let config = SimulationConfig {
            number: NonZeroU32::new(3).unwrap(),
            len_range: OrdPair::new(NonZeroU64::new(50).unwrap(), NonZeroU64::new(80).unwrap())
                .unwrap(),
            ..SimulationConfig::default()
        };
        let first = simulate_pairs(&config).unwrap();
        let second = simulate_pairs(&config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        for pair in &first {
            assert!((50..=80).contains(&pair.duplex.len()));
            let _: Uuid = Uuid::parse_str(&pair.read_id).unwrap();
        }
    }

    #[test]
    fn simulate_pairs_with_overhangs() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{
                "number": 5,
                "len_range": [100, 100],
                "sub_rate": 0.0,
                "indel_rate": 0.0,
                "overhang": {"len_range": [10, 10], "unit": "T", "on_simplex": false, "on_duplex": true}
            }"#,
        )
        .unwrap();
        for pair in simulate_pairs(&config).unwrap() {
            assert_eq!(pair.simplex.len(), 100);
            assert_eq!(pair.duplex.len(), 120);
            assert!(pair.duplex.starts_with("TTTTTTTTTT"));
            assert_eq!(&pair.duplex[10..110], pair.simplex);
        }
    }

    #[test]
    #[should_panic(expected = "Num not b/w 0 and 1")]
    fn bad_rate_in_config_panics() {
        let _: SimulationConfig = serde_json::from_str(r#"{"sub_rate": 1.5}"#).unwrap();
    }

    #[test]
    fn run_writes_readable_pairs() {
        let path = std::env::temp_dir().join(format!("{}.tsv", Uuid::new_v4()));
        run(r#"{"number": 4, "len_range": [30, 40]}"#, &path).unwrap();
        let pairs = read_pairs(File::open(&path).unwrap()).unwrap();
        drop(std::fs::remove_file(&path));
        assert_eq!(pairs.len(), 4);
    }
}
