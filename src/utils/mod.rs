//! Utils module providing shared datatypes for nanoduplex
//! Includes validated sequences and constrained numerics

pub mod dna_restrictive;
pub mod f32_bw0and1;
pub mod ord_pair;

// Re-export public utility types and functions to expose the utils API
pub use dna_restrictive::*;
pub use f32_bw0and1::*;
pub use ord_pair::*;
