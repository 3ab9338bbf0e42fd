//! Error types reported while configuring or running a pairwise distance calculation.
//!
//! Configuration errors are raised by `DistanceParams::new` before any sequence is
//! processed. Input errors identify the offending sequence by its index.

use thiserror::Error;

use crate::alphabet::MolType;

pub type Result<T, E = DistanceError> = core::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DistanceError {
    #[error("expected a sketch size for the mash distance")]
    MissingSketchSize,

    #[error("sketch size should only be specified for the mash distance")]
    UnexpectedSketchSize,

    #[error("sketch size must be at least 1")]
    InvalidSketchSize,

    #[error("k-mer length must be at least 1")]
    InvalidKmerLength,

    #[error("canonical k-mers are only supported for DNA or RNA sequences, not {0}")]
    CanonicalRequiresNucleotide(MolType),

    /// The k-mer space is too large to index frequency vectors with 64-bit integers.
    #[error("{num_states}^{k} k-mers cannot be indexed by a frequency vector")]
    KmerSpaceTooLarge { num_states: usize, k: usize },

    #[error("unrecognized distance mode `{0}` (expected mash or euclidean)")]
    UnknownDistanceMode(String),

    #[error("unrecognized molecule type `{0}` (expected dna, rna or protein)")]
    UnknownMolType(String),

    #[error("frequency vector for sequence {index} has length {actual}, expected {expected}")]
    FrequencyLengthMismatch {
        index: usize,
        expected: u64,
        actual: u64,
    },
}
