//! This module defines the `DistanceParams` struct, which encapsulates the parameters
//! required to compute pairwise k-mer distances: the distance mode, k-mer length,
//! sketch size, molecule type and whether canonical k-mers are used. Parameter
//! combinations are validated when the struct is constructed so that an invalid
//! configuration is rejected before any sequence is processed.

use std::fmt;
use std::str::FromStr;

use crate::alphabet::MolType;
use crate::error::{DistanceError, Result};
use crate::hashing::KmerHasher;
use crate::kmer_freqs::KmerCounter;
use crate::min_hash::MashSketcher;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceMode {
    Mash,
    Euclidean,
}

impl fmt::Display for DistanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMode::Mash => write!(f, "mash"),
            DistanceMode::Euclidean => write!(f, "euclidean"),
        }
    }
}

impl FromStr for DistanceMode {
    type Err = DistanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mash" => Ok(DistanceMode::Mash),
            "euclidean" => Ok(DistanceMode::Euclidean),
            _ => Err(DistanceError::UnknownDistanceMode(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceParams {
    mode: DistanceMode,
    kmer_length: usize,
    sketch_size: Option<usize>,
    moltype: MolType,
    canonical_kmers: bool,
}

impl DistanceParams {
    pub fn new(
        mode: DistanceMode,
        kmer_length: usize,
        sketch_size: Option<usize>,
        moltype: MolType,
        canonical_kmers: bool,
    ) -> Result<Self> {
        if kmer_length == 0 {
            return Err(DistanceError::InvalidKmerLength);
        }

        if canonical_kmers && !moltype.is_nucleic() {
            return Err(DistanceError::CanonicalRequiresNucleotide(moltype));
        }

        match (mode, sketch_size) {
            (DistanceMode::Mash, None) => return Err(DistanceError::MissingSketchSize),
            (DistanceMode::Mash, Some(0)) => return Err(DistanceError::InvalidSketchSize),
            (DistanceMode::Euclidean, Some(_)) => {
                return Err(DistanceError::UnexpectedSketchSize);
            }
            _ => {}
        }

        let params = DistanceParams {
            mode,
            kmer_length,
            sketch_size,
            moltype,
            canonical_kmers,
        };

        // frequency vectors must be indexable for this k and alphabet
        if mode == DistanceMode::Euclidean {
            params.create_counter()?;
        }

        Ok(params)
    }

    /// Parameters for the mash distance.
    pub fn mash(
        kmer_length: usize,
        sketch_size: usize,
        moltype: MolType,
        canonical_kmers: bool,
    ) -> Result<Self> {
        Self::new(
            DistanceMode::Mash,
            kmer_length,
            Some(sketch_size),
            moltype,
            canonical_kmers,
        )
    }

    /// Parameters for the Euclidean distance between k-mer frequencies.
    pub fn euclidean(kmer_length: usize, moltype: MolType) -> Result<Self> {
        Self::new(DistanceMode::Euclidean, kmer_length, None, moltype, false)
    }

    pub fn mode(&self) -> DistanceMode {
        self.mode
    }

    pub fn k(&self) -> usize {
        self.kmer_length
    }

    /// Sketch size; always present in mash mode.
    pub fn sketch_size(&self) -> Option<usize> {
        self.sketch_size
    }

    pub fn moltype(&self) -> MolType {
        self.moltype
    }

    pub fn num_states(&self) -> usize {
        self.moltype.num_states()
    }

    pub fn canonical_kmers(&self) -> bool {
        self.canonical_kmers
    }

    /// True when canonical k-mers were requested for a distance that does not use them.
    pub fn ignores_canonical_kmers(&self) -> bool {
        self.canonical_kmers && self.mode == DistanceMode::Euclidean
    }

    pub fn create_sketcher(&self) -> Result<MashSketcher> {
        let sketch_size = self.sketch_size.ok_or(DistanceError::MissingSketchSize)?;
        let hasher = KmerHasher::new(self.kmer_length, self.moltype, self.canonical_kmers)?;
        Ok(MashSketcher::new(hasher, self.num_states(), sketch_size))
    }

    pub fn create_counter(&self) -> Result<KmerCounter> {
        KmerCounter::new(self.kmer_length, self.moltype)
    }
}

impl fmt::Display for DistanceParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "distance = {}, k = {}", self.mode, self.kmer_length)?;
        if let Some(sketch_size) = self.sketch_size {
            write!(f, ", sketch size = {sketch_size}")?;
        }
        write!(f, ", moltype = {}", self.moltype)?;
        if self.mode == DistanceMode::Mash {
            write!(f, ", canonical k-mers = {}", self.canonical_kmers)?;
        }
        Ok(())
    }
}
