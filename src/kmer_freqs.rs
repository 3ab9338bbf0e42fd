//! K-mer frequency vectors used by the Euclidean distance.
//!
//! A vector spans every possible k-mer (`num_states^k` entries) but only the
//! observed k-mers are stored, as `(index, frequency)` pairs sorted by index.

use rustc_hash::FxHashMap;

use crate::alphabet::{MolType, State};
use crate::error::{DistanceError, Result};
use crate::hashing::{kmer_index, kmer_space};
use crate::kmers::kmers;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrequencyVector {
    len: u64,
    entries: Vec<(u64, f64)>,
}

impl FrequencyVector {
    /// Build from a dense vector, dropping zero entries.
    pub fn from_dense(values: &[f64]) -> Self {
        let entries = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(idx, v)| (idx as u64, *v))
            .collect();

        FrequencyVector {
            len: values.len() as u64,
            entries,
        }
    }

    /// Build from sparse `(index, value)` pairs in any order.
    ///
    /// Values at repeated indices are summed. Indices must be less than `len`.
    pub fn from_sparse(len: u64, values: impl IntoIterator<Item = (u64, f64)>) -> Self {
        let mut merged: FxHashMap<u64, f64> = FxHashMap::default();
        for (idx, v) in values {
            debug_assert!(idx < len);
            *merged.entry(idx).or_insert(0.0) += v;
        }

        let mut entries: Vec<(u64, f64)> =
            merged.into_iter().filter(|(_, v)| *v != 0.0).collect();
        entries.sort_unstable_by_key(|(idx, _)| *idx);

        FrequencyVector { len, entries }
    }

    /// Logical length, including zero entries.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Non-zero entries sorted by index.
    pub fn entries(&self) -> &[(u64, f64)] {
        &self.entries
    }

    #[cfg(test)]
    pub fn get(&self, idx: u64) -> f64 {
        self.entries
            .binary_search_by_key(&idx, |(i, _)| *i)
            .map_or(0.0, |pos| self.entries[pos].1)
    }
}

/// Computes normalised k-mer frequencies for sequences of one molecule type.
#[derive(Clone, Debug)]
pub struct KmerCounter {
    k: usize,
    num_states: usize,
    space: u64,
}

impl KmerCounter {
    pub fn new(k: usize, moltype: MolType) -> Result<Self> {
        let num_states = moltype.num_states();
        let space = kmer_space(num_states, k)
            .ok_or(DistanceError::KmerSpaceTooLarge { num_states, k })?;

        Ok(KmerCounter {
            k,
            num_states,
            space,
        })
    }

    /// Length of every vector produced by this counter.
    pub fn vector_len(&self) -> u64 {
        self.space
    }

    /// Frequency of each valid k-mer in `seq`. A sequence without valid k-mers
    /// yields the all-zero vector.
    pub fn frequencies(&self, seq: &[State]) -> FrequencyVector {
        let mut counts: FxHashMap<u64, u64> = FxHashMap::default();
        let mut total = 0u64;
        for kmer in kmers(seq, self.k, self.num_states) {
            let idx = kmer_index(kmer.iter().copied(), self.num_states as u64);
            *counts.entry(idx).or_insert(0) += 1;
            total += 1;
        }

        let total = total as f64;
        FrequencyVector::from_sparse(
            self.space,
            counts.into_iter().map(|(idx, count)| (idx, count as f64 / total)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dense() {
        let v = FrequencyVector::from_dense(&[0.0, 0.5, 0.0, 0.25, 0.25]);
        assert_eq!(v.len(), 5);
        assert_eq!(v.entries(), &[(1, 0.5), (3, 0.25), (4, 0.25)]);
        assert_eq!(v.get(0), 0.0);
        assert_eq!(v.get(3), 0.25);
    }

    #[test]
    fn test_from_sparse() {
        let v = FrequencyVector::from_sparse(10, [(7, 1.0), (2, 2.0), (7, 0.5), (4, 0.0)]);
        assert_eq!(v.len(), 10);
        assert_eq!(v.entries(), &[(2, 2.0), (7, 1.5)]);
    }

    #[test]
    fn test_frequencies() {
        let counter = KmerCounter::new(2, MolType::Dna).unwrap();
        assert_eq!(counter.vector_len(), 16);

        // TC, CT, TC, CN (skipped)
        let v = counter.frequencies(&MolType::Dna.encode(b"TCTCN"));
        assert_eq!(v.len(), 16);

        // TC = 01b, CT = 0100b
        assert_eq!(v.entries(), &[(1, 2.0 / 3.0), (4, 1.0 / 3.0)]);
    }

    #[test]
    fn test_empty_frequencies() {
        let counter = KmerCounter::new(4, MolType::Dna).unwrap();
        let v = counter.frequencies(&MolType::Dna.encode(b"ACG"));
        assert_eq!(v.len(), 256);
        assert!(v.entries().is_empty());
    }

    #[test]
    fn test_kmer_space_too_large() {
        assert!(KmerCounter::new(31, MolType::Dna).is_ok());
        assert_eq!(
            KmerCounter::new(32, MolType::Dna).unwrap_err(),
            DistanceError::KmerSpaceTooLarge { num_states: 4, k: 32 }
        );
        assert_eq!(
            KmerCounter::new(15, MolType::Protein).unwrap_err(),
            DistanceError::KmerSpaceTooLarge { num_states: 20, k: 15 }
        );
    }
}
