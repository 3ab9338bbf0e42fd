//! This module provides the `MashSketcher` struct for computing bottom-k MinHash sketches
//! from encoded sequences, and the immutable `BottomSketch` it produces. A bottom sketch
//! holds the `sketch_size` smallest distinct k-mer hashes of a sequence and is used to
//! estimate the Jaccard similarity between k-mer sets.
//!
//! See Ondov et al., 2016: https://doi.org/10.1186/s13059-016-0997-x

use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use crate::alphabet::State;
use crate::hashing::{ItemHash, KmerHasher};
use crate::kmers::kmers;

/// Smallest distinct k-mer hashes of a sequence in strictly ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BottomSketch {
    hashes: Vec<ItemHash>,
}

impl BottomSketch {
    /// Keep the `sketch_size` smallest distinct values of a hash stream.
    ///
    /// Uses a max-heap bounded to `sketch_size` entries so the stream is never
    /// sorted in full.
    pub fn from_hashes(hashes: impl IntoIterator<Item = ItemHash>, sketch_size: usize) -> Self {
        let unique: FxHashSet<ItemHash> = hashes.into_iter().collect();
        Self::from_unique(unique, sketch_size)
    }

    fn from_unique(unique: FxHashSet<ItemHash>, sketch_size: usize) -> Self {
        let mut heap = BinaryHeap::with_capacity(sketch_size.min(unique.len()));
        for hash in unique {
            if heap.len() < sketch_size {
                heap.push(hash);
            } else if let Some(mut max) = heap.peek_mut() {
                if hash < *max {
                    *max = hash;
                }
            }
        }

        BottomSketch {
            hashes: heap.into_sorted_vec(),
        }
    }

    pub fn hashes(&self) -> &[ItemHash] {
        &self.hashes
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Accumulates the distinct k-mer hashes of one sequence.
#[derive(Clone, Debug)]
pub struct MashSketcher {
    hashes: FxHashSet<ItemHash>,
    hasher: KmerHasher,
    num_states: usize,
    sketch_size: usize,
    kmer_total_count: u64,
    bp_count: u64,
}

impl MashSketcher {
    pub fn new(hasher: KmerHasher, num_states: usize, sketch_size: usize) -> Self {
        MashSketcher {
            hashes: FxHashSet::default(),
            hasher,
            num_states,
            sketch_size,
            kmer_total_count: 0,
            bp_count: 0,
        }
    }

    pub fn process_seq(&mut self, seq: &[State]) {
        self.bp_count += seq.len() as u64;

        for kmer in kmers(seq, self.hasher.k(), self.num_states) {
            self.hashes.insert(self.hasher.hash(kmer));
            self.kmer_total_count += 1;
        }
    }

    pub fn unique_hash_count(&self) -> u64 {
        self.hashes.len() as u64
    }

    /// Number of valid k-mers processed.
    pub fn kmer_total_count(&self) -> u64 {
        self.kmer_total_count
    }

    pub fn bp_count(&self) -> u64 {
        self.bp_count
    }

    pub fn to_sketch(self) -> BottomSketch {
        BottomSketch::from_unique(self.hashes, self.sketch_size)
    }
}
