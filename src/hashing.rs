// The integer hash function in this file was ported from minimap2 by Heng Li.

// minimap2 MIT License
//
// Copyright (c) 2018-     Dana-Farber Cancer Institute
//               2017-2018 Broad Institute, Inc.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS
// BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN
// ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::cmp::Ordering;

use crate::alphabet::{complement, MolType, State};
use crate::error::{DistanceError, Result};

pub type ItemHash = u64;

const FOLD_SEED: ItemHash = 0x9e37_79b9_7f4a_7c15;

/// Thomas Wang's integer hash function.
// Ported from minimap2 and following Rust implementation by Anicet Ebou.
// https://gist.github.com/lh3/974ced188be2f90422cc#file-inthash-c
// https://aebou.rbind.io/post/a-rust-glimpse-at-thomas-wang-integer-hash-function
// Further reading: https://gist.github.com/badboy/6267743
#[inline]
pub fn tw_hash64(kmer: ItemHash) -> ItemHash {
    let mut hash = kmer;

    hash = (!hash).wrapping_add(hash << 21); // key = (key << 21) - key - 1
    hash = hash ^ (hash >> 24);

    hash = hash.wrapping_add(hash << 3).wrapping_add(hash << 8); // key * 265
    hash = hash ^ (hash >> 14);

    hash = hash.wrapping_add(hash << 2).wrapping_add(hash << 4); // key * 21
    hash = hash ^ (hash >> 28);

    hash = hash.wrapping_add(hash << 31);

    hash
}

/// Number of distinct k-mers over `num_states` symbols, if it fits in 64 bits.
pub fn kmer_space(num_states: usize, k: usize) -> Option<u64> {
    let k = u32::try_from(k).ok()?;
    (num_states as u64).checked_pow(k)
}

/// Positional base-`num_states` value of a k-mer, first symbol most significant.
///
/// Only meaningful when `kmer_space` is defined for the k-mer length.
#[inline]
pub fn kmer_index(symbols: impl Iterator<Item = State>, num_states: u64) -> u64 {
    symbols.fold(0, |acc, s| acc * num_states + s as u64)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Packing {
    // k-mers map one-to-one onto 64-bit integers
    Exact,
    // k-mer space exceeds 64 bits so symbols are mixed in one at a time
    Folded,
}

/// Maps k-mers to 64-bit hashes, optionally folding reverse complements together.
#[derive(Clone, Debug)]
pub struct KmerHasher {
    k: usize,
    num_states: u64,
    canonical: bool,
    packing: Packing,
}

impl KmerHasher {
    pub fn new(k: usize, moltype: MolType, canonical: bool) -> Result<Self> {
        if canonical && !moltype.is_nucleic() {
            return Err(DistanceError::CanonicalRequiresNucleotide(moltype));
        }

        let packing = match kmer_space(moltype.num_states(), k) {
            Some(_) => Packing::Exact,
            None => Packing::Folded,
        };

        Ok(KmerHasher {
            k,
            num_states: moltype.num_states() as u64,
            canonical,
            packing,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Hash a k-mer consisting solely of valid states.
    pub fn hash(&self, kmer: &[State]) -> ItemHash {
        debug_assert_eq!(kmer.len(), self.k);

        if self.canonical && reverse_complement_cmp(kmer) == Ordering::Less {
            self.hash_symbols(kmer.iter().rev().map(|&s| complement(s)))
        } else {
            self.hash_symbols(kmer.iter().copied())
        }
    }

    fn hash_symbols(&self, symbols: impl Iterator<Item = State>) -> ItemHash {
        match self.packing {
            Packing::Exact => tw_hash64(kmer_index(symbols, self.num_states)),
            Packing::Folded => {
                symbols.fold(FOLD_SEED, |acc, s| tw_hash64(acc ^ s as ItemHash))
            }
        }
    }
}

/// Lexicographic comparison of a k-mer's reverse complement against the k-mer.
fn reverse_complement_cmp(kmer: &[State]) -> Ordering {
    kmer.iter()
        .rev()
        .map(|&s| complement(s))
        .cmp(kmer.iter().copied())
}
