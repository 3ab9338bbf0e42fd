//! This module computes the full matrix of pairwise distances for a collection of
//! sequences.
//!
//! It provides functionality to:
//! - Build a bottom sketch or k-mer frequency vector for every sequence in parallel.
//! - Compute the distance for every unordered pair of sequences in parallel.
//!
//! Each row of the lower triangle is computed by a single task and then mirrored, so
//! no two tasks write the same matrix cell.

use log::{debug, warn};
use rayon::iter::{
    IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator, ParallelIterator,
};

use crate::alphabet::State;
use crate::distance::{euclidean_distance, mash_distance};
use crate::distance_matrix::DistanceMatrix;
use crate::distance_params::{DistanceMode, DistanceParams};
use crate::error::{DistanceError, Result};
use crate::kmer_freqs::FrequencyVector;
use crate::min_hash::BottomSketch;
use crate::progress::ProgressSink;

/// Calculates pairwise distances using a validated set of parameters.
#[derive(Clone, Debug)]
pub struct DistanceCalculator {
    params: DistanceParams,
}

impl DistanceCalculator {
    pub fn new(params: DistanceParams) -> Self {
        DistanceCalculator { params }
    }

    /// Distance matrix for encoded sequences, rows ordered as the input.
    pub fn distances<S>(&self, seqs: &[S], progress: &dyn ProgressSink) -> Result<DistanceMatrix>
    where
        S: AsRef<[State]> + Sync,
    {
        match self.params.mode() {
            DistanceMode::Mash => {
                let sketch_size = self
                    .params
                    .sketch_size()
                    .ok_or(DistanceError::MissingSketchSize)?;
                let sketches = self.sketches(seqs, progress)?;
                Ok(mash_distances(&sketches, self.params.k(), sketch_size, progress))
            }
            DistanceMode::Euclidean => {
                let vectors = self.frequencies(seqs, progress)?;
                euclidean_distances(&vectors, progress)
            }
        }
    }

    /// Bottom sketch of each sequence.
    pub fn sketches<S>(
        &self,
        seqs: &[S],
        progress: &dyn ProgressSink,
    ) -> Result<Vec<BottomSketch>>
    where
        S: AsRef<[State]> + Sync,
    {
        let sketcher = self.params.create_sketcher()?;

        progress.begin_task("Generating sketches", seqs.len() as u64);
        let sketches = seqs
            .par_iter()
            .enumerate()
            .map(|(idx, seq)| {
                let mut sketcher = sketcher.clone();
                sketcher.process_seq(seq.as_ref());
                debug!(
                    "Sequence {}: {} bp, {} valid k-mers, {} unique hashes.",
                    idx,
                    sketcher.bp_count(),
                    sketcher.kmer_total_count(),
                    sketcher.unique_hash_count()
                );
                if sketcher.kmer_total_count() == 0 {
                    warn!("Sequence {} contains no valid {}-mers.", idx, self.params.k());
                }

                progress.advance(1);
                sketcher.to_sketch()
            })
            .collect();
        progress.finish_task();

        Ok(sketches)
    }

    /// Normalised k-mer frequencies of each sequence.
    pub fn frequencies<S>(
        &self,
        seqs: &[S],
        progress: &dyn ProgressSink,
    ) -> Result<Vec<FrequencyVector>>
    where
        S: AsRef<[State]> + Sync,
    {
        let counter = self.params.create_counter()?;
        debug!("Frequency vectors span {} possible k-mers.", counter.vector_len());

        progress.begin_task("Computing k-mer frequencies", seqs.len() as u64);
        let vectors = seqs
            .par_iter()
            .enumerate()
            .map(|(idx, seq)| {
                let freqs = counter.frequencies(seq.as_ref());
                if freqs.entries().is_empty() {
                    warn!("Sequence {} contains no valid {}-mers.", idx, self.params.k());
                }

                progress.advance(1);
                freqs
            })
            .collect();
        progress.finish_task();

        Ok(vectors)
    }
}

/// Pairwise mash distances between sketches built with the same parameters.
pub fn mash_distances(
    sketches: &[BottomSketch],
    k: usize,
    sketch_size: usize,
    progress: &dyn ProgressSink,
) -> DistanceMatrix {
    pairwise_matrix(sketches, progress, |a, b| mash_distance(a, b, k, sketch_size))
}

/// Pairwise Euclidean distances between frequency vectors of equal length.
pub fn euclidean_distances(
    vectors: &[FrequencyVector],
    progress: &dyn ProgressSink,
) -> Result<DistanceMatrix> {
    if let Some(first) = vectors.first() {
        let expected = first.len();
        if let Some((index, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != expected) {
            return Err(DistanceError::FrequencyLengthMismatch {
                index,
                expected,
                actual: v.len(),
            });
        }
    }

    Ok(pairwise_matrix(vectors, progress, euclidean_distance))
}

fn pairwise_matrix<T, F>(items: &[T], progress: &dyn ProgressSink, dist: F) -> DistanceMatrix
where
    T: Sync,
    F: Fn(&T, &T) -> f64 + Sync,
{
    let n = items.len();
    let num_pairs = (n * n.saturating_sub(1) / 2) as u64;

    progress.begin_task("Computing pairwise distances", num_pairs);
    let rows: Vec<Vec<f64>> = (1..n)
        .into_par_iter()
        .map(|i| {
            (0..i)
                .map(|j| {
                    let d = dist(&items[i], &items[j]);
                    progress.advance(1);
                    d
                })
                .collect()
        })
        .collect();
    progress.finish_task();

    let mut matrix = DistanceMatrix::zeros(n);
    for (i, row) in (1..).zip(rows) {
        for (j, d) in row.into_iter().enumerate() {
            matrix.set(i, j, d);
        }
    }

    matrix
}
