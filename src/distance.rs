//! Distance estimators between pairs of sequences.
//!
//! The mash distance is estimated from two bottom sketches; the Euclidean
//! distance is exact over two k-mer frequency vectors.

use crate::kmer_freqs::FrequencyVector;
use crate::min_hash::BottomSketch;

/// Mash distance between two bottom sketches built with the same `k` and `sketch_size`.
///
/// The union is limited to the `sketch_size` smallest hashes across both sketches,
/// so the estimate only counts intersections within that bottom-k union. Two empty
/// sketches are treated as identical.
pub fn mash_distance(
    left: &BottomSketch,
    right: &BottomSketch,
    k: usize,
    sketch_size: usize,
) -> f64 {
    let left = left.hashes();
    let right = right.hashes();

    let mut intersection_size = 0usize;
    let mut union_size = 0usize;

    let mut left_idx = 0;
    let mut right_idx = 0;
    while union_size < sketch_size && left_idx < left.len() && right_idx < right.len() {
        match left[left_idx].cmp(&right[right_idx]) {
            std::cmp::Ordering::Less => left_idx += 1,
            std::cmp::Ordering::Greater => right_idx += 1,
            std::cmp::Ordering::Equal => {
                left_idx += 1;
                right_idx += 1;
                intersection_size += 1;
            }
        }
        union_size += 1;
    }

    // one or both sketches ran out before the union was full
    if union_size < sketch_size {
        union_size += left.len() - left_idx;
        union_size += right.len() - right_idx;
        union_size = union_size.min(sketch_size);
    }

    if intersection_size == union_size {
        return 0.0;
    }

    if intersection_size == 0 {
        return 1.0;
    }

    let jaccard = intersection_size as f64 / union_size as f64;
    let distance = -(2.0 * jaccard / (1.0 + jaccard)).ln() / k as f64;

    distance.min(1.0)
}

/// Euclidean (L2) distance between two frequency vectors of equal length.
pub fn euclidean_distance(left: &FrequencyVector, right: &FrequencyVector) -> f64 {
    debug_assert_eq!(left.len(), right.len());

    let left = left.entries();
    let right = right.entries();

    let mut sum_sq = 0.0;
    let mut left_idx = 0;
    let mut right_idx = 0;
    while left_idx < left.len() && right_idx < right.len() {
        let (li, lv) = left[left_idx];
        let (ri, rv) = right[right_idx];
        if li < ri {
            sum_sq += lv * lv;
            left_idx += 1;
        } else if ri < li {
            sum_sq += rv * rv;
            right_idx += 1;
        } else {
            let diff = lv - rv;
            sum_sq += diff * diff;
            left_idx += 1;
            right_idx += 1;
        }
    }

    sum_sq += left[left_idx..].iter().map(|(_, v)| v * v).sum::<f64>();
    sum_sq += right[right_idx..].iter().map(|(_, v)| v * v).sum::<f64>();

    sum_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sketch(hashes: &[u64]) -> BottomSketch {
        BottomSketch::from_hashes(hashes.iter().copied(), hashes.len().max(1))
    }

    fn mash_ref(j: f64, k: usize) -> f64 {
        (-(2.0 * j / (1.0 + j)).ln() / k as f64).min(1.0)
    }

    #[test]
    fn test_identical() {
        let s = sketch(&[1, 4, 9, 16]);
        assert_eq!(mash_distance(&s, &s, 16, 4), 0.0);
        assert_eq!(mash_distance(&s, &s, 16, 100), 0.0);
    }

    #[test]
    fn test_disjoint() {
        let a = sketch(&[1, 3, 5]);
        let b = sketch(&[2, 4, 6]);
        assert_eq!(mash_distance(&a, &b, 16, 3), 1.0);
        assert_eq!(mash_distance(&a, &b, 16, 10), 1.0);
    }

    #[test]
    fn test_empty_sketches() {
        let empty = BottomSketch::default();
        let s = sketch(&[7]);
        assert_eq!(mash_distance(&empty, &empty, 16, 4), 0.0);
        assert_eq!(mash_distance(&empty, &s, 16, 4), 1.0);
        assert_eq!(mash_distance(&s, &empty, 16, 4), 1.0);
    }

    #[test]
    fn test_partial_overlap() {
        // union {1,2,3,4,5}, intersection {2,3}
        let a = sketch(&[1, 2, 3]);
        let b = sketch(&[2, 3, 4, 5]);
        let d = mash_distance(&a, &b, 2, 10);
        assert!((d - mash_ref(2.0 / 5.0, 2)).abs() < 1e-12);
        assert!(d > 0.0 && d < 1.0);
    }

    #[test]
    fn test_union_truncated_to_sketch_size() {
        // bottom-3 union is {1,2,3}; only 2 is shared
        let a = sketch(&[1, 2, 8, 9]);
        let b = sketch(&[2, 3, 8, 9]);
        let d = mash_distance(&a, &b, 4, 3);
        assert!((d - mash_ref(1.0 / 3.0, 4)).abs() < 1e-12);

        // shared hashes beyond the bottom-k union are ignored
        let d_full = mash_distance(&a, &b, 4, 5);
        assert!((d_full - mash_ref(3.0 / 5.0, 4)).abs() < 1e-12);
    }

    #[test]
    fn test_underfull_union_capped() {
        // loop ends with a exhausted at union 2, remaining 3 from b gives 5, capped to 4
        let a = sketch(&[1, 2]);
        let b = sketch(&[2, 3, 4, 5]);
        let d = mash_distance(&a, &b, 3, 4);
        assert!((d - mash_ref(1.0 / 4.0, 3)).abs() < 1e-12);
    }

    #[test]
    fn test_clamped() {
        // J = 1/100 with k = 1 gives ~3.9 before clamping
        let a: Vec<u64> = (0..100).collect();
        let b: Vec<u64> = std::iter::once(0).chain(100..199).collect();
        let d = mash_distance(&sketch(&a), &sketch(&b), 1, 100);
        assert_eq!(d, 1.0);
    }

    #[test]
    fn test_mash_symmetric_and_bounded() {
        let sketches: Vec<BottomSketch> = (1..8u64)
            .map(|step| sketch(&(0..40).map(|i| i * step).collect::<Vec<u64>>()))
            .collect();

        for a in &sketches {
            for b in &sketches {
                for sketch_size in [1, 5, 40, 80] {
                    let d = mash_distance(a, b, 5, sketch_size);
                    assert!((0.0..=1.0).contains(&d));
                    assert_eq!(d, mash_distance(b, a, 5, sketch_size));
                }
            }
        }
    }

    #[test]
    fn test_euclidean() {
        let a = FrequencyVector::from_dense(&[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(euclidean_distance(&a, &a), 0.0);

        // differs in one bin by d
        let b = FrequencyVector::from_dense(&[0.1, 0.7, 0.3, 0.4]);
        assert!((euclidean_distance(&a, &b) - 0.5).abs() < 1e-12);

        let c = FrequencyVector::from_dense(&[3.0, 0.0, 0.0, 0.0]);
        let d = FrequencyVector::from_dense(&[0.0, 0.0, 0.0, 4.0]);
        assert_eq!(euclidean_distance(&c, &d), 5.0);
        assert_eq!(euclidean_distance(&d, &c), 5.0);

        let zero = FrequencyVector::from_dense(&[0.0; 4]);
        assert_eq!(euclidean_distance(&zero, &d), 4.0);
    }

    #[test]
    fn test_euclidean_triangle_inequality() {
        let a = FrequencyVector::from_dense(&[0.5, 0.0, 0.25, 0.25]);
        let b = FrequencyVector::from_dense(&[0.0, 0.5, 0.5, 0.0]);
        let c = FrequencyVector::from_dense(&[0.25, 0.25, 0.25, 0.25]);
        let ab = euclidean_distance(&a, &b);
        assert!(ab <= euclidean_distance(&a, &c) + euclidean_distance(&c, &b));
    }
}
