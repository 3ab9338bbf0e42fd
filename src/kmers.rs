//! Extraction of valid k-mers from an encoded sequence.

use crate::alphabet::State;

/// Iterator over all windows of length `k` that contain only valid states.
///
/// Each symbol is inspected once as it enters the window. An invalid symbol
/// at position `p` moves the skip boundary to `p + 1`, masking every window
/// that overlaps it.
pub struct Kmers<'a> {
    seq: &'a [State],
    k: usize,
    num_states: usize,
    pos: usize,
    skip_until: usize,
}

impl<'a> Kmers<'a> {
    pub fn new(seq: &'a [State], k: usize, num_states: usize) -> Self {
        let mut skip_until = 0;
        if k > 0 && seq.len() >= k {
            for (i, &s) in seq[..k - 1].iter().enumerate() {
                if s as usize >= num_states {
                    skip_until = i + 1;
                }
            }
        }

        Kmers {
            seq,
            k,
            num_states,
            pos: 0,
            skip_until,
        }
    }
}

impl<'a> Iterator for Kmers<'a> {
    type Item = &'a [State];

    fn next(&mut self) -> Option<Self::Item> {
        if self.k == 0 {
            return None;
        }

        while self.pos + self.k <= self.seq.len() {
            let start = self.pos;
            let last = start + self.k - 1;
            self.pos += 1;

            if self.seq[last] as usize >= self.num_states {
                self.skip_until = last + 1;
            }

            if start >= self.skip_until {
                return Some(&self.seq[start..=last]);
            }
        }

        None
    }
}

/// Lazily yield the valid k-mers of `seq`.
pub fn kmers(seq: &[State], k: usize, num_states: usize) -> Kmers<'_> {
    Kmers::new(seq, k, num_states)
}
