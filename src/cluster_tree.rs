//! Average linkage (UPGMA) clustering of a distance matrix into a rooted tree.
//!
//! Leaves are numbered `0..n` in matrix order and each merge creates the next
//! internal node, `n, n + 1, ...`. A node sits at half the distance at which its
//! two children were joined, so every leaf is at the same depth below the root.

use std::io::Write;

use anyhow::{ensure, Result};

use crate::distance_matrix::DistanceMatrix;
use crate::progress::ProgressSink;

/// Join of two nodes into a new internal node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClusterTree {
    names: Vec<String>,
    merges: Vec<Merge>,
}

impl ClusterTree {
    /// Cluster the rows of `matrix`, labelling leaves with `names`.
    ///
    /// At each step the closest pair of clusters is joined; ties go to the pair
    /// with the smallest row, then column. Distances to the joined cluster are
    /// the size-weighted mean of the distances to its two parts.
    pub fn upgma(
        matrix: &DistanceMatrix,
        names: &[String],
        progress: &dyn ProgressSink,
    ) -> Result<Self> {
        let n = matrix.size();
        ensure!(n > 0, "Cannot build a cluster tree without sequences.");
        ensure!(
            names.len() == n,
            "Expected {} sequence names, but {} were provided.",
            n,
            names.len()
        );

        let mut dist: Vec<Vec<f64>> = (0..n).map(|i| matrix.row(i).to_vec()).collect();
        let mut sizes = vec![1usize; n];
        let mut nodes: Vec<usize> = (0..n).collect();
        let mut active = vec![true; n];
        let mut merges = Vec::with_capacity(n - 1);

        progress.begin_task("Building cluster tree", (n - 1) as u64);
        for next_node in n..2 * n - 1 {
            let mut closest: Option<(usize, usize, f64)> = None;
            for i in (0..n).filter(|&i| active[i]) {
                for j in (i + 1..n).filter(|&j| active[j]) {
                    if closest.is_none_or(|(_, _, d)| dist[i][j] < d) {
                        closest = Some((i, j, dist[i][j]));
                    }
                }
            }

            // n > 1 here, so at least two slots are active
            let Some((i, j, distance)) = closest else {
                break;
            };

            merges.push(Merge {
                left: nodes[i],
                right: nodes[j],
                distance,
            });

            // joined cluster takes over slot i
            let (size_i, size_j) = (sizes[i] as f64, sizes[j] as f64);
            for k in (0..n).filter(|&k| active[k] && k != i && k != j) {
                let d = (size_i * dist[i][k] + size_j * dist[j][k]) / (size_i + size_j);
                dist[i][k] = d;
                dist[k][i] = d;
            }
            sizes[i] += sizes[j];
            nodes[i] = next_node;
            active[j] = false;

            progress.advance(1);
        }
        progress.finish_task();

        Ok(ClusterTree {
            names: names.to_vec(),
            merges,
        })
    }

    /// Number of leaves.
    pub fn num_leaves(&self) -> usize {
        self.names.len()
    }

    /// Merges in the order they were made.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Height of a node above the leaves.
    pub fn height(&self, node: usize) -> f64 {
        match node.checked_sub(self.num_leaves()) {
            Some(m) => self.merges[m].distance / 2.0,
            None => 0.0,
        }
    }

    /// Tree in Newick format, terminated by `;`.
    pub fn to_newick(&self) -> String {
        let n = self.num_leaves();
        let mut subtrees: Vec<Option<String>> = self
            .names
            .iter()
            .map(|name| Some(newick_label(name)))
            .chain(std::iter::repeat_n(None, self.merges.len()))
            .collect();

        for (m, merge) in self.merges.iter().enumerate() {
            let node = n + m;
            let height = self.height(node);
            let left = subtrees[merge.left].take().unwrap_or_default();
            let right = subtrees[merge.right].take().unwrap_or_default();
            subtrees[node] = Some(format!(
                "({}:{},{}:{})",
                left,
                height - self.height(merge.left),
                right,
                height - self.height(merge.right)
            ));
        }

        let root = subtrees.pop().flatten().unwrap_or_default();
        format!("{root};")
    }

    pub fn write_newick<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", self.to_newick())?;
        Ok(())
    }
}

/// Leaf label, single-quoted when it contains Newick punctuation or whitespace.
fn newick_label(name: &str) -> String {
    let needs_quotes = name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || "()[]':;,".contains(c));

    if needs_quotes {
        format!("'{}'", name.replace('\'', "''"))
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::testing::RecordingProgress;
    use crate::progress::NoProgress;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn merge(left: usize, right: usize, distance: f64) -> Merge {
        Merge {
            left,
            right,
            distance,
        }
    }

    fn matrix(size: usize, pairs: &[(usize, usize, f64)]) -> DistanceMatrix {
        let mut matrix = DistanceMatrix::zeros(size);
        for &(i, j, d) in pairs {
            matrix.set(i, j, d);
        }
        matrix
    }

    // a-b and c-d are close pairs; a-c is closer than b-c
    fn four_taxa() -> DistanceMatrix {
        matrix(
            4,
            &[
                (0, 1, 2.0),
                (0, 2, 6.0),
                (1, 2, 8.0),
                (0, 3, 10.0),
                (1, 3, 10.0),
                (2, 3, 4.0),
            ],
        )
    }

    #[test]
    fn test_merge_order() -> Result<()> {
        let tree = ClusterTree::upgma(&four_taxa(), &names(&["a", "b", "c", "d"]), &NoProgress)?;

        // ab joins first; ab-c = (6 + 8) / 2 = 7 loses to c-d = 4;
        // ab-cd = (6 + 8 + 10 + 10) / 4 = 8.5
        assert_eq!(tree.merges(), &[merge(0, 1, 2.0), merge(2, 3, 4.0), merge(4, 5, 8.5)]);

        Ok(())
    }

    #[test]
    fn test_branch_heights() -> Result<()> {
        let tree = ClusterTree::upgma(&four_taxa(), &names(&["a", "b", "c", "d"]), &NoProgress)?;

        assert_eq!(tree.height(0), 0.0);
        assert_eq!(tree.height(4), 1.0);
        assert_eq!(tree.height(5), 2.0);
        assert_eq!(tree.height(6), 4.25);
        assert_eq!(tree.to_newick(), "((a:1,b:1):3.25,(c:2,d:2):2.25);");

        Ok(())
    }

    #[test]
    fn test_size_weighted_average() -> Result<()> {
        // abc is a cluster of three when d joins, so d sits at the mean of its three distances
        let matrix = matrix(
            4,
            &[
                (0, 1, 1.0),
                (0, 2, 3.0),
                (1, 2, 3.0),
                (0, 3, 9.0),
                (1, 3, 9.0),
                (2, 3, 12.0),
            ],
        );
        let tree = ClusterTree::upgma(&matrix, &names(&["a", "b", "c", "d"]), &NoProgress)?;

        assert_eq!(tree.merges(), &[merge(0, 1, 1.0), merge(4, 2, 3.0), merge(5, 3, 10.0)]);
        assert_eq!(tree.to_newick(), "(((a:0.5,b:0.5):1,c:1.5):3.5,d:5);");

        Ok(())
    }

    #[test]
    fn test_ties_take_first_pair() -> Result<()> {
        let matrix = matrix(3, &[(0, 1, 1.0), (0, 2, 1.0), (1, 2, 1.0)]);
        let tree = ClusterTree::upgma(&matrix, &names(&["x", "y", "z"]), &NoProgress)?;

        assert_eq!(tree.merges()[0], merge(0, 1, 1.0));
        assert_eq!(tree.merges()[1], merge(3, 2, 1.0));

        Ok(())
    }

    #[test]
    fn test_single_leaf() -> Result<()> {
        let matrix = DistanceMatrix::zeros(1);
        let tree = ClusterTree::upgma(&matrix, &names(&["only"]), &NoProgress)?;
        assert!(tree.merges().is_empty());
        assert_eq!(tree.to_newick(), "only;");

        Ok(())
    }

    #[test]
    fn test_invalid_input() {
        let empty = DistanceMatrix::zeros(0);
        assert!(ClusterTree::upgma(&empty, &[], &NoProgress).is_err());

        let pair = DistanceMatrix::zeros(2);
        assert!(ClusterTree::upgma(&pair, &names(&["a"]), &NoProgress).is_err());
    }

    #[test]
    fn test_quoted_labels() -> Result<()> {
        let matrix = matrix(2, &[(0, 1, 0.5)]);
        let tree = ClusterTree::upgma(&matrix, &names(&["seq one", "it's"]), &NoProgress)?;
        assert_eq!(tree.to_newick(), "('seq one':0.25,'it''s':0.25);");

        let mut out = Vec::new();
        tree.write_newick(&mut out)?;
        assert_eq!(String::from_utf8(out)?, "('seq one':0.25,'it''s':0.25);\n");

        Ok(())
    }

    #[test]
    fn test_progress_per_merge() -> Result<()> {
        let progress = RecordingProgress::default();
        ClusterTree::upgma(&four_taxa(), &names(&["a", "b", "c", "d"]), &progress)?;
        assert_eq!(
            progress.tasks(),
            vec![("Building cluster tree".to_string(), 3, 3)]
        );

        Ok(())
    }
}
