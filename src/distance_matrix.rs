//! Square, symmetric, zero-diagonal matrix of pairwise distances.

use std::io::Write;

use anyhow::{ensure, Result};
use itertools::Itertools;

#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn zeros(size: usize) -> Self {
        DistanceMatrix {
            size,
            values: vec![0.0; size * size],
        }
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    /// Set the distance between `i` and `j` in both cells.
    pub fn set(&mut self, i: usize, j: usize, distance: f64) {
        self.values[i * self.size + j] = distance;
        self.values[j * self.size + i] = distance;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    #[cfg(test)]
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| {
            self.get(i, i) == 0.0 && (0..i).all(|j| self.get(i, j) == self.get(j, i))
        })
    }

    /// Write matrix as a TSV table with a header of names and a leading name column.
    pub fn write_tsv<W: Write>(&self, writer: &mut W, names: &[String]) -> Result<()> {
        ensure!(
            names.len() == self.size,
            "Expected {} sequence names, but {} were provided.",
            self.size,
            names.len()
        );

        writeln!(writer, "\t{}", names.iter().join("\t"))?;
        for (i, name) in names.iter().enumerate() {
            writeln!(writer, "{}\t{}", name, self.row(i).iter().format("\t"))?;
        }

        Ok(())
    }
}
