//! Main entry point for the kdist application.
//!
//! This file handles command-line parsing, logging setup and parameter validation, and
//! orchestrates the computation of pairwise k-mer distances between all sequences in the
//! input FASTA/Q files. The resulting distance matrix, and optionally an average linkage
//! tree of the sequences, is written to the output directory.

use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use num_format::{Locale, ToFormattedString};

use crate::cli::Cli;
use crate::cluster_tree::ClusterTree;
use crate::distance_params::DistanceParams;
use crate::logging::setup_logger;
use crate::pairwise::DistanceCalculator;
use crate::progress::{BarProgress, NoProgress, ProgressSink};
use crate::seq_io::read_seq_files;

mod cli;
pub mod alphabet;
pub mod cluster_tree;
pub mod distance;
pub mod distance_matrix;
pub mod distance_params;
pub mod error;
pub mod hashing;
pub mod kmer_freqs;
pub mod kmers;
pub mod logging;
pub mod min_hash;
pub mod pairwise;
pub mod progress;
pub mod seq_io;

const DISTANCE_FILE: &str = "distances.tsv";
const TREE_FILE: &str = "tree.nwk";

/// Common initialization required by all commands.
fn init(threads: usize) -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    info!("{} v{}", env!("CARGO_PKG_NAME"), VERSION);
    info!("{}", env::args().collect::<Vec<String>>().join(" "));

    info!("Using {} threads.", threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;

    Ok(())
}

fn main() -> Result<()> {
    let start = Instant::now();

    let args = Cli::parse();

    std::fs::create_dir_all(&args.out_dir)
        .context(format!("Failed to create {}", args.out_dir.display()))?;
    setup_logger(&args.out_dir)?;

    init(args.threads)?;

    // reject invalid parameter combinations before reading any sequences
    let params = DistanceParams::new(
        args.distance,
        args.kmer_length,
        args.sketch_size,
        args.moltype,
        args.canonical_kmers,
    )?;
    info!("Distance parameters: {}", params);
    if params.ignores_canonical_kmers() {
        warn!("--canonical-kmers has no effect on the euclidean distance.");
    }

    info!("Reading sequences from {} file(s).", args.input.len());
    let seqs = read_seq_files(&args.input, params.moltype())?;
    let num_pairs = seqs.len() * seqs.len().saturating_sub(1) / 2;
    info!(
        " - read {} sequences ({} pairwise comparisons)",
        seqs.len().to_formatted_string(&Locale::en),
        num_pairs.to_formatted_string(&Locale::en)
    );

    let progress: Box<dyn ProgressSink> = if args.no_progress {
        Box::new(NoProgress)
    } else {
        Box::new(BarProgress::new())
    };

    info!("Calculating pairwise {} distances:", params.mode());
    let calculator = DistanceCalculator::new(params);
    let matrix = calculator.distances(&seqs, progress.as_ref())?;

    let names: Vec<String> = seqs.into_iter().map(|s| s.name).collect();
    let out_file = args.out_dir.join(DISTANCE_FILE);
    let mut writer = BufWriter::new(
        File::create(&out_file).context(format!("Failed to create {}", out_file.display()))?,
    );
    matrix.write_tsv(&mut writer, &names)?;
    writer.flush()?;
    info!("Distance matrix written to {}", out_file.display());

    if args.tree {
        info!("Clustering sequences with average linkage (UPGMA).");
        let tree = ClusterTree::upgma(&matrix, &names, progress.as_ref())?;

        let tree_file = args.out_dir.join(TREE_FILE);
        let mut writer = BufWriter::new(
            File::create(&tree_file).context(format!("Failed to create {}", tree_file.display()))?,
        );
        tree.write_newick(&mut writer)?;
        writer.flush()?;
        info!("Cluster tree written to {}", tree_file.display());
    }

    info!("Elapsed time (sec): {:.2}", start.elapsed().as_secs_f32());
    info!("Done.");

    Ok(())
}
