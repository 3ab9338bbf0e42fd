//! Command-line interface definition for the kdist application.
//!
//! This file defines the `Cli` struct using the `clap` crate to parse and validate command-line
//! arguments. It includes options for specifying input sequence files, output directory,
//! distance measure, k-mer length, sketch size, molecule type, tree output and number of
//! threads. Custom value parsers are provided for numeric ranges and the distance and molecule
//! types. The CLI output is styled using the `anstyle` crate for improved readability.

use std::path::PathBuf;

use clap::Parser;

use crate::alphabet::MolType;
use crate::distance_params::DistanceMode;

const DEFAULT_K: usize = 16;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(styles=get_styles())]
#[command(disable_help_subcommand = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// FASTA/Q files of sequences to compare (each record is one sequence)
    #[arg(short = 'i', long, help_heading = "Inputs", required = true, num_args = 1.., value_parser = clap::value_parser!(PathBuf))]
    pub input: Vec<PathBuf>,

    /// Output directory
    #[arg(short = 'o', long, help_heading = "Output", value_parser = clap::value_parser!(PathBuf))]
    pub out_dir: PathBuf,

    /// Distance measure [mash, euclidean]
    #[arg(short = 'd', long, help_heading = "Distance parameters", default_value = "mash", value_parser = parse_distance_mode)]
    pub distance: DistanceMode,

    /// Length of k-mers to use
    #[arg(short, long, help_heading = "Distance parameters", default_value_t = DEFAULT_K, value_parser = validate_kmer_length)]
    pub kmer_length: usize,

    /// Number of hashes retained per sketch (required for mash distance)
    #[arg(short = 's', long, help_heading = "Distance parameters")]
    pub sketch_size: Option<usize>,

    /// Molecule type of sequences [dna, rna, protein]
    #[arg(short, long, help_heading = "Distance parameters", default_value = "dna", value_parser = parse_moltype)]
    pub moltype: MolType,

    /// Treat k-mers and their reverse complements as identical (mash distance on DNA/RNA only)
    #[arg(long, help_heading = "Distance parameters", default_value_t = false)]
    pub canonical_kmers: bool,

    /// Also write an average linkage (UPGMA) tree of the sequences in Newick format
    #[arg(long, help_heading = "Output", default_value_t = false)]
    pub tree: bool,

    /// Number of threads to use
    #[arg(short, long, default_value_t = 1, value_parser = validate_threads)]
    pub threads: usize,

    /// Disable progress bars
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

fn validate_kmer_length(k: &str) -> Result<usize, String> {
    let k: usize = k
        .parse()
        .map_err(|_| format!("`{k}` isn't a valid k-mer length"))?;

    if !(1..=64).contains(&k) {
        return Err("k-mer length must be in the range [1, 64]".to_string());
    }

    Ok(k)
}

fn validate_threads(threads: &str) -> Result<usize, String> {
    let threads: usize = threads
        .parse()
        .map_err(|_| format!("`{threads}` isn't a valid value"))?;

    if !(1..=1024).contains(&threads) {
        return Err("Threads  must be in the range [1, 1024]".to_string());
    }

    Ok(threads)
}

fn parse_distance_mode(mode: &str) -> Result<DistanceMode, String> {
    mode.parse().map_err(|e: crate::error::DistanceError| e.to_string())
}

fn parse_moltype(moltype: &str) -> Result<MolType, String> {
    moltype.parse().map_err(|e: crate::error::DistanceError| e.to_string())
}

fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
        .header(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
        .literal(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .valid(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .placeholder(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
}
