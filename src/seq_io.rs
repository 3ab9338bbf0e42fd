use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use needletail::parse_fastx_file;
use rustc_hash::FxHashSet;

use crate::alphabet::{MolType, State};

/// Named sequence encoded for a molecule type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedSeq {
    pub name: String,
    pub seq: Vec<State>,
}

impl AsRef<[State]> for NamedSeq {
    fn as_ref(&self) -> &[State] {
        &self.seq
    }
}

/// Sequence name from a FASTA/Q header: the text before the first whitespace.
pub fn seq_name_from_header(header: &[u8]) -> String {
    let header = String::from_utf8_lossy(header);
    header.split_whitespace().next().unwrap_or_default().to_string()
}

/// Read and encode every record in a FASTA/Q file, which may be gzipped.
pub fn read_seq_file(seq_file: &Path, moltype: MolType) -> Result<Vec<NamedSeq>> {
    let mut fastx_reader = parse_fastx_file(seq_file)
        .context(format!("Failed to open {}", seq_file.display()))?;

    let mut seqs = Vec::new();
    while let Some(rec) = fastx_reader.next() {
        let record = rec.context(format!("Invalid record in {}", seq_file.display()))?;
        seqs.push(NamedSeq {
            name: seq_name_from_header(record.id()),
            seq: moltype.encode(&record.seq()),
        });
    }

    Ok(seqs)
}

/// Read sequences from all files in order, rejecting duplicate or empty names.
pub fn read_seq_files(seq_files: &[PathBuf], moltype: MolType) -> Result<Vec<NamedSeq>> {
    let mut seqs = Vec::new();
    for seq_file in seq_files {
        seqs.extend(read_seq_file(seq_file, moltype)?);
    }

    let mut names = FxHashSet::default();
    for seq in &seqs {
        if seq.name.is_empty() {
            bail!("Encountered sequence without a name.");
        }

        if !names.insert(seq.name.as_str()) {
            bail!("Sequence name '{}' occurs more than once.", seq.name);
        }
    }

    Ok(seqs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::{tempdir, TempDir};

    // Helper to create a temporary FASTA file with given contents
    fn write_temp_fasta(contents: &str, filename: &str, dir: &TempDir) -> PathBuf {
        let file_path = dir.path().join(filename);
        let mut file = File::create(&file_path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.sync_all().unwrap();
        file_path
    }

    #[test]
    fn test_seq_name_from_header() {
        assert_eq!(seq_name_from_header(b"seq1 some description"), "seq1");
        assert_eq!(seq_name_from_header(b"seq1\tother"), "seq1");
        assert_eq!(seq_name_from_header(b""), "");
    }

    #[test]
    fn test_read_seq_files() -> Result<()> {
        let temp_dir = tempdir()?;
        let file1 = write_temp_fasta(">seq1 first\nTCAG\nNT\n>seq2\nacgt\n", "a.fa", &temp_dir);
        let file2 = write_temp_fasta(">seq3\nGG\n", "b.fa", &temp_dir);

        let seqs = read_seq_files(&[file1, file2], MolType::Dna)?;
        assert_eq!(seqs.len(), 3);

        assert_eq!(seqs[0].name, "seq1");
        assert_eq!(seqs[0].seq, vec![0, 1, 2, 3, 4, 0]);
        assert_eq!(seqs[1].name, "seq2");
        assert_eq!(seqs[1].seq, vec![2, 1, 3, 0]);
        assert_eq!(seqs[2].name, "seq3");

        Ok(())
    }

    #[test]
    fn test_duplicate_names() {
        let temp_dir = tempdir().unwrap();
        let file = write_temp_fasta(">seq1\nACGT\n>seq1\nACGT\n", "dup.fa", &temp_dir);

        assert!(read_seq_files(&[file], MolType::Dna).is_err());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing.fa");
        assert!(read_seq_files(&[missing], MolType::Dna).is_err());
    }
}
