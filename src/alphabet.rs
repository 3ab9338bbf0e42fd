//! Molecule types and the encoding of sequence symbols into small integer states.
//!
//! Nucleotides are ordered `T C A G` (RNA: `U C A G`) so that the complement of
//! state `s` is `(s + 2) mod 4`. Any byte outside the canonical alphabet, such as
//! `N` or a gap, is encoded as `num_states` and is never admitted into a k-mer.

use std::fmt;
use std::str::FromStr;

use crate::error::DistanceError;

/// Encoded sequence symbol.
pub type State = u8;

const DNA_STATES: &[u8] = b"TCAG";
const RNA_STATES: &[u8] = b"UCAG";
const PROTEIN_STATES: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

const fn state_table(states: &[u8]) -> [State; 256] {
    let mut table = [states.len() as State; 256];

    let mut i = 0;
    while i < states.len() {
        table[states[i] as usize] = i as State;
        table[states[i].to_ascii_lowercase() as usize] = i as State;
        i += 1;
    }

    table
}

const DNA_TABLE: [State; 256] = state_table(DNA_STATES);
const RNA_TABLE: [State; 256] = state_table(RNA_STATES);
const PROTEIN_TABLE: [State; 256] = state_table(PROTEIN_STATES);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MolType {
    Dna,
    Rna,
    Protein,
}

impl MolType {
    /// Canonical symbols in state order.
    pub fn states(&self) -> &'static [u8] {
        match self {
            MolType::Dna => DNA_STATES,
            MolType::Rna => RNA_STATES,
            MolType::Protein => PROTEIN_STATES,
        }
    }

    pub fn num_states(&self) -> usize {
        self.states().len()
    }

    /// True for alphabets with a reverse complement.
    pub fn is_nucleic(&self) -> bool {
        matches!(self, MolType::Dna | MolType::Rna)
    }

    /// Encode raw sequence bytes, mapping non-canonical symbols to `num_states`.
    pub fn encode(&self, seq: &[u8]) -> Vec<State> {
        let table = match self {
            MolType::Dna => &DNA_TABLE,
            MolType::Rna => &RNA_TABLE,
            MolType::Protein => &PROTEIN_TABLE,
        };

        seq.iter().map(|&b| table[b as usize]).collect()
    }
}

/// Complement of a nucleotide state under the `T C A G` ordering.
#[inline]
pub fn complement(state: State) -> State {
    (state + 2) & 3
}

impl fmt::Display for MolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MolType::Dna => "dna",
            MolType::Rna => "rna",
            MolType::Protein => "protein",
        };
        write!(f, "{name}")
    }
}

impl FromStr for MolType {
    type Err = DistanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dna" => Ok(MolType::Dna),
            "rna" => Ok(MolType::Rna),
            "protein" => Ok(MolType::Protein),
            _ => Err(DistanceError::UnknownMolType(s.to_string())),
        }
    }
}
