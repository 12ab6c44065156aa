use thiserror::Error;

/// Errors shared across the rebars crates.
///
/// Only structural failures live here. A record that merely fails a
/// sequence-consistency check, or whose rebased ALT equals its rebased REF,
/// is not an error: those are per-record outcomes collected in the
/// `RebaseReport` of `rebars-rebase` while processing continues.
#[derive(Error, Debug)]
pub enum RebaseError {
    #[error("No inference records provided: cannot partition the personalised reference")]
    EmptyInput,

    #[error("Records for {chrom} not in increasing POS order: {prev} then {pos}")]
    UnsortedRecords { chrom: String, prev: u32, pos: u32 },

    #[error("Records for {chrom} are not contiguous: interleaved with {other}")]
    NonContiguousChrom { chrom: String, other: String },

    #[error("No chromosome length supplied for {0}")]
    MissingChromLength(String),

    #[error("Record {chrom}:{pos} selects allele {allele} but carries {alts} ALT allele(s)")]
    BadAlleleIndex {
        chrom: String,
        pos: u32,
        allele: usize,
        alts: usize,
    },

    #[error("Chromosome {0} has no region list in the inference index")]
    UnknownChrom(String),

    #[error("REF walk for {chrom}:{pos} consumed {consumed} of {expected} bases")]
    InternalConsistency {
        chrom: String,
        pos: u32,
        consumed: usize,
        expected: usize,
    },

    #[error("Malformed variant record: {0}")]
    MalformedRecord(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
