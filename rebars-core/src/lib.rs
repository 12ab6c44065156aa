//! Core library for the rebars workspace.
//!
//! This crate holds the data models shared across the rebasing tools:
//! variant records and variant sets read from VCF text, the [`Region`]
//! partition of a personalised reference, the workspace-wide error type,
//! and file utilities for FASTA and chromosome-size tables.
//!
//! The rebasing engine itself lives in the `rebars-rebase` crate.

pub mod errors;
pub mod models;
pub mod utils;

pub use errors::RebaseError;
pub use models::{Region, VariantRecord, VariantSet};
