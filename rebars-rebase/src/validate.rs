//! The validating pass over a full set of discovered calls.
//!
//! Each record is optionally checked against the personalised reference
//! before rebasing and against the base-graph reference after; failures of
//! either check skip the record and land it in a report bucket, they never
//! abort the run. Calls whose rebased ALT equals the rebased REF reversed
//! the inference decision and are dropped silently.

use std::collections::HashMap;
use std::fmt::{self, Display};

use log::warn;

use rebars_core::RebaseError;
use rebars_core::models::VariantRecord;

use crate::index::RegionIndex;
use crate::rebase::rebase_record;

/// Whole-chromosome sequences for the optional consistency checks: the
/// base graph's linear reference and the personalised reference the calls
/// were made against, keyed by chromosome.
#[derive(Debug, Clone, Default)]
pub struct SequenceChecks {
    pub base: HashMap<String, String>,
    pub inferred: HashMap<String, String>,
}

/// Records skipped during a rebasing run, kept as VCF lines for the
/// end-of-run report.
///
/// `unplaced` records disagreed with the personalised reference before
/// rebasing; `discordant` records rebased cleanly but disagreed with the
/// base-graph sequence, which points at an inconsistency in the inputs the
/// graph was built from.
#[derive(Debug, Clone, Default)]
pub struct RebaseReport {
    pub unplaced: Vec<String>,
    pub discordant: Vec<String>,
}

impl RebaseReport {
    pub fn is_clean(&self) -> bool {
        self.unplaced.is_empty() && self.discordant.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.unplaced.len() + self.discordant.len()
    }
}

impl Display for RebaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} record(s) skipped: {} unplaced, {} discordant with the base reference",
            self.skipped(),
            self.unplaced.len(),
            self.discordant.len()
        )
    }
}

/// The surviving rebased records of a run, plus the report of what was
/// skipped along the way.
#[derive(Debug, Clone)]
pub struct RebaseOutcome {
    pub records: Vec<VariantRecord>,
    pub report: RebaseReport,
}

///
/// Rebase every discovered call onto base-graph coordinates.
///
/// With `checks` supplied, each record's REF is verified against the
/// personalised reference before rebasing and the rebased REF against the
/// base-graph sequence after; mismatching records are skipped into the
/// report buckets and processing continues. Rebased records whose ALT
/// equals the REF are dropped without reporting.
///
/// # Errors
///
/// Only structural failures abort the run: a discovered call on a
/// chromosome the inference index knows nothing about, or a rebasing walk
/// that breaks the partition invariant.
///
pub fn rebase_all(
    records: &[VariantRecord],
    index: &RegionIndex,
    checks: Option<&SequenceChecks>,
) -> Result<RebaseOutcome, RebaseError> {
    let mut rebased_records = Vec::new();
    let mut report = RebaseReport::default();

    for record in records {
        if let Some(checks) = checks {
            let placed = matches_sequence(
                checks.inferred.get(&record.chrom),
                record.pos,
                &record.reference,
            );
            if !placed {
                report.unplaced.push(record.to_string());
                continue;
            }
        }

        let regions = index
            .get(&record.chrom)
            .ok_or_else(|| RebaseError::UnknownChrom(record.chrom.clone()))?;
        let rebased = rebase_record(record, regions)?;

        if let Some(checks) = checks {
            let concordant = matches_sequence(
                checks.base.get(&rebased.chrom),
                rebased.pos,
                &rebased.reference,
            );
            if !concordant {
                report.discordant.push(rebased.to_string());
                continue;
            }
        }

        // the call exactly reverses the inference decision: nothing to report
        if rebased.alts.iter().all(|alt| *alt == rebased.reference) {
            continue;
        }

        rebased_records.push(rebased);
    }

    if !report.unplaced.is_empty() {
        warn!(
            "Skipped {} record(s) whose POS or REF disagreed with the personalised reference: {}",
            report.unplaced.len(),
            report.unplaced.join("\t")
        );
    }
    if !report.discordant.is_empty() {
        warn!(
            "Skipped {} rebased record(s) discordant with the base reference: {}",
            report.discordant.len(),
            report.discordant.join("\t")
        );
    }

    Ok(RebaseOutcome {
        records: rebased_records,
        report,
    })
}

/// Does `expected` occur at 1-based `pos` of the chromosome sequence?
/// A missing sequence or a span running past its end is a mismatch.
/// Comparison ignores case, FASTA files mix it freely.
fn matches_sequence(sequence: Option<&String>, pos: u32, expected: &str) -> bool {
    let Some(sequence) = sequence else {
        return false;
    };
    let start = (pos as usize).saturating_sub(1);
    let end = start + expected.len();
    if pos == 0 || end > sequence.len() {
        return false;
    }
    sequence[start..end].eq_ignore_ascii_case(expected)
}
