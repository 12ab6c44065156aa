//! Building the per-chromosome region partition of a personalised reference.
//!
//! The inference VCF describes which allele was substituted at each variant
//! site of the base graph when the personalised reference was produced.
//! Replaying those decisions with a pair of cursors, one per coordinate
//! system, carves each chromosome of the personalised reference into an
//! ordered, gap-free list of [`Region`]s: byte-identical stretches and
//! substituted sites. That list is everything the rebaser needs to map a
//! discovered call back onto the base graph.

use std::collections::HashMap;

use rebars_core::RebaseError;
use rebars_core::models::{Region, VariantRecord};

/// The region lists of a personalised reference, one per chromosome.
/// Built once from the inference records, immutable afterwards.
#[derive(Debug, Clone)]
pub struct RegionIndex {
    map: HashMap<String, Vec<Region>>,
}

impl RegionIndex {
    /// The ordered region list for a chromosome, if the inference VCF
    /// mentioned it.
    pub fn get(&self, chrom: &str) -> Option<&[Region]> {
        self.map.get(chrom).map(|regions| regions.as_slice())
    }

    pub fn chroms(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(|chrom| chrom.as_str())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Cursor pair tracking how far construction has advanced through one
/// chromosome, in base-graph and personalised-reference coordinates.
struct Cursor {
    base_pos: u32,
    inf_pos: u32,
}

///
/// Partition a personalised reference into [`Region`]s, one list per
/// chromosome.
///
/// # Arguments
///
/// - records: the inference VCF records, sorted by POS within each
///   chromosome, chromosomes contiguous.
/// - chrom_lengths: one length per chromosome, in the order chromosomes
///   first appear in `records`.
///
/// Records where inference kept the REF allele (or made no call) contribute
/// no site region; their span is folded into the surrounding non-variant
/// region instead, so the partition stays gap-free.
///
/// # Errors
///
/// Unsorted or interleaved records, an empty record set, a missing
/// chromosome length, and a selected allele with no matching ALT are all
/// fatal: they mean the inference output is structurally broken.
///
pub fn build_region_index(
    records: &[VariantRecord],
    chrom_lengths: &[u32],
) -> Result<RegionIndex, RebaseError> {
    if records.is_empty() {
        return Err(RebaseError::EmptyInput);
    }

    let mut map: HashMap<String, Vec<Region>> = HashMap::new();
    let mut current: Vec<Region> = Vec::new();
    let mut current_chrom: Option<String> = None;
    let mut cursor = Cursor {
        base_pos: 1,
        inf_pos: 1,
    };
    let mut chrom_length: u32 = 0;
    let mut chroms_seen: usize = 0;
    let mut prev_pos: u32 = 0;

    for record in records {
        if current_chrom.as_deref() != Some(record.chrom.as_str()) {
            if map.contains_key(&record.chrom) {
                return Err(RebaseError::NonContiguousChrom {
                    chrom: record.chrom.clone(),
                    other: current_chrom.unwrap_or_default(),
                });
            }
            // close out the previous chromosome before starting a new one
            if let Some(chrom) = current_chrom.take() {
                push_trailing_region(&mut current, &cursor, chrom_length);
                map.insert(chrom, std::mem::take(&mut current));
            }
            chrom_length = chrom_lengths
                .get(chroms_seen)
                .copied()
                .ok_or_else(|| RebaseError::MissingChromLength(record.chrom.clone()))?;
            chroms_seen += 1;
            current_chrom = Some(record.chrom.clone());
            cursor = Cursor {
                base_pos: 1,
                inf_pos: 1,
            };
            prev_pos = 0;
        } else if record.pos <= prev_pos {
            return Err(RebaseError::UnsortedRecords {
                chrom: record.chrom.clone(),
                prev: prev_pos,
                pos: record.pos,
            });
        }
        prev_pos = record.pos;

        // the invariant stretch between the cursor and this site
        if record.pos > cursor.base_pos {
            let span = record.pos - cursor.base_pos;
            extend_non_variant(&mut current, &cursor, span);
            cursor.base_pos += span;
            cursor.inf_pos += span;
        }

        let picked = record.picked_allele();
        if picked > 0 {
            let alt = record.alts.get(picked - 1).ok_or_else(|| {
                RebaseError::BadAlleleIndex {
                    chrom: record.chrom.clone(),
                    pos: record.pos,
                    allele: picked,
                    alts: record.alts.len(),
                }
            })?;
            let length = alt.len() as u32;
            current.push(Region::Site {
                base_pos: cursor.base_pos,
                inf_pos: cursor.inf_pos,
                length,
                site_ref: record.reference.clone(),
                site_alt: alt.clone(),
            });
            cursor.base_pos += record.reference.len() as u32;
            cursor.inf_pos += length;
        } else {
            // inference kept the REF allele: the site is byte-identical in
            // both coordinate systems, so it folds into a non-variant region
            let span = record.reference.len() as u32;
            extend_non_variant(&mut current, &cursor, span);
            cursor.base_pos += span;
            cursor.inf_pos += span;
        }
    }

    let chrom = current_chrom.take().unwrap_or_default();
    push_trailing_region(&mut current, &cursor, chrom_length);
    map.insert(chrom, current);

    Ok(RegionIndex { map })
}

/// Grow the partition by `span` identical bases: extend the last region when
/// it is non-variant, append a fresh one otherwise.
fn extend_non_variant(regions: &mut Vec<Region>, cursor: &Cursor, span: u32) {
    match regions.last_mut() {
        Some(Region::NonVariant { length, .. }) => *length += span,
        _ => regions.push(Region::NonVariant {
            base_pos: cursor.base_pos,
            inf_pos: cursor.inf_pos,
            length: span,
        }),
    }
}

/// After the last record of a chromosome, cover the remainder of the
/// chromosome with a non-variant region. Past the last site the two
/// coordinate systems advance in lockstep, so the base cursor measures the
/// remaining span.
fn push_trailing_region(regions: &mut Vec<Region>, cursor: &Cursor, chrom_length: u32) {
    if cursor.base_pos <= chrom_length {
        regions.push(Region::NonVariant {
            base_pos: cursor.base_pos,
            inf_pos: cursor.inf_pos,
            length: chrom_length - cursor.base_pos + 1,
        });
    }
}
