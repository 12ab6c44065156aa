//! Mapping one discovered variant call back onto base-graph coordinates.
//!
//! The discovered REF sequence is walked forward through the chromosome's
//! region partition. Non-variant regions contribute the record's own REF
//! bases (the two coordinate systems agree there); site regions contribute
//! the site's full base-graph REF. When the call starts or ends partway
//! through a site, the uncovered flanks of the site's inferred ALT are
//! spliced onto the call's ALT, preserving the variation the inference step
//! already established around the new call.

use rebars_core::RebaseError;
use rebars_core::models::{Region, VariantRecord};

use crate::locate::locate;

///
/// Express a discovery-stage variant call in base-graph coordinates.
///
/// Only the first ALT allele is considered; discovery callers are haploid
/// at this stage. The result is a fresh record, the input is untouched. A
/// result whose REF equals its ALT is a valid outcome here; deciding to
/// drop such degenerate calls is the orchestration layer's job.
///
/// # Errors
///
/// A record with no ALT allele is malformed. A REF walk that cannot be
/// completed within the partition signals a broken region index and is
/// fatal; it cannot be triggered by well-formed input.
///
pub fn rebase_record(
    record: &VariantRecord,
    regions: &[Region],
) -> Result<VariantRecord, RebaseError> {
    let mut region_index = locate(regions, record.pos);
    let first = &regions[region_index];

    let ref_length = record.reference.len();
    let mut rebased_ref = String::new();
    let mut rebased_alt = record
        .alts
        .first()
        .cloned()
        .ok_or_else(|| {
            RebaseError::MalformedRecord(format!(
                "record {}:{} has no ALT allele",
                record.chrom, record.pos
            ))
        })?;

    // Rebase the position straight away. A record starting inside a site
    // (strictly past its start) rebases to the site's start, and the part
    // of the inferred ALT it skips over is spliced onto the front of the
    // working ALT. A record starting at the site boundary takes the same
    // branch with an empty splice.
    let rebased_pos = match first {
        Region::Site {
            base_pos,
            inf_pos,
            site_alt,
            ..
        } => {
            // a query past the end of the partition clamps to the last
            // region; starting beyond the site's span means the record
            // does not lie on the personalised reference at all
            if record.pos >= first.end() {
                return Err(consistency_error(record, 0));
            }
            if record.pos > *inf_pos {
                let inset = (record.pos - inf_pos) as usize;
                rebased_alt.insert_str(0, &site_alt[..inset]);
            }
            *base_pos
        }
        Region::NonVariant {
            base_pos, inf_pos, ..
        } => base_pos + (record.pos - inf_pos),
    };

    // Walk regions until the whole of the record's REF is consumed. The
    // amount one region can consume is whatever of its span lies at or
    // after the current consumption point.
    let mut consumed: usize = 0;
    let end_region = loop {
        let region = regions
            .get(region_index)
            .ok_or_else(|| consistency_error(record, consumed))?;

        let offset = (record.pos as usize + consumed).saturating_sub(region.inf_pos() as usize);
        let consumable = (region.length() as usize).saturating_sub(offset);
        let remaining = ref_length - consumed;
        let to_consume = consumable.min(remaining);

        match region {
            // the whole base-graph REF of the site, however much of its
            // inferred ALT the call actually overlaps
            Region::Site { site_ref, .. } => rebased_ref.push_str(site_ref),
            // non-variant spans are byte-identical across coordinate
            // systems, so the record's own REF supplies the bases
            Region::NonVariant { .. } => {
                rebased_ref.push_str(&record.reference[consumed..consumed + to_consume]);
            }
        }
        consumed += to_consume;

        if consumable >= remaining {
            break region;
        }
        region_index += 1;
    };

    if consumed != ref_length {
        return Err(consistency_error(record, consumed));
    }

    // A call ending partway through a site leaves a tail of the site's
    // inferred ALT uncovered; splice it onto the working ALT.
    if let Region::Site {
        inf_pos,
        length,
        site_alt,
        ..
    } = end_region
    {
        let walk_end = record.pos as usize + consumed;
        let region_end = (inf_pos + length) as usize;
        if walk_end < region_end {
            let tail = region_end - walk_end;
            rebased_alt.push_str(&site_alt[site_alt.len() - tail..]);
        }
    }

    Ok(VariantRecord {
        chrom: record.chrom.clone(),
        pos: rebased_pos,
        reference: rebased_ref,
        alts: vec![rebased_alt],
        genotype: None,
    })
}

fn consistency_error(record: &VariantRecord, consumed: usize) -> RebaseError {
    RebaseError::InternalConsistency {
        chrom: record.chrom.clone(),
        pos: record.pos,
        consumed,
        expected: record.reference.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::index::build_region_index;

    fn regions_for(records: &[VariantRecord], chrom_length: u32) -> Vec<Region> {
        build_region_index(records, &[chrom_length])
            .unwrap()
            .get("chr1")
            .unwrap()
            .to_vec()
    }

    #[rstest]
    fn test_snp_in_non_variant_region() {
        // base sequence:      T TAT CGG
        // personalised:       T G   CGG
        let regions = regions_for(
            &[VariantRecord::new("chr1", 2, "TAT", &["G"]).with_genotype(1)],
            5,
        );

        let discovered = VariantRecord::new("chr1", 3, "C", &["G"]);
        let rebased = rebase_record(&discovered, &regions).unwrap();

        assert_eq!(rebased, VariantRecord::new("chr1", 5, "C", &["G"]));
    }

    #[rstest]
    fn test_starts_in_non_variant_ends_in_site() {
        let regions = regions_for(
            &[VariantRecord::new("chr1", 2, "TAT", &["G"]).with_genotype(1)],
            7,
        );

        let discovered = VariantRecord::new("chr1", 1, "TG", &["TAA"]);
        let rebased = rebase_record(&discovered, &regions).unwrap();

        assert_eq!(rebased, VariantRecord::new("chr1", 1, "TTAT", &["TAA"]));
    }

    #[rstest]
    fn test_call_spanning_non_variant_site_non_variant() {
        // the rebased REF must stitch together all three crossed regions
        let regions = regions_for(
            &[VariantRecord::new("chr1", 2, "TAT", &["G"]).with_genotype(1)],
            7,
        );

        let discovered = VariantRecord::new("chr1", 1, "TGCG", &["GGCT"]);
        let rebased = rebase_record(&discovered, &regions).unwrap();

        assert_eq!(rebased, VariantRecord::new("chr1", 1, "TTATCG", &["GGCT"]));
    }

    #[rstest]
    fn test_snp_on_top_of_insertion_splices_flanking_alt() {
        // base sequence:      T TAT CGG T     A
        // personalised:       T G   CGG TCTGC A
        let regions = regions_for(
            &[
                VariantRecord::new("chr1", 2, "TAT", &["G"]).with_genotype(1),
                VariantRecord::new("chr1", 8, "T", &["TCTGC"]).with_genotype(1),
            ],
            9,
        );

        let discovered = VariantRecord::new("chr1", 9, "G", &["A"]);
        let rebased = rebase_record(&discovered, &regions).unwrap();

        assert_eq!(rebased, VariantRecord::new("chr1", 8, "T", &["TCTAC"]));
    }

    #[rstest]
    fn test_deletion_on_top_of_deletion_elongates_alt() {
        // base sequence:      CAA C GCTA CAA
        // personalised:       C   C GAT  CAA
        let regions = regions_for(
            &[
                VariantRecord::new("chr1", 1, "CAA", &["C"]).with_genotype(1),
                VariantRecord::new("chr1", 5, "GCTA", &["GAT"]).with_genotype(1),
            ],
            11,
        );

        let discovered = VariantRecord::new("chr1", 4, "ATC", &["A"]);
        let rebased = rebase_record(&discovered, &regions).unwrap();

        assert_eq!(rebased, VariantRecord::new("chr1", 5, "GCTAC", &["GA"]));
    }

    #[rstest]
    fn test_call_at_site_start_takes_site_branch() {
        // a tie at the site boundary rebases to the site start with no
        // prefix splice
        let regions = regions_for(
            &[VariantRecord::new("chr1", 2, "TAT", &["GCCAC"]).with_genotype(1)],
            7,
        );

        let discovered = VariantRecord::new("chr1", 2, "GC", &["GA"]);
        let rebased = rebase_record(&discovered, &regions).unwrap();

        assert_eq!(rebased.pos, 2);
        assert_eq!(rebased.reference, "TAT");
        // the three uncovered ALT bases are spliced onto the tail
        assert_eq!(rebased.alts, vec!["GACAC".to_string()]);
    }

    #[rstest]
    fn test_record_without_alt_is_malformed() {
        let regions = regions_for(
            &[VariantRecord::new("chr1", 2, "TAT", &["G"]).with_genotype(1)],
            7,
        );

        let discovered = VariantRecord::new("chr1", 3, "C", &[]);
        let result = rebase_record(&discovered, &regions);
        assert!(matches!(result, Err(RebaseError::MalformedRecord(_))));
    }

    #[rstest]
    fn test_pos_beyond_trailing_site_is_fatal() {
        // the last inference site's REF runs to the chromosome end, so the
        // partition is a single Site region; a call positioned past the
        // personalised reference clamps onto it and must error, not panic
        let regions = regions_for(
            &[VariantRecord::new("chr1", 1, "TAT", &["G"]).with_genotype(1)],
            3,
        );
        assert_eq!(regions.len(), 1);

        let discovered = VariantRecord::new("chr1", 3, "T", &["A"]);
        let result = rebase_record(&discovered, &regions);
        assert!(matches!(result, Err(RebaseError::InternalConsistency { .. })));
    }

    #[rstest]
    fn test_walk_beyond_partition_is_fatal() {
        // a REF longer than what remains of the partition breaks the walk
        let regions = regions_for(
            &[VariantRecord::new("chr1", 2, "TAT", &["G"]).with_genotype(1)],
            5,
        );

        let discovered = VariantRecord::new("chr1", 4, "CGGTTTT", &["C"]);
        let result = rebase_record(&discovered, &regions);
        assert!(matches!(result, Err(RebaseError::InternalConsistency { .. })));
    }
}
