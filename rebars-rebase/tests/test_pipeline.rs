//! Integration test for the full rebasing workflow: load the inference VCF,
//! the discovery VCF, both reference sequences and the chromosome-size
//! table from disk, rebase with checks enabled, and write the surviving
//! records back out under the discovery file's header.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use rebars_core::models::{VariantRecord, VariantSet};
use rebars_core::utils::{read_chrom_sizes, read_multi_fasta};
use rebars_rebase::{SequenceChecks, build_region_index, rebase_all};

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).expect("Failed to create fixture");
    write!(file, "{}", contents).expect("Failed to write fixture");
    path
}

/// base graph:    T TAT CGG T     A   ("TTATCGGTA", length 9)
/// personalised:  T G   CGG TCTGC A   ("TGCGGTCTGCA", length 11)
fn write_fixtures(dir: &Path) -> (PathBuf, PathBuf, PathBuf, PathBuf, PathBuf) {
    let base_fa = write_file(dir, "base.fa", ">chr1\nTTATCGGTA\n");
    let inferred_fa = write_file(dir, "inferred.fa", ">chr1\nTGCGG\nTCTGCA\n");
    let sizes = write_file(dir, "inferred_ref_size", "9\n");
    let inference_vcf = write_file(
        dir,
        "inference.vcf",
        "##fileformat=VCFv4.2\n\
         ##source=infer\n\
         #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tsample\n\
         chr1\t2\t.\tTAT\tG\t.\t.\t.\tGT\t1/1\n\
         chr1\t8\t.\tT\tTCTGC\t.\t.\t.\tGT\t1/1\n",
    );
    let discovery_vcf = write_file(
        dir,
        "discovery.vcf",
        "##fileformat=VCFv4.2\n\
         ##source=discovery-caller\n\
         #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
         chr1\t2\t.\tG\tTAT\t.\t.\t.\n\
         chr1\t3\t.\tC\tG\t.\t.\t.\n\
         chr1\t4\t.\tT\tA\t.\t.\t.\n\
         chr1\t9\t.\tG\tA\t.\t.\t.\n",
    );
    (base_fa, inferred_fa, sizes, inference_vcf, discovery_vcf)
}

#[test]
fn test_rebase_workflow_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let (base_fa, inferred_fa, sizes, inference_vcf, discovery_vcf) = write_fixtures(dir.path());

    let inference = VariantSet::try_from(inference_vcf.as_path()).expect("Failed to load inference VCF");
    let discovery = VariantSet::try_from(discovery_vcf.as_path()).expect("Failed to load discovery VCF");
    let chrom_sizes = read_chrom_sizes(&sizes).expect("Failed to load chromosome sizes");

    let checks = SequenceChecks {
        base: read_multi_fasta(&base_fa).expect("Failed to load base reference"),
        inferred: read_multi_fasta(&inferred_fa).expect("Failed to load personalised reference"),
    };

    let index = build_region_index(&inference.records, &chrom_sizes).expect("Failed to build index");
    let outcome = rebase_all(&discovery.records, &index, Some(&checks)).expect("Rebasing failed");

    // the record at POS 2 reversed the inference decision (dropped), the
    // record at POS 4 disagrees with the personalised reference (unplaced),
    // the remaining two rebase cleanly
    assert_eq!(
        outcome.records,
        vec![
            VariantRecord::new("chr1", 5, "C", &["G"]),
            VariantRecord::new("chr1", 8, "T", &["TCTAC"]),
        ]
    );
    assert_eq!(outcome.report.unplaced.len(), 1);
    assert!(outcome.report.discordant.is_empty());

    // write the survivors under the discovery file's header, then make sure
    // the file round-trips
    let out_path = dir.path().join("rebased.vcf");
    let rebased_set = VariantSet::new(outcome.records.clone()).with_header_from(&discovery);
    rebased_set.to_vcf(&out_path).expect("Failed to write rebased VCF");

    let reread = VariantSet::try_from(out_path.as_path()).expect("Failed to re-read rebased VCF");
    assert_eq!(reread.records, outcome.records);
    assert!(
        reread
            .header
            .as_deref()
            .unwrap()
            .contains("##source=discovery-caller")
    );
}

#[test]
fn test_rebase_workflow_without_checks_keeps_misplaced_calls_out_of_buckets() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, sizes, inference_vcf, discovery_vcf) = write_fixtures(dir.path());

    let inference = VariantSet::try_from(inference_vcf.as_path()).unwrap();
    let discovery = VariantSet::try_from(discovery_vcf.as_path()).unwrap();
    let chrom_sizes = read_chrom_sizes(&sizes).unwrap();

    let index = build_region_index(&inference.records, &chrom_sizes).unwrap();
    let outcome = rebase_all(&discovery.records, &index, None).unwrap();

    // without sequences to check against, the misplaced call at POS 4 is
    // rebased like any other; only the degenerate call is dropped
    assert_eq!(outcome.records.len(), 3);
    assert!(outcome.report.is_clean());
}
