//! Rebasing variant calls from a personalised reference onto its base graph.
//!
//! After reads are mapped to a variation-aware reference graph and a haploid
//! personalised reference is inferred from one allele per variant site,
//! variant callers discover new calls in the personalised reference's
//! coordinates. This crate translates those calls back into the coordinate
//! space of the original graph, so they can be reported against the
//! reference everyone else uses.
//!
//! The pipeline has three stages:
//!
//! - [`build_region_index`] replays the inference decisions once per
//!   chromosome set, partitioning each chromosome of the personalised
//!   reference into [`Region`](rebars_core::models::Region)s.
//! - [`rebase_record`] maps a single call through that partition; the
//!   containing region is found with [`locate`].
//! - [`rebase_all`] wraps both with the optional sequence-consistency
//!   checks and the end-of-run skip report.
//!
//! ## Quick Start
//!
//! ```rust
//! use rebars_core::models::VariantRecord;
//! use rebars_rebase::{build_region_index, rebase_all};
//!
//! // the inference VCF: site TAT>G was applied at position 2 of a
//! // 7-base chromosome
//! let inference = vec![VariantRecord::new("chr1", 2, "TAT", &["G"]).with_genotype(1)];
//! let index = build_region_index(&inference, &[7]).unwrap();
//!
//! // a SNP discovered against the personalised reference
//! let discovered = vec![VariantRecord::new("chr1", 3, "C", &["G"])];
//! let outcome = rebase_all(&discovered, &index, None).unwrap();
//!
//! // position 3 of the personalised reference is position 5 of the graph
//! assert_eq!(outcome.records, vec![VariantRecord::new("chr1", 5, "C", &["G"])]);
//! ```

pub mod index;
pub mod locate;
pub mod rebase;
pub mod validate;

// re-export for cleaner imports
pub use index::{RegionIndex, build_region_index};
pub use locate::locate;
pub use rebase::rebase_record;
pub use validate::{RebaseOutcome, RebaseReport, SequenceChecks, rebase_all};
