use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

///
/// One span of the personalised (inferred) reference, annotated with how it
/// relates to the base graph it was inferred from.
///
/// A chromosome's ordered list of regions is a partition of its personalised
/// reference: ascending in `inf_pos`, gap-free, non-overlapping, starting at
/// `inf_pos = 1`. All positions are 1-based.
///
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Region {
    /// A span that is byte-identical between the base graph and the
    /// personalised reference.
    NonVariant {
        base_pos: u32,
        inf_pos: u32,
        length: u32,
    },
    /// A variant site where inference substituted `site_alt` for `site_ref`.
    /// `length` is the length of `site_alt`, i.e. the span this site
    /// occupies in the personalised reference.
    Site {
        base_pos: u32,
        inf_pos: u32,
        length: u32,
        site_ref: String,
        site_alt: String,
    },
}

impl Region {
    /// Start of the span in base-graph coordinates.
    pub fn base_pos(&self) -> u32 {
        match self {
            Region::NonVariant { base_pos, .. } | Region::Site { base_pos, .. } => *base_pos,
        }
    }

    /// Start of the span in personalised-reference coordinates.
    pub fn inf_pos(&self) -> u32 {
        match self {
            Region::NonVariant { inf_pos, .. } | Region::Site { inf_pos, .. } => *inf_pos,
        }
    }

    /// Length of the span in the personalised reference.
    pub fn length(&self) -> u32 {
        match self {
            Region::NonVariant { length, .. } | Region::Site { length, .. } => *length,
        }
    }

    /// One past the last personalised-reference position of the span.
    pub fn end(&self) -> u32 {
        self.inf_pos() + self.length()
    }

    pub fn is_site(&self) -> bool {
        matches!(self, Region::Site { .. })
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::NonVariant {
                base_pos,
                inf_pos,
                length,
            } => write!(f, "non-variant base:{} inf:{} len:{}", base_pos, inf_pos, length),
            Region::Site {
                base_pos,
                inf_pos,
                length,
                site_ref,
                site_alt,
            } => write!(
                f,
                "site base:{} inf:{} len:{} {}>{}",
                base_pos, inf_pos, length, site_ref, site_alt
            ),
        }
    }
}
