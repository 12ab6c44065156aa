use rebars_core::models::Region;

///
/// Index of the region containing `pos`, a 1-based position in the
/// personalised reference.
///
/// Binary search for the left-most region starting strictly past `pos`,
/// then step back one; a query at or beyond the end of the list clamps to
/// the last region. The caller guarantees a non-empty partition starting at
/// `inf_pos = 1`, so every valid query lands inside some region.
///
pub fn locate(regions: &[Region], pos: u32) -> usize {
    debug_assert!(!regions.is_empty());
    let index = regions.partition_point(|region| region.inf_pos() <= pos);
    index.saturating_sub(1)
}
