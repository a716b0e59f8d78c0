//! Viewport visibility resolution for paragraph tracking.

/// Layout sample for one laid-out paragraph: its index and vertical offset
/// from the viewport top. The offset goes negative once the paragraph
/// scrolls past the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphOffset {
    pub index: u32,
    pub offset: f32,
}

impl ParagraphOffset {
    pub fn new(index: u32, offset: f32) -> Self {
        Self { index, offset }
    }
}

/// Pick the paragraph the reader is currently on.
///
/// Prefers the entry closest below the viewport top (smallest non-negative
/// offset). When every sampled paragraph has scrolled past, falls back to
/// the least-negative offset, the paragraph passed most recently. The
/// asymmetry keeps the reported index stable under partial-viewport
/// layouts; on equal offsets the earlier sample wins.
pub fn pick_top_most_index(entries: &[ParagraphOffset]) -> u32 {
    let mut below: Option<ParagraphOffset> = None;
    for entry in entries.iter().filter(|entry| entry.offset >= 0.0) {
        match below {
            Some(best) if best.offset <= entry.offset => {}
            _ => below = Some(*entry),
        }
    }
    if let Some(best) = below {
        return best.index;
    }

    let mut above: Option<ParagraphOffset> = None;
    for entry in entries {
        match above {
            Some(best) if best.offset >= entry.offset => {}
            _ => above = Some(*entry),
        }
    }
    above.map(|entry| entry.index).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(pairs: &[(u32, f32)]) -> Vec<ParagraphOffset> {
        pairs.iter().map(|&(index, offset)| ParagraphOffset::new(index, offset)).collect()
    }

    #[test]
    fn picks_smallest_non_negative_offset() {
        let entries = offsets(&[(0, -50.0), (1, 10.0), (2, 120.0)]);
        assert_eq!(pick_top_most_index(&entries), 1);
    }

    #[test]
    fn falls_back_to_least_negative_offset() {
        let entries = offsets(&[(0, -50.0), (1, -10.0)]);
        assert_eq!(pick_top_most_index(&entries), 1);
    }

    #[test]
    fn empty_layout_reports_first_paragraph() {
        assert_eq!(pick_top_most_index(&[]), 0);
    }

    #[test]
    fn zero_offset_counts_as_visible() {
        let entries = offsets(&[(3, 0.0), (4, 5.0)]);
        assert_eq!(pick_top_most_index(&entries), 3);
    }

    #[test]
    fn equal_offsets_keep_sample_order() {
        let entries = offsets(&[(7, 12.0), (2, 12.0)]);
        assert_eq!(pick_top_most_index(&entries), 7);
        let entries = offsets(&[(5, -3.0), (6, -3.0)]);
        assert_eq!(pick_top_most_index(&entries), 5);
    }
}
