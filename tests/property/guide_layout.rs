//! Guide segments are exhaustive, non-overlapping and maximal per level

use proptest::prelude::*;
use unitree::tree::IndentGuideBuilder;

proptest! {
    #[test]
    fn test_segments_cover_each_deeper_row_once(
        depths in prop::collection::vec(0usize..6, 0..80),
        offset in 0usize..1000,
    ) {
        let builder = IndentGuideBuilder::new(&depths).row_offset(offset);
        let segments: Vec<_> = builder.segments().collect();
        let max_depth = depths.iter().copied().max().unwrap_or(0);

        for level in 0..max_depth {
            for (i, &depth) in depths.iter().enumerate() {
                let covering = segments
                    .iter()
                    .filter(|s| s.depth == level && s.contains(i + offset))
                    .count();
                let expected = usize::from(depth > level);
                prop_assert_eq!(covering, expected, "level {} row {}", level, i);
            }
        }

        for segment in &segments {
            prop_assert!(segment.length > 0);
            let start = segment.start_row - offset;
            let end = start + segment.length;
            if start > 0 {
                prop_assert!(depths[start - 1] <= segment.depth);
            }
            if end < depths.len() {
                prop_assert!(depths[end] <= segment.depth);
            }
        }
    }

    #[test]
    fn test_starting_depth_skips_shallow_levels(
        depths in prop::collection::vec(0usize..6, 0..80),
        start in 0usize..4,
    ) {
        let all: Vec<_> = IndentGuideBuilder::new(&depths).segments().collect();
        let skipped: Vec<_> = IndentGuideBuilder::new(&depths)
            .starting_depth(start)
            .segments()
            .collect();
        let expected: Vec<_> = all.into_iter().filter(|s| s.depth >= start).collect();
        prop_assert_eq!(skipped, expected);
    }
}
