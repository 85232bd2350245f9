//! Indent guide layout
//!
//! A guide at level `d` is a vertical line spanning a maximal run of
//! consecutive rows deeper than `d`. Computed from row depths alone, in one
//! linear scan per level.

use crate::tree::Row;
use std::borrow::Cow;

/// One vertical guide: `length` rows starting at `start_row`, drawn at
/// indentation level `depth`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuideSegment {
    pub depth: usize,
    pub start_row: usize,
    pub length: usize,
}

impl GuideSegment {
    /// One past the last covered row
    pub fn end_row(&self) -> usize {
        self.start_row + self.length
    }

    pub fn contains(&self, row: usize) -> bool {
        row >= self.start_row && row < self.end_row()
    }
}

/// Builds guide segments for a window of row depths.
///
/// Levels below `starting_depth` are skipped; `row_offset` shifts reported
/// row indices so a window can be laid out in whole-list coordinates.
#[derive(Debug, Clone)]
pub struct IndentGuideBuilder<'a> {
    depths: Cow<'a, [usize]>,
    starting_depth: usize,
    row_offset: usize,
}

impl<'a> IndentGuideBuilder<'a> {
    pub fn new(depths: &'a [usize]) -> Self {
        Self {
            depths: Cow::Borrowed(depths),
            starting_depth: 0,
            row_offset: 0,
        }
    }

    pub fn from_rows(rows: &[Row]) -> IndentGuideBuilder<'static> {
        IndentGuideBuilder {
            depths: Cow::Owned(rows.iter().map(|row| row.depth).collect()),
            starting_depth: 0,
            row_offset: 0,
        }
    }

    pub fn starting_depth(mut self, depth: usize) -> Self {
        self.starting_depth = depth;
        self
    }

    pub fn row_offset(mut self, offset: usize) -> Self {
        self.row_offset = offset;
        self
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.depths.iter().copied().max()
    }

    /// All segments, ordered by level then by start row
    pub fn segments(&self) -> GuideSegments<'_> {
        GuideSegments {
            depths: &self.depths,
            level: self.starting_depth,
            end_level: self.max_depth().unwrap_or(0),
            position: 0,
            row_offset: self.row_offset,
        }
    }

    /// Levels whose guides pass through window row `index`
    pub fn for_row(&self, index: usize) -> std::ops::Range<usize> {
        match self.depths.get(index) {
            Some(&depth) if depth > self.starting_depth => self.starting_depth..depth,
            _ => 0..0,
        }
    }
}

/// Iterator over [`GuideSegment`]s
#[derive(Debug, Clone)]
pub struct GuideSegments<'a> {
    depths: &'a [usize],
    level: usize,
    end_level: usize,
    position: usize,
    row_offset: usize,
}

impl Iterator for GuideSegments<'_> {
    type Item = GuideSegment;

    fn next(&mut self) -> Option<GuideSegment> {
        while self.level < self.end_level {
            let level = self.level;
            let rest = &self.depths[self.position..];

            let Some(skip) = rest.iter().position(|&d| d > level) else {
                self.level += 1;
                self.position = 0;
                continue;
            };
            let start = self.position + skip;
            let length = self.depths[start..]
                .iter()
                .take_while(|&&d| d > level)
                .count();
            self.position = start + length;

            return Some(GuideSegment {
                depth: level,
                start_row: start + self.row_offset,
                length,
            });
        }
        None
    }
}
