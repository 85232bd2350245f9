//! Viewport
//!
//! Fixed-height row windowing over the visible tree: which rows to mount for
//! a scroll offset, and the indent guides for just those rows.

use crate::tree::{GuideSegment, IndentGuideBuilder, Row, TreeSource, TreeWalker};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Viewport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Row height in pixels
    #[serde(default = "default_row_height")]
    pub row_height: u32,

    /// Visible height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Extra rows mounted above and below the visible range
    #[serde(default = "default_overscan")]
    pub overscan: usize,
}

fn default_row_height() -> u32 {
    30
}

fn default_height() -> u32 {
    600
}

fn default_overscan() -> usize {
    5
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            row_height: default_row_height(),
            height: default_height(),
            overscan: default_overscan(),
        }
    }
}

impl ViewportConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.row_height == 0 {
            return Err("row_height must be greater than 0".to_string());
        }
        if self.height == 0 {
            return Err("height must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub row_height: u32,
    pub height: u32,
    pub overscan: usize,
}

impl From<&ViewportConfig> for Viewport {
    fn from(config: &ViewportConfig) -> Self {
        Self {
            row_height: config.row_height,
            height: config.height,
            overscan: config.overscan,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from(&ViewportConfig::default())
    }
}

impl Viewport {
    /// Rows to mount for `scroll_offset`, clamped to `total_rows`.
    /// Empty when there are no rows or the row height is zero.
    pub fn mounted_range(&self, total_rows: usize, scroll_offset: u32) -> Range<usize> {
        if total_rows == 0 || self.row_height == 0 {
            return 0..0;
        }
        let row_height = self.row_height as usize;
        let first_visible = scroll_offset as usize / row_height;
        let visible = (self.height as usize).div_ceil(row_height) + 1;

        let start = first_visible.saturating_sub(self.overscan).min(total_rows);
        let end = first_visible
            .saturating_add(visible)
            .saturating_add(self.overscan)
            .min(total_rows);
        start..end
    }

    /// Walk `source` and lay out the mounted window
    pub fn frame<S>(&self, source: &S, scroll_offset: u32) -> ViewportFrame
    where
        S: TreeSource + ?Sized,
    {
        let mut rows: Vec<Row> = TreeWalker::rows(source).collect();
        let total_rows = rows.len();
        let range = self.mounted_range(total_rows, scroll_offset);

        rows.truncate(range.end);
        let rows = rows.split_off(range.start);

        let depths: Vec<usize> = rows.iter().map(|row| row.depth).collect();
        let guides = IndentGuideBuilder::new(&depths)
            .row_offset(range.start)
            .segments()
            .collect();

        ViewportFrame {
            rows,
            first_row: range.start,
            guides,
            total_rows,
            row_height: self.row_height,
        }
    }
}

/// Mounted rows and their guides
#[derive(Debug, Clone)]
pub struct ViewportFrame {
    /// Mounted rows, in display order
    pub rows: Vec<Row>,
    /// Index of `rows[0]` in the whole visible list
    pub first_row: usize,
    /// Guides for the mounted rows, in whole-list row indices
    pub guides: Vec<GuideSegment>,
    pub total_rows: usize,
    pub row_height: u32,
}

impl ViewportFrame {
    pub fn is_empty(&self) -> bool {
        self.total_rows == 0
    }

    /// Scrollable height of the whole list in pixels
    pub fn content_height(&self) -> u64 {
        self.total_rows as u64 * u64::from(self.row_height)
    }

    /// Top offset of whole-list row `index` in pixels
    pub fn row_top(&self, index: usize) -> u64 {
        index as u64 * u64::from(self.row_height)
    }

    /// Mounted rows paired with their whole-list index
    pub fn indexed_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows
            .iter()
            .enumerate()
            .map(move |(i, row)| (self.first_row + i, row))
    }

    /// Guide levels passing through whole-list row `index`
    pub fn guide_levels_at(&self, index: usize) -> Vec<usize> {
        self.guides
            .iter()
            .filter(|segment| segment.contains(index))
            .map(|segment| segment.depth)
            .collect()
    }
}
