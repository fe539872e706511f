//! Height model for nested bullet lists.
//!
//! Each nesting level indents by [`BULLET_INDENT`] and every item reserves
//! [`BULLET_MARKER_WIDTH`] for its marker. An item's text wraps in what
//! remains. When nothing remains the item counts as one line at its own
//! size and its children are not visited.

use serde::Serialize;

use crate::font::GlyphMetrics;
use crate::model::BulletItem;
use crate::text::{lines_height, TextMeasurer};

/// Indent per nesting level, in inches.
pub const BULLET_INDENT: f64 = 0.5;
/// Width reserved for the bullet marker, in inches.
pub const BULLET_MARKER_WIDTH: f64 = 0.25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletMeasure {
    /// Total height in inches.
    pub height: f64,
    /// Items visited, at every level.
    pub item_count: usize,
    pub line_count: usize,
    /// Deepest level visited, 0 for top-level items.
    pub max_depth: usize,
}

/// Measure `items` with `font_size` as the ambient size. Items with their
/// own font size use it for themselves only.
pub fn measure_bullets(
    measurer: &TextMeasurer,
    metrics: &dyn GlyphMetrics,
    items: &[BulletItem],
    font_size: f64,
    max_width: f64,
    line_spacing: f64,
) -> BulletMeasure {
    let mut result = BulletMeasure::default();
    let mut stack: Vec<(&BulletItem, usize)> = items.iter().rev().map(|item| (item, 0)).collect();

    while let Some((item, level)) = stack.pop() {
        let size = item.style.font_size.unwrap_or(font_size);
        let spacing = item.style.line_spacing.unwrap_or(line_spacing);
        let available = max_width - (level as f64 * BULLET_INDENT + BULLET_MARKER_WIDTH);

        result.item_count += 1;
        result.max_depth = result.max_depth.max(level);

        if available <= 0.0 {
            result.height += lines_height(1, size, spacing);
            result.line_count += 1;
            continue;
        }

        let measure = measurer.measure(metrics, &item.text, size, available, spacing);
        result.height += measure.height;
        result.line_count += measure.line_count;
        stack.extend(item.children.iter().rev().map(|child| (child, level + 1)));
    }

    result
}
