//! Row-count height estimate for tables.
//!
//! Cells are not wrapped. Every row is one line at the cell font size
//! (the element size minus [`TABLE_FONT_OFFSET`], never below 1pt) plus a
//! fixed padding.

use serde::Serialize;

use crate::model::TableContent;
use crate::text::POINTS_PER_INCH;

/// Points subtracted from the element size for cell text.
pub const TABLE_FONT_OFFSET: f64 = 4.0;
/// Vertical padding per row, in inches.
pub const TABLE_ROW_PADDING: f64 = 0.1;

const MIN_CELL_FONT_SIZE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMeasure {
    pub height: f64,
    pub row_count: usize,
    pub cell_font_size: f64,
}

pub fn cell_font_size(font_size: f64) -> f64 {
    (font_size - TABLE_FONT_OFFSET).max(MIN_CELL_FONT_SIZE)
}

/// Estimated height in inches of `row_count` rows at element size `font_size`.
pub fn table_height(row_count: usize, font_size: f64, line_spacing: f64) -> f64 {
    let row = cell_font_size(font_size) * line_spacing / POINTS_PER_INCH + TABLE_ROW_PADDING;
    row_count as f64 * row
}

pub fn measure_table(table: &TableContent, font_size: f64, line_spacing: f64) -> TableMeasure {
    let row_count = table.row_count();
    TableMeasure {
        height: table_height(row_count, font_size, line_spacing),
        row_count,
        cell_font_size: cell_font_size(font_size),
    }
}
