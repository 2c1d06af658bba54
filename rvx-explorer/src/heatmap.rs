//! Taxonomy heatmap grid builder
//!
//! Reshapes the flat aggregate rows of one dimension into the column layout
//! the heatmap renders:
//!
//! - Flat dimensions: a single row, one column per code of the book plus any
//!   unknown code present in the input. Absent codes keep their column as an
//!   empty placeholder so positions stay stable across filter changes.
//! - Hierarchical dimensions: one column per parent code, ascending, with the
//!   parent's present children stacked below it, ascending. Every column is
//!   padded at the bottom to the same height; columns are never compacted.
//!
//! A present child whose parent row is absent still gets its parent column,
//! with an empty header cell.

use rvx_common::Dimension;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::AggregateRow;

/// One grid column; `cells[0]` is the header (parent or flat code)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapColumn {
    pub key: u16,
    pub cells: Vec<Option<AggregateRow>>,
}

impl HeatmapColumn {
    pub fn header(&self) -> Option<&AggregateRow> {
        self.cells.first().and_then(Option::as_ref)
    }

    /// Empty cells below the last child
    pub fn padding(&self) -> usize {
        self.cells
            .iter()
            .rev()
            .take_while(|cell| cell.is_none())
            .count()
            .min(self.cells.len().saturating_sub(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapGrid {
    pub dimension: Dimension,
    pub columns: Vec<HeatmapColumn>,
    /// Cells per column (1 for flat dimensions)
    pub height: usize,
}

impl HeatmapGrid {
    pub fn build(dimension: Dimension, rows: &[AggregateRow]) -> Self {
        if dimension.is_hierarchical() {
            build_hierarchical(dimension, rows)
        } else {
            build_flat(dimension, rows)
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Cell at (`row`, `column`); `None` for empty or out-of-range cells
    pub fn cell(&self, row: usize, column: usize) -> Option<&AggregateRow> {
        self.columns
            .get(column)?
            .cells
            .get(row)?
            .as_ref()
    }

    /// Grid in row-major order
    pub fn rows(&self) -> Vec<Vec<Option<&AggregateRow>>> {
        (0..self.height)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| column.cells.get(row).and_then(Option::as_ref))
                    .collect()
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns
            .iter()
            .all(|column| column.cells.iter().all(Option::is_none))
    }
}

fn index_rows(rows: &[AggregateRow]) -> BTreeMap<u16, &AggregateRow> {
    // Last row wins on duplicate codes
    rows.iter().map(|row| (row.code, row)).collect()
}

fn build_flat(dimension: Dimension, rows: &[AggregateRow]) -> HeatmapGrid {
    let by_code = index_rows(rows);
    let codes: BTreeSet<u16> = dimension
        .codebook()
        .codes()
        .chain(by_code.keys().copied())
        .collect();

    let columns = codes
        .into_iter()
        .map(|code| HeatmapColumn {
            key: code,
            cells: vec![by_code.get(&code).map(|row| (*row).clone())],
        })
        .collect();

    HeatmapGrid {
        dimension,
        columns,
        height: 1,
    }
}

fn build_hierarchical(dimension: Dimension, rows: &[AggregateRow]) -> HeatmapGrid {
    let book = dimension.codebook();
    let by_code = index_rows(rows);

    let mut groups: BTreeMap<u16, BTreeSet<u16>> = BTreeMap::new();
    for &code in by_code.keys() {
        match book.parent_of(code) {
            Some(parent) => {
                groups.entry(parent).or_default().insert(code);
            }
            None => {
                groups.entry(code).or_default();
            }
        }
    }

    let height = 1 + groups.values().map(BTreeSet::len).max().unwrap_or(0);

    let columns = groups
        .into_iter()
        .map(|(parent, children)| {
            let mut cells = Vec::with_capacity(height);
            cells.push(by_code.get(&parent).map(|row| (*row).clone()));
            cells.extend(
                children
                    .iter()
                    .map(|child| by_code.get(child).map(|row| (*row).clone())),
            );
            cells.resize(height, None);
            HeatmapColumn { key: parent, cells }
        })
        .collect();

    HeatmapGrid {
        dimension,
        columns,
        height,
    }
}
