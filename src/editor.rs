//! # Table Editor
//!
//! Row and column insertion for document tables. In-place splicing is not a
//! primitive of the table markup, so insertion rebuilds the table: a blank
//! grid of the target dimensions is filled by remapping every destination
//! cell back to a source cell (or marking it as inserted), then swapped into
//! the body in place of the original. O(new_rows * new_cols) cell copies.

use crate::document::Document;
use crate::document::Table;
use crate::error::TableditError;
use std::fmt;
use thiserror::Error;

/// Errors specific to table editing operations
#[derive(Error, Debug)]
pub enum EditError {
    /// The addressed body block is not a table; a contract violation under
    /// normal call discipline
    #[error("Original table not found at body block {0}")]
    TableNotFound(usize),

    /// Row insertion position outside `1..=rows + 1`
    #[error("Row position {position} out of range 1..={limit}")]
    RowOutOfRange { position: usize, limit: usize },

    /// Column insertion position outside `1..=cols + 1`
    #[error("Column position {position} out of range 1..={limit}")]
    ColumnOutOfRange { position: usize, limit: usize },
}

/// An optional 1-based insertion position along one axis.
///
/// `At(k)` means the new row/column becomes the k-th of the resulting table;
/// `k = len + 1` appends at the end. An explicit sum type keeps the cell
/// remapping branch exhaustive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Position {
    /// Leave this axis untouched
    #[default]
    Absent,
    /// Insert before the existing 1-based position, or append at `len + 1`
    At(usize),
}

impl Position {
    /// Converts a 1-based position to a 0-based insertion index
    fn index(self) -> Option<usize> {
        match self {
            Position::Absent => None,
            Position::At(position) => Some(position - 1),
        }
    }

    fn is_absent(self) -> bool {
        matches!(self, Position::Absent)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Absent => write!(f, "-"),
            Position::At(position) => write!(f, "{}", position),
        }
    }
}

impl From<Option<usize>> for Position {
    fn from(position: Option<usize>) -> Position {
        match position {
            Some(position) => Position::At(position),
            None => Position::Absent,
        }
    }
}

/// Where to insert a new row and/or column into one table.
/// Transient, constructed per table; both positions absent means no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InsertionRequest {
    pub row: Position,
    pub col: Position,
}

impl InsertionRequest {
    /// Builds a request from optional 1-based positions
    pub fn new(row: Option<usize>, col: Option<usize>) -> InsertionRequest {
        InsertionRequest {
            row: row.into(),
            col: col.into(),
        }
    }

    /// True when neither axis has an insertion position
    pub fn is_empty(&self) -> bool {
        self.row.is_absent() && self.col.is_absent()
    }
}

/// Inserts a new row and/or column into the table at the given body block.
///
/// Rebuilds the table at the target dimensions: the inserted row gets
/// placeholder text `"New row N"` (N the 1-based column number), the inserted
/// column `"New column N"` (N the 1-based row number), the row placeholder
/// winning at their intersection; every other cell copies its text from the
/// remapped source coordinate. The rebuilt table gets the standard grid
/// border style and replaces the original in the body.
///
/// # Arguments
/// * `document` - Document whose body holds the table
/// * `block_index` - Body block index of the table to transform
/// * `request` - 1-based insertion positions, either or both axes
///
/// # Returns
/// * `Ok(true)` if the table was rebuilt, `Ok(false)` for an empty request
///   (the document is left completely untouched)
///
/// # Errors
/// * [`EditError::TableNotFound`] if the block at `block_index` is not a table
/// * [`EditError::RowOutOfRange`] / [`EditError::ColumnOutOfRange`] for
///   positions outside `1..=len + 1`
pub fn insert_row_and_column(
    document: &mut Document,
    block_index: usize,
    request: InsertionRequest,
) -> Result<bool, TableditError> {
    if request.is_empty() {
        return Ok(false);
    }

    let original = document
        .table_at(block_index)
        .ok_or(EditError::TableNotFound(block_index))?;
    let rows = original.rows();
    let cols = original.cols();

    if let Position::At(position) = request.row {
        if position < 1 || position > rows + 1 {
            Err(EditError::RowOutOfRange { position, limit: rows + 1 })?;
        }
    }
    if let Position::At(position) = request.col {
        if position < 1 || position > cols + 1 {
            Err(EditError::ColumnOutOfRange { position, limit: cols + 1 })?;
        }
    }

    let row_idx = request.row.index();
    let col_idx = request.col.index();
    let new_rows = rows + row_idx.is_some() as usize;
    let new_cols = cols + col_idx.is_some() as usize;

    let mut table = Table::blank(new_rows, new_cols);
    for i in 0..new_rows {
        for j in 0..new_cols {
            if row_idx == Some(i) {
                table.set_text(i, j, format!("New row {}", j + 1));
            } else if col_idx == Some(j) {
                table.set_text(i, j, format!("New column {}", i + 1));
            } else {
                let src_i = match row_idx {
                    Some(idx) if i > idx => i - 1,
                    _ => i,
                };
                let src_j = match col_idx {
                    Some(idx) if j > idx => j - 1,
                    _ => j,
                };
                // out-of-range sources cannot occur by the dimension
                // arithmetic above; the cell then simply stays empty
                if let Some(text) = original.text(src_i, src_j) {
                    table.set_text(i, j, text);
                }
            }
        }
    }
    table.apply_grid_borders();

    document.replace_table_at(block_index, table)?;
    tracing::debug!(block_index, new_rows, new_cols, "table rebuilt");
    Ok(true)
}
