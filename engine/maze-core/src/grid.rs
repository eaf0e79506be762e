//! Rectangular grids of element values.
//!
//! [`Grid`] is the exclusively owned, editable form; [`FrozenGrid`] is an
//! immutable slice that clones share. Both are stored row-major.

use std::sync::Arc;

use crate::error::{MazeError, Result};

/// Read access shared by both grid representations
pub trait GridView {
    fn height(&self) -> usize;

    fn width(&self) -> usize;

    /// Row-major cell values
    fn as_slice(&self) -> &[i64];

    fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    fn get(&self, row: usize, col: usize) -> Option<i64> {
        if row < self.height() && col < self.width() {
            Some(self.as_slice()[row * self.width() + col])
        } else {
            None
        }
    }

    fn row(&self, row: usize) -> Option<&[i64]> {
        if row < self.height() {
            let start = row * self.width();
            Some(&self.as_slice()[start..start + self.width()])
        } else {
            None
        }
    }

    fn rows(&self) -> std::slice::ChunksExact<'_, i64> {
        self.as_slice().chunks_exact(self.width().max(1))
    }

    fn to_rows(&self) -> Vec<Vec<i64>> {
        self.rows().map(<[i64]>::to_vec).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenGrid {
    height: usize,
    width: usize,
    cells: Arc<[i64]>,
}

impl Grid {
    /// Build a grid from rows, which must be non-empty and of equal length.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(MazeError::MalformedGrid {
                path: "grid".into(),
                reason: "grid must have at least one row and one column".into(),
            });
        }
        let mut cells = Vec::with_capacity(height * width);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(MazeError::RaggedGrid {
                    path: "grid".into(),
                    row: index,
                    expected: width,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// A `height` x `width` grid with every cell set to `value`.
    pub fn filled(height: usize, width: usize, value: i64) -> Self {
        Self {
            height,
            width,
            cells: vec![value; height * width],
        }
    }

    /// Bounds-checked in-place write.
    pub fn set(&mut self, row: usize, col: usize, value: i64) -> Result<()> {
        if row >= self.height || col >= self.width {
            return Err(MazeError::IndexOutOfRange {
                context: "grid".into(),
                index: format!("({row}, {col})"),
                bounds: format!("{} x {}", self.height, self.width),
            });
        }
        self.cells[row * self.width + col] = value;
        Ok(())
    }

    pub fn freeze(&self) -> FrozenGrid {
        FrozenGrid {
            height: self.height,
            width: self.width,
            cells: Arc::from(self.cells.as_slice()),
        }
    }
}

impl FrozenGrid {
    pub fn thaw(&self) -> Grid {
        Grid {
            height: self.height,
            width: self.width,
            cells: self.cells.to_vec(),
        }
    }
}

impl GridView for Grid {
    fn height(&self) -> usize {
        self.height
    }

    fn width(&self) -> usize {
        self.width
    }

    fn as_slice(&self) -> &[i64] {
        &self.cells
    }
}

impl GridView for FrozenGrid {
    fn height(&self) -> usize {
        self.height
    }

    fn width(&self) -> usize {
        self.width
    }

    fn as_slice(&self) -> &[i64] {
        &self.cells
    }
}
