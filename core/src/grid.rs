//! Double-buffered N-dimensional cell storage.
//!
//! Both generations live in flat contiguous buffers addressed through a
//! stride descriptor, so committing a step is a buffer exchange rather than
//! a copy. The minimum coordinate is always 0 along all axes.

use std::fmt;

use itertools::Itertools;

use crate::cell::Cell;
use crate::dim::Dim;
use crate::error::{CaError, CaResult};
use crate::ndvec::UVec;

/// Converts a `UVec` position into a "flattened" `usize` buffer index for a
/// grid of the given size.
///
/// Axis `X` varies slowest and the last active axis fastest (row-major),
/// matching the canonical enumeration order used everywhere else.
///
/// # Panics
///
/// Panics if `pos` is outside the grid; a custom rule that relocates a cell
/// out of the lattice trips this.
#[inline]
pub fn flatten_idx<D: Dim>(size: UVec<D>, pos: UVec<D>) -> usize {
    let mut idx = 0;
    for &ax in D::axes() {
        assert!(
            pos[ax] < size[ax],
            "position {} is outside the {} grid",
            pos,
            size
        );
        idx = idx * size[ax] + pos[ax];
    }
    idx
}

/// Converts a "flattened" `usize` buffer index into a `UVec` position for a
/// grid of the given size.
#[inline]
pub fn unflatten_idx<D: Dim>(size: UVec<D>, mut idx: usize) -> UVec<D> {
    debug_assert!(idx < size.product());
    let mut pos = UVec::origin();
    for &ax in D::axes().iter().rev() {
        pos[ax] = idx % size[ax];
        idx /= size[ax];
    }
    pos
}

/// `D`-dimensional lattice of cells of type `T`, holding the readable
/// current generation and the writable next generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T, D: Dim> {
    size: UVec<D>,
    cells: Box<[T]>,
    next: Box<[T]>,
}

impl<T: Cell, D: Dim> Grid<T, D> {
    /// Allocates both generations, with every cell set to the default value
    /// carrying `fill_state`.
    ///
    /// Allocation failure is reported as an error rather than an abort.
    pub fn alloc(size: UVec<D>, fill_state: u32) -> CaResult<Self> {
        let len = size.product();
        let mut fill = T::default();
        fill.set_state(fill_state);
        let cells = alloc_buffer(len, &fill)?;
        let next = alloc_buffer(len, &fill)?;
        Ok(Self { size, cells, next })
    }

    /// Returns the size of the grid along each axis.
    #[inline]
    pub fn size(&self) -> UVec<D> {
        self.size
    }

    /// Returns the total number of cells in one generation.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the grid holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell of the current generation at `pos`.
    #[inline]
    pub fn get(&self, pos: UVec<D>) -> &T {
        &self.cells[flatten_idx(self.size, pos)]
    }

    /// Writes a cell of the current generation at `pos`, for seeding.
    #[inline]
    pub fn set(&mut self, pos: UVec<D>, cell: T) {
        let idx = flatten_idx(self.size, pos);
        self.cells[idx] = cell;
    }

    /// Writes a cell of the next generation at `pos`.
    #[inline]
    pub fn set_next(&mut self, pos: UVec<D>, cell: T) {
        let idx = flatten_idx(self.size, pos);
        self.next[idx] = cell;
    }

    /// Returns the flat current-generation buffer in canonical order.
    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Returns the flat current-generation buffer mutably.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Borrows the current generation read-only and the next generation
    /// mutably at the same time.
    #[inline]
    pub fn split_mut(&mut self) -> (&[T], &mut [T]) {
        (&self.cells, &mut self.next)
    }

    /// Resets every next-generation cell to the default value, so that
    /// unoccupied destinations stay empty during a motion step.
    pub fn reset_next(&mut self) {
        self.next.fill(T::default());
    }

    /// Exchanges the current and next generations.
    ///
    /// Both buffers stay allocated and valid; this is a descriptor swap,
    /// not a copy.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.cells, &mut self.next);
    }

    /// Returns an iterator over the current generation, enumerated by
    /// position in canonical order.
    pub fn iter_enumerated(&self) -> impl Iterator<Item = (UVec<D>, &T)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (unflatten_idx(self.size, idx), cell))
    }

    /// Like [`Grid::iter_enumerated`], but with mutable cell references.
    pub fn iter_mut_enumerated(&mut self) -> impl Iterator<Item = (UVec<D>, &mut T)> {
        let size = self.size;
        self.cells
            .iter_mut()
            .enumerate()
            .map(move |(idx, cell)| (unflatten_idx(size, idx), cell))
    }
}

fn alloc_buffer<T: Cell>(len: usize, fill: &T) -> CaResult<Box<[T]>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| CaError::AllocationFailed)?;
    buf.resize(len, fill.clone());
    Ok(buf.into_boxed_slice())
}

impl<T: Cell, D: Dim> fmt::Display for Grid<T, D> {
    /// Canonical text rendering of the current generation.
    ///
    /// Rank 1 prints the states on one line; rank 2 prints one row per
    /// line; rank 3 prints each slice as a rank-2 grid under a
    /// `Printing i'th slice of Tensor` header.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cells.is_empty() {
            return Ok(());
        }
        let row_len = self.size[*D::axes().last().unwrap()];
        let slice_len = if D::NDIM == 3 {
            self.len() / self.size[crate::axis::Axis::X]
        } else {
            0
        };
        for (start, row) in self.cells.chunks(row_len).enumerate().map(|(n, row)| (n * row_len, row)) {
            if D::NDIM == 3 && start % slice_len == 0 {
                writeln!(f, "Printing {}'th slice of Tensor", start / slice_len)?;
            }
            writeln!(f, "{}", row.iter().map(|cell| cell.state()).join(" "))?;
        }
        Ok(())
    }
}
