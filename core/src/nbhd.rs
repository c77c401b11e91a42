//! Neighborhood gathering under a boundary policy.

use crate::cell::Cell;
use crate::dim::Dim;
use crate::error::{CaError, CaResult};
use crate::geometry::{self, Neighborhood};
use crate::grid::flatten_idx;
use crate::ndvec::UVec;

/// Policy for neighborhoods that would extend past the edge of the grid.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Coordinates wrap around; every cell sees a full neighborhood.
    #[default]
    Periodic,
    /// Cells on the edge of the grid are frozen; interior cells behave as
    /// [`Boundary::CutOff`].
    Walled,
    /// Neighbors outside the grid are omitted, so the emitted sequence is
    /// shorter than the maximum neighborhood size near a border.
    CutOff,
}

/// Returns true if `pos` lies on the boundary of any active axis.
///
/// Under [`Boundary::Walled`], such cells are written into the next
/// generation unchanged and never reach [`gather`].
#[inline]
pub fn is_edge<D: Dim>(pos: UVec<D>, size: UVec<D>) -> bool {
    D::axes()
        .iter()
        .any(|&ax| pos[ax] == 0 || pos[ax] == size[ax] - 1)
}

/// Clears `out` and fills it with the neighbor values of the focus cell at
/// `pos`, in the canonical order of [`geometry::offsets`].
///
/// The focus cell itself is emitted (offset zero occupies its canonical
/// position). Under [`Boundary::CutOff`] — and for the interior cells that
/// [`Boundary::Walled`] delegates here — neighbors whose absolute
/// coordinate falls outside the grid on any axis are dropped from the
/// sequence.
pub fn gather<T: Cell, D: Dim>(
    cells: &[T],
    size: UVec<D>,
    shape: Neighborhood,
    boundary: Boundary,
    radius: usize,
    pos: UVec<D>,
    out: &mut Vec<T>,
) {
    out.clear();
    match boundary {
        Boundary::Periodic => {
            for offset in geometry::offsets::<D>(shape, radius) {
                let neighbor = geometry::wrap_vec(pos, offset, size);
                out.push(cells[flatten_idx(size, neighbor)].clone());
            }
        }
        Boundary::Walled | Boundary::CutOff => {
            for offset in geometry::offsets::<D>(shape, radius) {
                if let Some(neighbor) = geometry::offset_within(pos, offset, size) {
                    out.push(cells[flatten_idx(size, neighbor)].clone());
                }
            }
        }
    }
}

/// Makes sure a scratch buffer can hold a full neighborhood without an
/// aborting allocation.
#[inline]
pub(crate) fn reserve_scratch<T>(buf: &mut Vec<T>, capacity: usize) -> CaResult<()> {
    buf.clear();
    buf.try_reserve_exact(capacity)
        .map_err(|_| CaError::NeighborhoodAllocationFailed)
}
