//! Pure neighborhood geometry.
//!
//! Everything in this module is a total function of its arguments: periodic
//! index wrapping, neighborhood cardinalities, diagonal predicates, and the
//! canonical flat-index-to-offset maps for both neighborhood shapes.
//!
//! The canonical enumeration order is lexicographic by axis with axis `X`
//! varying slowest. [`offsets`] is the single source of truth for that
//! order; the neighborhood gatherer and the custom-rule position contract
//! both follow it.

use crate::dim::Dim;
use crate::ndvec::{IVec, UVec};

/// Shape of the neighborhood around a focus cell.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Neighborhood {
    /// Axial cross of `2kr + 1` cells (engine convention; see
    /// [`von_neumann_offset`]).
    VonNeumann,
    /// Full `(2r + 1)^k` box.
    #[default]
    Moore,
}

/// Wraps `i + di` into `[0, dim)`, handling negative offsets uniformly.
#[inline]
pub fn wrap(i: usize, di: isize, dim: usize) -> usize {
    (i as isize + di).rem_euclid(dim as isize) as usize
}

/// Wraps `pos + offset` into the grid per axis.
#[inline]
pub fn wrap_vec<D: Dim>(pos: UVec<D>, offset: IVec<D>, size: UVec<D>) -> UVec<D> {
    UVec::from_fn(|ax| wrap(pos[ax], offset[ax], size[ax]))
}

/// Returns `pos + offset` if it lies inside the grid on every axis, or
/// `None` if any component falls outside `[0, size)`.
#[inline]
pub fn offset_within<D: Dim>(pos: UVec<D>, offset: IVec<D>, size: UVec<D>) -> Option<UVec<D>> {
    let mut ret = UVec::origin();
    for &ax in D::axes() {
        let n = pos[ax] as isize + offset[ax];
        if n < 0 || n >= size[ax] as isize {
            return None;
        }
        ret[ax] = n as usize;
    }
    Some(ret)
}

/// Returns the number of cells in a neighborhood (focus cell included) for
/// the given rank, radius, and shape.
///
/// Von Neumann uses the engine convention of `2kr + 1`: `k` axial arms of
/// length `r` on each side of the focus cell, with no off-axis members even
/// at radius greater than 1.
#[inline]
pub fn neighborhood_len(ndim: usize, radius: usize, shape: Neighborhood) -> usize {
    match shape {
        Neighborhood::VonNeumann => 2 * ndim * radius + 1,
        Neighborhood::Moore => (2 * radius + 1).pow(ndim as u32),
    }
}

/// Returns true if a 2D offset is a diagonal neighbor.
///
/// Diagram of a radius-1 slice (`1` = diagonal):
///
/// ```text
/// 1 0 1
/// 0 0 0
/// 1 0 1
/// ```
#[inline]
pub fn is_diagonal_2d(di: isize, dj: isize) -> bool {
    di != 0 && dj != 0
}

/// Returns true if a 3D offset is a diagonal neighbor.
///
/// In the central slice (`di == 0`) only offsets with both remaining
/// components nonzero count as diagonal; in every other slice any nonzero
/// remaining component does. The two cases look asymmetric but both reduce
/// to "at least two components nonzero".
#[inline]
pub fn is_diagonal_3d(di: isize, dj: isize, dk: isize) -> bool {
    if di == 0 {
        dj != 0 && dk != 0
    } else {
        dj != 0 || dk != 0
    }
}

/// Returns true if an offset is a diagonal neighbor for its rank.
///
/// Rank 1 has no diagonals.
#[inline]
pub fn is_diagonal<D: Dim>(offset: IVec<D>) -> bool {
    use crate::axis::Axis;
    match_rank!(match D {
        1 => false,
        2 => is_diagonal_2d(offset[Axis::X], offset[Axis::Y]),
        3 => is_diagonal_3d(offset[Axis::X], offset[Axis::Y], offset[Axis::Z]),
    })
}

/// Maps a flat neighborhood index `q` in `[0, (2r+1)^k)` to a Moore offset.
///
/// Enumeration is lexicographic by axis: axis `X` varies slowest and the
/// last active axis fastest, so `q = 0` is the all-`-r` corner and the
/// focus cell sits at the middle index.
#[inline]
pub fn moore_offset<D: Dim>(radius: usize, q: usize) -> IVec<D> {
    let f = 2 * radius + 1;
    debug_assert!(q < f.pow(D::NDIM as u32));
    let r = radius as isize;
    IVec::from_fn(|ax| {
        let divisor = f.pow((D::NDIM - 1 - ax as usize) as u32);
        ((q / divisor) % f) as isize - r
    })
}

/// Maps a flat neighborhood index `q` in `[0, 2kr + 1)` to a Von Neumann
/// offset.
///
/// The layout packs the axial arms in the same order the Moore enumeration
/// visits them once diagonals are filtered out: the negative `X` arm, then
/// (for rank 3) the negative `Y` arm, the full last axis including the
/// focus cell, the positive `Y` arm, and the positive `X` arm.
pub fn von_neumann_offset<D: Dim>(radius: usize, q: usize) -> IVec<D> {
    use crate::axis::Axis;
    let len = (2 * D::NDIM * radius + 1) as isize;
    let mid = len / 2;
    let r = radius as isize;
    let q = q as isize;
    debug_assert!(q < len);
    let mut ret = IVec::origin();
    match_rank!(match D {
        1 => ret[Axis::X] = q - r,
        2 => {
            if q < r {
                ret[Axis::X] = q - r;
            } else if len - q <= r {
                ret[Axis::X] = q - len + 1 + r;
            } else {
                ret[Axis::Y] = q - mid;
            }
        },
        3 => {
            if q < r {
                ret[Axis::X] = q - r;
            } else if len - q <= r {
                ret[Axis::X] = q - len + 1 + r;
            } else {
                let adjusted = q - r;
                if adjusted < r {
                    ret[Axis::Y] = adjusted - r;
                } else if len - q - r <= r {
                    ret[Axis::Y] = q - len + 1 + 2 * r;
                } else {
                    ret[Axis::Z] = q - mid;
                }
            }
        }
    });
    ret
}

/// Maps a flat neighborhood index to an offset for the given shape.
#[inline]
pub fn flat_offset<D: Dim>(shape: Neighborhood, radius: usize, q: usize) -> IVec<D> {
    match shape {
        Neighborhood::VonNeumann => von_neumann_offset::<D>(radius, q),
        Neighborhood::Moore => moore_offset::<D>(radius, q),
    }
}

/// Enumerates every offset of a neighborhood in canonical order.
///
/// The order is exactly the order in which the neighborhood gatherer emits
/// cell values, so a custom rule may treat position `i` in its neighborhood
/// slice as `offsets(shape, radius).nth(i)`.
pub fn offsets<D: Dim>(
    shape: Neighborhood,
    radius: usize,
) -> impl Iterator<Item = IVec<D>> + Clone {
    (0..neighborhood_len(D::NDIM, radius, shape)).map(move |q| flat_offset::<D>(shape, radius, q))
}
