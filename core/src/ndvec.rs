//! N-dimensional vectors.
//!
//! Grid coordinates and shapes use unsigned components (`UVec`); neighbor
//! offsets use signed components (`IVec`). Both are thin wrappers around a
//! fixed-arity array supplied by the `Dim` marker type, so every vector is
//! `Copy` and lives on the stack.

use num::traits::PrimInt;
use std::fmt;
use std::hash::Hash;
use std::ops::{Index, IndexMut};

use crate::axis::Axis;
use crate::dim::{Dim, Dim1D, Dim2D, Dim3D};

/// "Trait alias" for types that can be used as `NdVec` components.
pub trait NdVecNum:
    fmt::Debug + Default + Copy + Eq + Hash + Ord + Send + Sync + PrimInt
{
}
impl NdVecNum for usize {}
impl NdVecNum for isize {}

/// `D`-dimensional vector with coordinates of type `N`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NdVec<D: Dim, N: NdVecNum>(pub D::Array<N>);

impl<D: Dim, N: NdVecNum + fmt::Display> fmt::Display for NdVec<D, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for &ax in D::axes() {
            if ax != Axis::X {
                write!(f, ", ")?;
            }
            fmt::Display::fmt(&self[ax], f)?;
        }
        write!(f, "]")?;
        Ok(())
    }
}

// Implement indexing using `Axis`.
impl<D: Dim, N: NdVecNum> Index<Axis> for NdVec<D, N> {
    type Output = N;
    #[inline]
    fn index(&self, axis: Axis) -> &N {
        &self.0.as_ref()[axis as usize]
    }
}
impl<D: Dim, N: NdVecNum> IndexMut<Axis> for NdVec<D, N> {
    #[inline]
    fn index_mut(&mut self, axis: Axis) -> &mut N {
        &mut self.0.as_mut()[axis as usize]
    }
}

impl<D: Dim, N: NdVecNum> NdVec<D, N> {
    /// Creates a vector consisting of all zeros.
    #[inline]
    pub fn origin() -> Self {
        Self::default()
    }
    /// Returns true if the vector is all zeros, or false otherwise.
    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
    /// Creates a unit vector pointing along `axis`.
    #[inline]
    pub fn unit(axis: Axis) -> Self {
        let mut ret = Self::default();
        ret[axis] = N::one();
        ret
    }

    /// Creates a vector by evaluating `generator` for each axis.
    #[inline]
    pub fn from_fn(mut generator: impl FnMut(Axis) -> N) -> Self {
        let mut ret = Self::default();
        for &ax in D::axes() {
            ret[ax] = generator(ax);
        }
        ret
    }
    /// Creates a vector using `value` for all components.
    #[inline]
    pub fn repeat(value: N) -> Self {
        Self::from_fn(|_| value)
    }

    /// Returns the sum of the components of the vector.
    #[inline]
    pub fn sum(&self) -> N {
        let mut ret = N::zero();
        for &ax in D::axes() {
            ret = ret + self[ax];
        }
        ret
    }
    /// Returns the product of the components of the vector.
    #[inline]
    pub fn product(&self) -> N {
        let mut ret = N::one();
        for &ax in D::axes() {
            ret = ret * self[ax];
        }
        ret
    }
}

/// Vector with unsigned components, used for coordinates and shapes.
pub type UVec<D> = NdVec<D, usize>;
/// Vector with signed components, used for neighbor offsets.
pub type IVec<D> = NdVec<D, isize>;

/// 1D vector with unsigned components.
pub type UVec1D = UVec<Dim1D>;
/// 2D vector with unsigned components.
pub type UVec2D = UVec<Dim2D>;
/// 3D vector with unsigned components.
pub type UVec3D = UVec<Dim3D>;
/// 1D vector with signed components.
pub type IVec1D = IVec<Dim1D>;
/// 2D vector with signed components.
pub type IVec2D = IVec<Dim2D>;
/// 3D vector with signed components.
pub type IVec3D = IVec<Dim3D>;

impl<D: Dim> UVec<D> {
    /// Converts to a signed vector.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if a component exceeds `isize::MAX`.
    #[inline]
    pub fn to_ivec(self) -> IVec<D> {
        NdVec::from_fn(|ax| {
            debug_assert!(self[ax] <= isize::MAX as usize);
            self[ax] as isize
        })
    }
}

impl<D: Dim> IVec<D> {
    /// Converts to an unsigned vector.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if any component is negative.
    #[inline]
    pub fn to_uvec(self) -> UVec<D> {
        NdVec::from_fn(|ax| {
            debug_assert!(self[ax] >= 0);
            self[ax] as usize
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndvec_index() {
        let mut v: UVec3D = NdVec([4, 5, 6]);
        assert_eq!(4, v[Axis::X]);
        assert_eq!(6, v[Axis::Z]);
        v[Axis::Y] = 9;
        assert_eq!(NdVec([4, 9, 6]), v);
    }

    #[test]
    fn test_ndvec_from_fn() {
        let v: IVec2D = NdVec::from_fn(|ax| ax as isize * 10);
        assert_eq!(NdVec([0, 10]), v);
        assert_eq!(NdVec([7, 7]), IVec2D::repeat(7));
        assert_eq!(NdVec([0, 1]), IVec2D::unit(Axis::Y));
        assert!(IVec2D::origin().is_zero());
    }

    #[test]
    fn test_ndvec_sum_product() {
        let v: UVec3D = NdVec([2, 3, 4]);
        assert_eq!(9, v.sum());
        assert_eq!(24, v.product());
    }

    #[test]
    fn test_ndvec_display() {
        let v: IVec3D = NdVec([1, -2, 3]);
        assert_eq!("[1, -2, 3]", format!("{}", v));
    }

    #[test]
    fn test_ndvec_casts() {
        let v: UVec2D = NdVec([3, 8]);
        assert_eq!(NdVec([3, 8]), v.to_ivec());
        assert_eq!(v, v.to_ivec().to_uvec());
    }
}
