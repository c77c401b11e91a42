//! Dimensionality trait, which provides a number of dimensions.
//!
//! The trait is generic over the component type of the coordinate arrays it
//! provides, so a single set of marker structs covers unsigned coordinates
//! and signed offsets alike.

use std::fmt;
use std::hash::Hash;

use crate::axis::{ndim_axes, Axis};
use crate::ndvec::NdVecNum;

/// Dimensionality of a grid.
///
/// This trait is only implemented for the three structs `Dim1D`, `Dim2D`,
/// and `Dim3D`; the engine does not and will not support more than three
/// dimensions.
pub trait Dim:
    'static + fmt::Debug + Default + Copy + Eq + Hash + Send + Sync + private::Sealed
{
    /// Number of dimensions.
    const NDIM: usize;

    /// Array type used for vectors with this dimensionality.
    type Array<N: NdVecNum>: fmt::Debug
        + Default
        + Copy
        + Eq
        + Hash
        + Send
        + Sync
        + AsRef<[N]>
        + AsMut<[N]>;

    /// Returns an array of the axes of this many dimensions.
    fn axes() -> &'static [Axis] {
        ndim_axes(Self::NDIM)
    }

    /// Returns true if this dimensionality includes the given axis.
    fn contains(axis: Axis) -> bool {
        (axis as usize) < Self::NDIM
    }
}

/// 1 dimension.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dim1D;
/// 2 dimensions.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dim2D;
/// 3 dimensions.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dim3D;

impl Dim for Dim1D {
    const NDIM: usize = 1;
    type Array<N: NdVecNum> = [N; 1];
}
impl Dim for Dim2D {
    const NDIM: usize = 2;
    type Array<N: NdVecNum> = [N; 2];
}
impl Dim for Dim3D {
    const NDIM: usize = 3;
    type Array<N: NdVecNum> = [N; 3];
}

// Make `Dim` a "sealed trait."
// https://rust-lang.github.io/api-guidelines/future-proofing.html#c-sealed
mod private {
    use super::*;

    pub trait Sealed {}
    impl Sealed for Dim1D {}
    impl Sealed for Dim2D {}
    impl Sealed for Dim3D {}
}
