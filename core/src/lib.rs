//! Dense-lattice cellular automaton storage and simulation backend.
//!
//! The engine advances a 1D, 2D, or 3D grid of cells through discrete time
//! steps under a selectable transition rule (Majority, Parity, or a
//! user-supplied Custom rule that may also relocate cells), a selectable
//! neighborhood shape (Von Neumann or Moore at arbitrary radius), and a
//! selectable boundary policy (Periodic, Walled, or CutOff).

#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all)]
#![deny(clippy::correctness)]

#[macro_use]
mod macros;
pub mod automaton;
pub mod axis;
pub mod cell;
pub mod dim;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod nbhd;
pub mod ndvec;
pub mod rule;
mod step;

pub use automaton::{
    Automaton, Automaton1D, Automaton2D, Automaton3D, CellularAutomaton, Simulate,
};
pub use axis::Axis;
pub use cell::Cell;
pub use dim::{Dim, Dim1D, Dim2D, Dim3D};
pub use error::{error_message, CaError, CaResult};
pub use geometry::Neighborhood;
pub use grid::Grid;
pub use nbhd::Boundary;
pub use ndvec::{IVec, IVec1D, IVec2D, IVec3D, NdVec, UVec, UVec1D, UVec2D, UVec3D};
pub use rule::Rule;

#[cfg(test)]
mod tests;
