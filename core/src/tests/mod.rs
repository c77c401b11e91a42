//! Whole-engine scenario tests.

use crate::*;

mod motion;
mod rules;

/// Builds a rank-1 automaton over the given states with 2 cell states.
fn automaton_1d(states: &[u32], boundary: Boundary, radius: usize, rule: Rule) -> Automaton1D<u32> {
    let mut ca = Automaton1D::new();
    ca.setup_dimensions(NdVec([states.len()])).unwrap();
    ca.setup_boundary(boundary, radius).unwrap();
    ca.setup_rule(rule);
    ca.grid_mut().unwrap().cells_mut().copy_from_slice(states);
    ca
}

/// Snapshot of the current generation's states in canonical order.
fn states<T: Cell, D: Dim>(ca: &CellularAutomaton<T, D>) -> Vec<u32> {
    ca.grid().unwrap().cells().iter().map(Cell::state).collect()
}
