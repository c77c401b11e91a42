//! Built-in and custom rule scenarios on rank-1 grids.

use super::*;

/// Parity, periodic, r = 1, 2 states: the window at index 4 wraps around
/// to pick up index 0, so its sum of 2 folds to state 0.
#[test]
fn test_parity_1d_periodic() {
    let mut ca = automaton_1d(&[1, 0, 0, 1, 0], Boundary::Periodic, 1, Rule::Parity);
    ca.step().unwrap();
    assert_eq!(vec![1, 1, 1, 1, 0], states(&ca));
    assert_eq!(1, ca.steps_taken());
}

/// Majority, periodic, r = 1, 2 states: this initial vector is a fixed
/// point.
#[test]
fn test_majority_1d_periodic_fixed_point() {
    let mut ca = automaton_1d(&[1, 1, 0, 0, 1], Boundary::Periodic, 1, Rule::Majority);
    ca.step().unwrap();
    assert_eq!(vec![1, 1, 0, 0, 1], states(&ca));
}

/// Majority, cutoff, r = 1: border cells see truncated neighborhoods and
/// the two-cell tie at the ends breaks toward the lower state.
#[test]
fn test_majority_1d_cutoff() {
    let mut ca = automaton_1d(&[1, 0, 0, 0, 1], Boundary::CutOff, 1, Rule::Majority);
    ca.step().unwrap();
    assert_eq!(vec![0, 0, 0, 0, 0], states(&ca));
}

/// Parity always yields a state in `[0, num_states)`.
#[test]
fn test_parity_is_bounded() {
    for num_states in 2..5u32 {
        let mut ca = Automaton1D::<u32>::new();
        ca.setup_dimensions(NdVec([32])).unwrap();
        ca.setup_cell_states(num_states).unwrap();
        ca.setup_rule(Rule::Parity);
        ca.init_condition_seeded(num_states - 1, 0.6, 11).unwrap();
        for _ in 0..4 {
            ca.step().unwrap();
            assert!(states(&ca).iter().all(|&s| s < num_states));
        }
    }
}

/// If every cell already shares one state, a Majority step changes
/// nothing.
#[test]
fn test_majority_is_stable_on_uniform_grid() {
    let mut ca = Automaton2D::<u32>::new();
    ca.setup_dimensions_filled(NdVec([6, 6]), 1).unwrap();
    ca.step().unwrap();
    assert!(states(&ca).iter().all(|&s| s == 1));
}

/// A custom rule that returns the focus unchanged leaves the grid
/// unchanged across a step, and across two.
#[test]
fn test_identity_custom_rule_round_trip() {
    let mut ca = automaton_1d(&[1, 0, 1, 1, 0, 0, 1], Boundary::Periodic, 2, Rule::Custom);
    let before = states(&ca);
    ca.step_with(|_pos: &mut UVec1D, _nbhd: &[u32], _cell: &mut u32| {}).unwrap();
    assert_eq!(before, states(&ca));
    ca.step_with(|_pos: &mut UVec1D, _nbhd: &[u32], _cell: &mut u32| {}).unwrap();
    assert_eq!(before, states(&ca));
    assert_eq!(2, ca.steps_taken());
}

/// A custom rule sees the neighborhood in the canonical offset order, with
/// the focus cell at its canonical position.
#[test]
fn test_custom_rule_neighborhood_order() {
    let mut ca = automaton_1d(&[0, 1, 2, 3, 4], Boundary::Periodic, 1, Rule::Custom);
    ca.setup_cell_states(8).unwrap();
    ca.step_with(|pos: &mut UVec1D, nbhd: &[u32], cell: &mut u32| {
        assert_eq!(3, nbhd.len());
        // Offsets -1, 0, +1: the middle entry is the focus cell.
        assert_eq!(nbhd[1], *cell);
        let left = geometry::wrap(pos[Axis::X], -1, 5) as u32;
        assert_eq!(left, nbhd[0]);
        *cell = nbhd[1];
    })
    .unwrap();
    assert_eq!(vec![0, 1, 2, 3, 4], states(&ca));
}

/// A built-in rule ignores a supplied custom function, matching the
/// original engine's dispatch.
#[test]
fn test_builtin_rule_ignores_custom_function() {
    let mut ca = automaton_1d(&[1, 0, 0, 1, 0], Boundary::Periodic, 1, Rule::Parity);
    ca.step_with(|_pos: &mut UVec1D, _nbhd: &[u32], cell: &mut u32| *cell = 1).unwrap();
    assert_eq!(vec![1, 1, 1, 1, 0], states(&ca));
}

/// Parity resets non-state fields to their defaults.
#[test]
fn test_builtin_rules_reset_extra_fields() {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Tagged {
        state: u32,
        tag: u8,
    }
    impl Cell for Tagged {
        fn state(&self) -> u32 {
            self.state
        }
        fn set_state(&mut self, state: u32) {
            self.state = state;
        }
    }

    let mut ca = Automaton1D::<Tagged>::new();
    ca.setup_dimensions(NdVec([4])).unwrap();
    ca.setup_rule(Rule::Parity);
    ca.grid_mut().unwrap().cells_mut()[1] = Tagged { state: 1, tag: 9 };
    ca.step().unwrap();
    assert!(ca.grid().unwrap().cells().iter().all(|c| c.tag == 0));
}
