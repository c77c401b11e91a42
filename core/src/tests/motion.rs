//! Motion-capable custom rule scenarios.

use super::*;

/// A single cell pushed +1 along the first axis each step orbits a 6x6x6
/// periodic grid; no other cell ever becomes non-empty.
#[test]
fn test_single_cell_orbits_periodic_grid() {
    let mut ca = Automaton3D::<u32>::new();
    ca.setup_dimensions(NdVec([6, 6, 6])).unwrap();
    ca.setup_boundary(Boundary::Periodic, 1).unwrap();
    ca.setup_rule(Rule::Custom);
    ca.seed_cell(NdVec([2, 2, 2]), 1).unwrap();

    for k in 1..=8u64 {
        ca.step_with(|pos: &mut UVec3D, _nbhd: &[u32], cell: &mut u32| {
            if cell.state() != 0 {
                pos[Axis::X] = geometry::wrap(pos[Axis::X], 1, 6);
            }
        })
        .unwrap();

        let expected = NdVec([(2 + k as usize) % 6, 2, 2]);
        assert_eq!(Some(&1), ca.cell(expected));
        let population: u32 = ca.grid().unwrap().cells().iter().sum();
        assert_eq!(1, population, "after {} steps", k);
    }
    assert_eq!(8, ca.steps_taken());
}

/// A cell that moves leaves its old slot empty; a cell that stays on a
/// slot someone vacated is not resurrected by the pre-pass.
#[test]
fn test_moved_cell_vacates_origin() {
    let mut ca = automaton_1d(&[0, 0, 1, 0, 0], Boundary::Periodic, 1, Rule::Custom);
    ca.step_with(|pos: &mut UVec1D, _nbhd: &[u32], cell: &mut u32| {
        if cell.state() != 0 {
            pos[Axis::X] = geometry::wrap(pos[Axis::X], -1, 5);
        }
    })
    .unwrap();
    assert_eq!(vec![0, 1, 0, 0, 0], states(&ca));
}

/// When two cells resolve to the same destination, the later one in
/// canonical order wins. Documented behavior, not fairness.
#[test]
fn test_collision_last_write_wins() {
    let mut ca = automaton_1d(&[1, 0, 2, 0, 0], Boundary::Periodic, 1, Rule::Custom);
    ca.setup_cell_states(3).unwrap();
    ca.step_with(|pos: &mut UVec1D, _nbhd: &[u32], cell: &mut u32| {
        if cell.state() != 0 {
            pos[Axis::X] = 1;
        }
    })
    .unwrap();
    assert_eq!(vec![0, 2, 0, 0, 0], states(&ca));
}

/// A motion rule can detect occupancy through the neighborhood view and
/// refuse to move, the escape hatch for collision-averse rules.
#[test]
fn test_motion_rule_can_refuse_to_move() {
    let mut ca = automaton_1d(&[1, 1, 0, 0, 0], Boundary::Periodic, 1, Rule::Custom);
    ca.step_with(|pos: &mut UVec1D, nbhd: &[u32], cell: &mut u32| {
        // Move right only if the right neighbor (canonical position 2) was
        // empty in the previous generation.
        if cell.state() != 0 && nbhd[2] == 0 {
            pos[Axis::X] = geometry::wrap(pos[Axis::X], 1, 5);
        }
    })
    .unwrap();
    assert_eq!(vec![1, 0, 1, 0, 0], states(&ca));
}
