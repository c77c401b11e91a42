//! Transition rules.
//!
//! The built-in rules only ever read and write the integer state of a cell;
//! any extra fields are reset to their defaults. `Custom` rules receive the
//! whole cell and may also relocate it by mutating the focus coordinate.

use crate::cell::Cell;

/// Rule used to compute a cell's next state from its neighborhood.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Each cell takes the most common state among its neighbors (focus
    /// cell included). Ties break toward the lowest state value.
    #[default]
    Majority,
    /// Each cell takes the sum of its neighbors' states (focus cell
    /// included) modulo the number of states.
    Parity,
    /// A user-supplied function computes the new cell; it may mutate every
    /// field and relocate the cell by changing the focus coordinate.
    Custom,
}

/// Computes the next cell for one of the built-in rules.
///
/// `nbhd` is the neighborhood sequence in canonical order, which includes
/// the focus cell, so the Parity sum and the Majority vote count it too.
/// States at or above `num_states` (reachable only through custom rules or
/// explicit seeding) get no vote under Majority.
pub(crate) fn transition<T: Cell>(rule: Rule, nbhd: &[T], num_states: u32) -> T {
    let mut ret = T::default();
    match rule {
        Rule::Parity => {
            let sum: u64 = nbhd.iter().map(|cell| u64::from(cell.state())).sum();
            ret.set_state((sum % u64::from(num_states)) as u32);
        }
        Rule::Majority => {
            let mut votes = vec![0usize; num_states as usize];
            for cell in nbhd {
                if let Some(count) = votes.get_mut(cell.state() as usize) {
                    *count += 1;
                }
            }
            let mut majority = 0;
            for (state, &count) in votes.iter().enumerate() {
                if count > votes[majority] {
                    majority = state;
                }
            }
            ret.set_state(majority as u32);
        }
        Rule::Custom => unreachable!("custom rules are applied by the stepper"),
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity() {
        let nbhd: Vec<u32> = vec![0, 1, 1];
        assert_eq!(0, transition(Rule::Parity, &nbhd, 2).state());
        let nbhd: Vec<u32> = vec![1, 1, 1];
        assert_eq!(1, transition(Rule::Parity, &nbhd, 2).state());
        let nbhd: Vec<u32> = vec![2, 2, 1];
        assert_eq!(2, transition(Rule::Parity, &nbhd, 3).state());
    }

    #[test]
    fn test_majority() {
        let nbhd: Vec<u32> = vec![1, 1, 0];
        assert_eq!(1, transition(Rule::Majority, &nbhd, 2).state());
        let nbhd: Vec<u32> = vec![2, 2, 1, 1, 0];
        // Tie between 1 and 2 breaks toward the lower state.
        assert_eq!(1, transition(Rule::Majority, &nbhd, 3).state());
        let nbhd: Vec<u32> = vec![1, 0];
        assert_eq!(0, transition(Rule::Majority, &nbhd, 2).state());
    }

    #[test]
    fn test_majority_ignores_out_of_range_states() {
        let nbhd: Vec<u32> = vec![9, 9, 9, 1];
        assert_eq!(1, transition(Rule::Majority, &nbhd, 2).state());
    }
}
