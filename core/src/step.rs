//! The stepper: one generation advance.
//!
//! Iteration over focus cells is parallel with a read-only view of the
//! current generation. Built-in rules write only their own slot of the next
//! generation, so they run fully concurrently; custom rules may relocate
//! cells, so their writes are split into a parallel intent phase and a
//! sequential commit phase that preserves the documented last-write-wins
//! behavior with canonical cell order as the tiebreak.

use rayon::prelude::*;

use crate::automaton::Config;
use crate::cell::Cell;
use crate::dim::Dim;
use crate::error::{CaError, CaResult};
use crate::geometry;
use crate::grid::{flatten_idx, unflatten_idx, Grid};
use crate::nbhd::{self, Boundary};
use crate::ndvec::UVec;
use crate::rule::{self, Rule};

/// Advances the grid by one generation under `config`.
///
/// On error, the next buffer is discarded by virtue of not swapping, so the
/// grid still holds the pre-step generation.
pub(crate) fn advance<T, D, F>(
    grid: &mut Grid<T, D>,
    config: &Config,
    custom_rule: Option<&F>,
) -> CaResult<()>
where
    T: Cell,
    D: Dim,
    F: Fn(&mut UVec<D>, &[T], &mut T) + Sync,
{
    let size = grid.size();
    let radius = config.boundary_radius;
    let capacity = geometry::neighborhood_len(D::NDIM, radius, config.neighborhood);

    // Pre-pass: unoccupied destinations must stay empty so that relocated
    // cells land on default slots.
    grid.reset_next();

    let (cells, next) = grid.split_mut();
    let empty = T::default();

    match config.rule {
        Rule::Custom => {
            let custom_rule = custom_rule.ok_or(CaError::CustomRuleMissing)?;
            let intents = (0..cells.len())
                .into_par_iter()
                .map_init(Vec::new, |scratch, idx| {
                    let pos = unflatten_idx(size, idx);
                    if config.boundary == Boundary::Walled && nbhd::is_edge(pos, size) {
                        return Ok((idx, cells[idx].clone()));
                    }
                    nbhd::reserve_scratch(scratch, capacity)?;
                    nbhd::gather(
                        cells,
                        size,
                        config.neighborhood,
                        config.boundary,
                        radius,
                        pos,
                        scratch,
                    );
                    let mut target = pos;
                    let mut new_cell = cells[idx].clone();
                    custom_rule(&mut target, scratch.as_slice(), &mut new_cell);
                    Ok((flatten_idx(size, target), new_cell))
                })
                .collect::<CaResult<Vec<(usize, T)>>>()?;
            // Sequential commit: writes equal to the empty cell are skipped
            // so they cannot clobber a cell that moved into the slot; when
            // two cells resolve to the same destination the later one in
            // canonical order wins.
            for (idx, new_cell) in intents {
                if new_cell != empty {
                    next[idx] = new_cell;
                }
            }
        }
        _ => {
            next.par_iter_mut().enumerate().try_for_each_init(
                Vec::new,
                |scratch, (idx, slot)| {
                    let pos = unflatten_idx(size, idx);
                    if config.boundary == Boundary::Walled && nbhd::is_edge(pos, size) {
                        *slot = cells[idx].clone();
                        return Ok(());
                    }
                    nbhd::reserve_scratch(scratch, capacity)?;
                    nbhd::gather(
                        cells,
                        size,
                        config.neighborhood,
                        config.boundary,
                        radius,
                        pos,
                        scratch,
                    );
                    let new_cell = rule::transition(config.rule, scratch, config.num_states);
                    if new_cell != empty {
                        *slot = new_cell;
                    }
                    Ok(())
                },
            )?;
        }
    }

    grid.swap();
    Ok(())
}
