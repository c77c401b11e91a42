//! High-level CA interface.
//!
//! [`CellularAutomaton`] owns the configuration and the double-buffered
//! grid, validates every setter, and drives the stepper. Rank is a type
//! parameter; the [`Automaton`] enum erases it for callers that pick the
//! rank at run time.

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::cell::Cell;
use crate::dim::{Dim, Dim1D, Dim2D, Dim3D};
use crate::error::{CaError, CaResult};
use crate::geometry::Neighborhood;
use crate::grid::Grid;
use crate::nbhd::Boundary;
use crate::ndvec::UVec;
use crate::rule::Rule;
use crate::step;

/// Engine configuration, owned by the facade.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) neighborhood: Neighborhood,
    pub(crate) boundary: Boundary,
    pub(crate) boundary_radius: usize,
    pub(crate) num_states: u32,
    pub(crate) rule: Rule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            neighborhood: Neighborhood::Moore,
            boundary: Boundary::Periodic,
            boundary_radius: 1,
            num_states: 2,
            rule: Rule::Majority,
        }
    }
}

/// A cellular automaton: configuration, double-buffered grid, and
/// generation counter.
///
/// The engine starts unconfigured; dimensions are set exactly once, an
/// initial condition is seeded, and each [`step`](Self::step) call advances
/// one generation. Configuration setters other than dimensions may be
/// called in any state, and a failed setter leaves the engine unchanged.
#[derive(Debug, Default, Clone)]
pub struct CellularAutomaton<T: Cell, D: Dim> {
    config: Config,
    grid: Option<Grid<T, D>>,
    steps_taken: u64,
}

/// A 1D cellular automaton.
pub type Automaton1D<T> = CellularAutomaton<T, Dim1D>;
/// A 2D cellular automaton.
pub type Automaton2D<T> = CellularAutomaton<T, Dim2D>;
/// A 3D cellular automaton.
pub type Automaton3D<T> = CellularAutomaton<T, Dim3D>;

impl<T: Cell, D: Dim> CellularAutomaton<T, D> {
    /// Creates an unconfigured engine with the default configuration:
    /// Moore neighborhood, Periodic boundary of radius 1, 2 states,
    /// Majority rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the neighborhood shape. Always succeeds.
    pub fn setup_neighborhood(&mut self, neighborhood: Neighborhood) {
        self.config.neighborhood = neighborhood;
    }

    /// Selects the boundary policy and radius.
    ///
    /// Fails with `InvalidRadius` if `radius` is zero, and with
    /// `RadiusTooLarge` if the grid is already shaped and `radius` exceeds
    /// half of any active axis.
    pub fn setup_boundary(&mut self, boundary: Boundary, radius: usize) -> CaResult<()> {
        if radius == 0 {
            return Err(CaError::InvalidRadius);
        }
        if let Some(grid) = &self.grid {
            validate_radius::<D>(radius, grid.size())?;
        }
        self.config.boundary = boundary;
        self.config.boundary_radius = radius;
        Ok(())
    }

    /// Defines the number of cell states. Fails with `InvalidNumStates`
    /// below 2.
    pub fn setup_cell_states(&mut self, num_states: u32) -> CaResult<()> {
        if num_states < 2 {
            return Err(CaError::InvalidNumStates);
        }
        self.config.num_states = num_states;
        Ok(())
    }

    /// Selects the transition rule. Always succeeds; when the rule is
    /// [`Rule::Custom`], the rule function is checked at step time.
    pub fn setup_rule(&mut self, rule: Rule) {
        self.config.rule = rule;
    }

    /// Allocates the grid with every cell state set to zero.
    pub fn setup_dimensions(&mut self, size: UVec<D>) -> CaResult<()> {
        self.setup_dimensions_filled(size, 0)
    }

    /// Allocates the grid with every cell state set to `fill_state`.
    ///
    /// Fails with `AlreadyInitialized` if a grid exists, `RadiusTooLarge`
    /// if the configured boundary radius does not fit the new dimensions,
    /// and `AllocationFailed` on memory exhaustion. On success both the
    /// current and next generations are allocated and filled.
    pub fn setup_dimensions_filled(&mut self, size: UVec<D>, fill_state: u32) -> CaResult<()> {
        if self.grid.is_some() {
            return Err(CaError::AlreadyInitialized);
        }
        validate_radius::<D>(self.config.boundary_radius, size)?;
        let grid = Grid::alloc(size, fill_state)?;
        debug!("allocated {} grid of {} cells", size, grid.len());
        self.grid = Some(grid);
        Ok(())
    }

    /// Seeds the initial condition from an entropy-derived seed.
    ///
    /// Each cell independently takes state `x_state` with probability
    /// `prob`; other cells and all non-state fields are left unchanged.
    pub fn init_condition(&mut self, x_state: u32, prob: f64) -> CaResult<()> {
        self.init_condition_seeded(x_state, prob, rand::random())
    }

    /// Seeds the initial condition from an explicit seed, reproducibly.
    ///
    /// Fails with `InvalidStateCondition` if `x_state` is not below the
    /// configured number of states, and with `CellsNull` before the grid
    /// is shaped.
    pub fn init_condition_seeded(&mut self, x_state: u32, prob: f64, seed: u64) -> CaResult<()> {
        if x_state >= self.config.num_states {
            return Err(CaError::InvalidStateCondition);
        }
        let grid = self.grid.as_mut().ok_or(CaError::CellsNull)?;
        debug!(
            "seeding state {} with probability {} from seed {}",
            x_state, prob, seed
        );
        let mut rng = SmallRng::seed_from_u64(seed);
        for cell in grid.cells_mut() {
            if rng.gen::<f64>() < prob {
                cell.set_state(x_state);
            }
        }
        Ok(())
    }

    /// Places one cell into the current generation.
    ///
    /// Fails with `InvalidState` if the cell's state is not below the
    /// configured number of states, and with `CellsNull` before the grid
    /// is shaped.
    pub fn seed_cell(&mut self, pos: UVec<D>, cell: T) -> CaResult<()> {
        if cell.state() >= self.config.num_states {
            return Err(CaError::InvalidState);
        }
        let grid = self.grid.as_mut().ok_or(CaError::CellsNull)?;
        grid.set(pos, cell);
        Ok(())
    }

    /// Advances one generation with the configured built-in rule.
    ///
    /// Fails with `CellsNull` before the grid is shaped and with
    /// `CustomRuleMissing` when the configured rule is [`Rule::Custom`].
    pub fn step(&mut self) -> CaResult<()> {
        let grid = self.grid.as_mut().ok_or(CaError::CellsNull)?;
        step::advance::<T, D, fn(&mut UVec<D>, &[T], &mut T)>(grid, &self.config, None)?;
        self.steps_taken += 1;
        Ok(())
    }

    /// Advances one generation, supplying a custom rule.
    ///
    /// The rule receives the focus coordinate (mutable, so the rule may
    /// relocate the cell), the neighborhood sequence in the canonical
    /// order of [`crate::geometry::offsets`], and the focus cell
    /// pre-populated with its current value. It is only invoked when the
    /// configured rule is [`Rule::Custom`]; under a built-in rule it is
    /// ignored, matching [`step`](Self::step).
    pub fn step_with<F>(&mut self, custom_rule: F) -> CaResult<()>
    where
        F: Fn(&mut UVec<D>, &[T], &mut T) + Sync,
    {
        let grid = self.grid.as_mut().ok_or(CaError::CellsNull)?;
        step::advance(grid, &self.config, Some(&custom_rule))?;
        self.steps_taken += 1;
        Ok(())
    }

    /// Returns the grid dimensions, once shaped.
    pub fn shape(&self) -> Option<UVec<D>> {
        self.grid.as_ref().map(|grid| grid.size())
    }

    /// Returns the number of committed generations.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Returns the configured neighborhood shape.
    pub fn neighborhood(&self) -> Neighborhood {
        self.config.neighborhood
    }

    /// Returns the configured boundary policy.
    pub fn boundary(&self) -> Boundary {
        self.config.boundary
    }

    /// Returns the configured boundary radius.
    pub fn boundary_radius(&self) -> usize {
        self.config.boundary_radius
    }

    /// Returns the configured number of states.
    pub fn num_states(&self) -> u32 {
        self.config.num_states
    }

    /// Returns the configured rule.
    pub fn rule(&self) -> Rule {
        self.config.rule
    }

    /// Returns the grid, once shaped.
    pub fn grid(&self) -> Option<&Grid<T, D>> {
        self.grid.as_ref()
    }

    /// Returns the grid mutably, once shaped.
    pub fn grid_mut(&mut self) -> Option<&mut Grid<T, D>> {
        self.grid.as_mut()
    }

    /// Returns the current-generation cell at `pos`, once shaped.
    pub fn cell(&self, pos: UVec<D>) -> Option<&T> {
        self.grid.as_ref().map(|grid| grid.get(pos))
    }

    /// Renders the current generation as canonical text (see
    /// [`Grid`]'s `Display` impl for the format).
    pub fn render(&self) -> CaResult<String> {
        Ok(self.grid.as_ref().ok_or(CaError::CellsNull)?.to_string())
    }

    /// Writes the canonical text rendering to stdout.
    pub fn print_grid(&self) -> CaResult<()> {
        print!("{}", self.grid.as_ref().ok_or(CaError::CellsNull)?);
        Ok(())
    }
}

fn validate_radius<D: Dim>(radius: usize, size: UVec<D>) -> CaResult<()> {
    for &ax in D::axes() {
        if radius > size[ax] / 2 {
            return Err(CaError::RadiusTooLarge);
        }
    }
    Ok(())
}

/// Rank-agnostic engine operations, for callers that select the rank at
/// run time via [`Automaton`].
pub trait Simulate {
    /// Returns the number of dimensions of the underlying grid.
    fn ndim(&self) -> usize;
    /// Returns the number of committed generations.
    fn steps_taken(&self) -> u64;
    /// Selects the neighborhood shape.
    fn setup_neighborhood(&mut self, neighborhood: Neighborhood);
    /// Selects the boundary policy and radius.
    fn setup_boundary(&mut self, boundary: Boundary, radius: usize) -> CaResult<()>;
    /// Defines the number of cell states.
    fn setup_cell_states(&mut self, num_states: u32) -> CaResult<()>;
    /// Selects the transition rule.
    fn setup_rule(&mut self, rule: Rule);
    /// Seeds the initial condition from an entropy-derived seed.
    fn init_condition(&mut self, x_state: u32, prob: f64) -> CaResult<()>;
    /// Seeds the initial condition from an explicit seed.
    fn init_condition_seeded(&mut self, x_state: u32, prob: f64, seed: u64) -> CaResult<()>;
    /// Advances one generation with the configured built-in rule.
    fn step(&mut self) -> CaResult<()>;
    /// Renders the current generation as canonical text.
    fn render(&self) -> CaResult<String>;
    /// Writes the canonical text rendering to stdout.
    fn print_grid(&self) -> CaResult<()>;
}

impl<T: Cell, D: Dim> Simulate for CellularAutomaton<T, D> {
    fn ndim(&self) -> usize {
        D::NDIM
    }
    fn steps_taken(&self) -> u64 {
        self.steps_taken
    }
    fn setup_neighborhood(&mut self, neighborhood: Neighborhood) {
        CellularAutomaton::setup_neighborhood(self, neighborhood)
    }
    fn setup_boundary(&mut self, boundary: Boundary, radius: usize) -> CaResult<()> {
        CellularAutomaton::setup_boundary(self, boundary, radius)
    }
    fn setup_cell_states(&mut self, num_states: u32) -> CaResult<()> {
        CellularAutomaton::setup_cell_states(self, num_states)
    }
    fn setup_rule(&mut self, rule: Rule) {
        CellularAutomaton::setup_rule(self, rule)
    }
    fn init_condition(&mut self, x_state: u32, prob: f64) -> CaResult<()> {
        CellularAutomaton::init_condition(self, x_state, prob)
    }
    fn init_condition_seeded(&mut self, x_state: u32, prob: f64, seed: u64) -> CaResult<()> {
        CellularAutomaton::init_condition_seeded(self, x_state, prob, seed)
    }
    fn step(&mut self) -> CaResult<()> {
        CellularAutomaton::step(self)
    }
    fn render(&self) -> CaResult<String> {
        CellularAutomaton::render(self)
    }
    fn print_grid(&self) -> CaResult<()> {
        CellularAutomaton::print_grid(self)
    }
}

/// A cellular automaton of a dimensionality chosen at run time.
#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub enum Automaton<T: Cell> {
    Automaton1D(Automaton1D<T>),
    Automaton2D(Automaton2D<T>),
    Automaton3D(Automaton3D<T>),
}

impl<T: Cell> Automaton<T> {
    /// Creates an unconfigured engine of the given rank (1, 2, or 3).
    pub fn with_ndim(ndim: usize) -> Option<Self> {
        match ndim {
            1 => Some(Self::Automaton1D(CellularAutomaton::new())),
            2 => Some(Self::Automaton2D(CellularAutomaton::new())),
            3 => Some(Self::Automaton3D(CellularAutomaton::new())),
            _ => None,
        }
    }

    /// Borrows the engine as a rank-agnostic simulation.
    pub fn as_sim(&self) -> &dyn Simulate {
        match self {
            Self::Automaton1D(inner) => inner,
            Self::Automaton2D(inner) => inner,
            Self::Automaton3D(inner) => inner,
        }
    }

    /// Mutably borrows the engine as a rank-agnostic simulation.
    pub fn as_sim_mut(&mut self) -> &mut dyn Simulate {
        match self {
            Self::Automaton1D(inner) => inner,
            Self::Automaton2D(inner) => inner,
            Self::Automaton3D(inner) => inner,
        }
    }
}

impl<T: Cell> From<Automaton1D<T>> for Automaton<T> {
    fn from(inner: Automaton1D<T>) -> Self {
        Self::Automaton1D(inner)
    }
}
impl<T: Cell> From<Automaton2D<T>> for Automaton<T> {
    fn from(inner: Automaton2D<T>) -> Self {
        Self::Automaton2D(inner)
    }
}
impl<T: Cell> From<Automaton3D<T>> for Automaton<T> {
    fn from(inner: Automaton3D<T>) -> Self {
        Self::Automaton3D(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ndvec::NdVec;

    #[test]
    fn test_setup_boundary_validation() {
        let mut ca = Automaton1D::<u32>::new();
        assert_eq!(Err(CaError::InvalidRadius), ca.setup_boundary(Boundary::Periodic, 0));
        // Unshaped: any positive radius is accepted for now.
        ca.setup_boundary(Boundary::CutOff, 4).unwrap();
        assert_eq!(Boundary::CutOff, ca.boundary());
        assert_eq!(4, ca.boundary_radius());
        // Shaping validates the stored radius against the dimensions.
        assert_eq!(
            Err(CaError::RadiusTooLarge),
            ca.setup_dimensions(NdVec([7]))
        );
        ca.setup_boundary(Boundary::CutOff, 3).unwrap();
        ca.setup_dimensions(NdVec([7])).unwrap();
        // And boundary changes validate against the shaped grid.
        assert_eq!(
            Err(CaError::RadiusTooLarge),
            ca.setup_boundary(Boundary::Periodic, 4)
        );
        // A failed setter leaves the configuration unchanged.
        assert_eq!(Boundary::CutOff, ca.boundary());
        assert_eq!(3, ca.boundary_radius());
    }

    #[test]
    fn test_setup_boundary_checks_every_axis() {
        let mut ca = Automaton2D::<u32>::new();
        ca.setup_dimensions(NdVec([4, 20])).unwrap();
        assert_eq!(
            Err(CaError::RadiusTooLarge),
            ca.setup_boundary(Boundary::Periodic, 3)
        );
        ca.setup_boundary(Boundary::Periodic, 2).unwrap();
    }

    #[test]
    fn test_setup_dimensions_only_once() {
        let mut ca = Automaton2D::<u32>::new();
        ca.setup_dimensions(NdVec([4, 4])).unwrap();
        assert_eq!(
            Err(CaError::AlreadyInitialized),
            ca.setup_dimensions(NdVec([8, 8]))
        );
        assert_eq!(Some(NdVec([4, 4])), ca.shape());
    }

    #[test]
    fn test_setup_cell_states() {
        let mut ca = Automaton1D::<u32>::new();
        assert_eq!(Err(CaError::InvalidNumStates), ca.setup_cell_states(1));
        assert_eq!(2, ca.num_states());
        ca.setup_cell_states(5).unwrap();
        assert_eq!(5, ca.num_states());
    }

    #[test]
    fn test_unshaped_operations_fail() {
        let mut ca = Automaton1D::<u32>::new();
        assert_eq!(Err(CaError::CellsNull), ca.step());
        assert_eq!(Err(CaError::CellsNull), ca.init_condition(1, 0.5));
        assert_eq!(Err(CaError::CellsNull), ca.render());
        assert_eq!(None, ca.shape());
    }

    #[test]
    fn test_custom_rule_missing() {
        let mut ca = Automaton1D::<u32>::new();
        ca.setup_dimensions(NdVec([8])).unwrap();
        ca.setup_rule(Rule::Custom);
        assert_eq!(Err(CaError::CustomRuleMissing), ca.step());
        // The failed step neither commits nor counts.
        assert_eq!(0, ca.steps_taken());
    }

    #[test]
    fn test_init_condition_validation_and_reproducibility() {
        let mut ca = Automaton1D::<u32>::new();
        ca.setup_dimensions(NdVec([64])).unwrap();
        assert_eq!(
            Err(CaError::InvalidStateCondition),
            ca.init_condition_seeded(2, 0.5, 1)
        );
        ca.init_condition_seeded(1, 0.5, 42).unwrap();
        let first: Vec<u32> = ca.grid().unwrap().cells().to_vec();
        assert!(first.iter().any(|&c| c == 1));

        let mut other = Automaton1D::<u32>::new();
        other.setup_dimensions(NdVec([64])).unwrap();
        other.init_condition_seeded(1, 0.5, 42).unwrap();
        assert_eq!(first, other.grid().unwrap().cells().to_vec());
    }

    #[test]
    fn test_init_condition_probability_extremes() {
        let mut ca = Automaton1D::<u32>::new();
        ca.setup_dimensions(NdVec([16])).unwrap();
        ca.init_condition_seeded(1, 0.0, 7).unwrap();
        assert!(ca.grid().unwrap().cells().iter().all(|&c| c == 0));
        ca.init_condition_seeded(1, 1.0, 7).unwrap();
        assert!(ca.grid().unwrap().cells().iter().all(|&c| c == 1));
    }

    #[test]
    fn test_seed_cell_validation() {
        let mut ca = Automaton2D::<u32>::new();
        assert_eq!(Err(CaError::InvalidState), ca.seed_cell(NdVec([0, 0]), 2));
        assert_eq!(Err(CaError::CellsNull), ca.seed_cell(NdVec([0, 0]), 1));
        ca.setup_dimensions(NdVec([4, 4])).unwrap();
        ca.seed_cell(NdVec([1, 2]), 1).unwrap();
        assert_eq!(Some(&1), ca.cell(NdVec([1, 2])));
    }

    #[test]
    fn test_render_formats() {
        let mut ca = Automaton1D::<u32>::new();
        ca.setup_dimensions(NdVec([4])).unwrap();
        ca.seed_cell(NdVec([1]), 1).unwrap();
        assert_eq!("0 1 0 0\n", ca.render().unwrap());

        let mut ca = Automaton2D::<u32>::new();
        ca.setup_dimensions(NdVec([2, 3])).unwrap();
        ca.seed_cell(NdVec([1, 0]), 1).unwrap();
        assert_eq!("0 0 0\n1 0 0\n", ca.render().unwrap());

        let mut ca = Automaton3D::<u32>::new();
        ca.setup_dimensions(NdVec([2, 2, 2])).unwrap();
        ca.seed_cell(NdVec([1, 0, 1]), 1).unwrap();
        assert_eq!(
            "Printing 0'th slice of Tensor\n0 0\n0 0\nPrinting 1'th slice of Tensor\n0 1\n0 0\n",
            ca.render().unwrap()
        );
    }

    #[test]
    fn test_rank_erased_automaton() {
        let mut ca = Automaton3D::<u32>::new();
        ca.setup_dimensions(NdVec([4, 4, 4])).unwrap();
        let mut erased = Automaton::from(ca);
        assert_eq!(3, erased.as_sim().ndim());
        erased.as_sim_mut().init_condition_seeded(1, 0.3, 9).unwrap();
        erased.as_sim_mut().step().unwrap();
        assert_eq!(1, erased.as_sim().steps_taken());
        assert!(Automaton::<u32>::with_ndim(4).is_none());
    }
}
