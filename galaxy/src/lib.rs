//! Toy galaxy-formation model built on the CA kernel.
//!
//! Star systems live on a 3D periodic lattice. Each occupied cell carries a
//! mass and a velocity; every step it accumulates the gravitational pull of
//! its Von Neumann neighbors, integrates velocity and displacement over a
//! configurable time step, and walks the displacement along a Bresenham
//! line, merging inelastically with the first occupied cell on the path.
//!
//! The model is an ordinary client of the engine's `Custom` rule: the rule
//! is a closure capturing the model parameters, occupancy is read from the
//! neighborhood view of the previous generation, and write conflicts
//! resolve by the engine's documented last-write-wins behavior.

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use cagrid_core::geometry::{self, Neighborhood};
use cagrid_core::{
    Automaton3D, Boundary, CaError, CaResult, Cell, Dim3D, IVec3D, NdVec, Rule, UVec3D,
};

/// A star system: the cell type of the galaxy model.
///
/// State `0` is empty space; an occupied cell's state counts the systems
/// that merged into it.
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyCell {
    /// Number of merged systems, or 0 for empty space.
    pub state: u32,
    /// Velocity vector, one component per axis.
    pub velocity: [f64; 3],
    /// Total mass of the system.
    pub mass: f64,
}

impl Default for GalaxyCell {
    fn default() -> Self {
        Self {
            state: 0,
            velocity: [0.0; 3],
            mass: 0.0,
        }
    }
}

impl Cell for GalaxyCell {
    fn state(&self) -> u32 {
        self.state
    }
    fn set_state(&mut self, state: u32) {
        self.state = state;
    }
}

/// Parameters the formation rule needs from the model; copied into the
/// rule closure so the rule carries no shared state.
#[derive(Debug, Copy, Clone)]
struct RuleParams {
    time_step: f64,
    radius: usize,
    size: UVec3D,
}

/// The galaxy model: validated parameters plus the CA instance.
#[derive(Debug)]
pub struct Galaxy {
    /// Time step for integrating forces each simulation step.
    pub time_step: f64,
    /// Minimum mass a seeded cell may receive.
    pub min_mass: u32,
    /// Maximum mass a seeded cell may receive (exclusive).
    pub max_mass: u32,
    /// Probability that a cell starts occupied.
    pub density: f64,
    /// Cutoff distance above which forces are not considered.
    pub boundary_radius: usize,
    /// Grid size along the first axis.
    pub axis1_dim: usize,
    /// Grid size along the second axis.
    pub axis2_dim: usize,
    /// Grid size along the third axis.
    pub axis3_dim: usize,
    ca: Automaton3D<GalaxyCell>,
}

impl Default for Galaxy {
    fn default() -> Self {
        Self {
            time_step: 0.1,
            min_mass: 1,
            max_mass: 100,
            density: 0.3,
            boundary_radius: 3,
            axis1_dim: 6,
            axis2_dim: 6,
            axis3_dim: 6,
            ca: Automaton3D::new(),
        }
    }
}

impl Galaxy {
    /// Creates a galaxy model from the given parameters.
    ///
    /// Invalid parameters fall back to defaults with a logged warning
    /// instead of failing, so an interactive caller always gets a runnable
    /// model.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time_step: f64,
        min_mass: u32,
        max_mass: u32,
        density: f64,
        boundary_radius: usize,
        axis1_dim: usize,
        axis2_dim: usize,
        axis3_dim: usize,
    ) -> Self {
        let mut galaxy = Self::default();

        if time_step <= 0.0 {
            warn!(
                "invalid time_step; must be > 0, using default {}",
                galaxy.time_step
            );
        } else {
            galaxy.time_step = time_step;
        }

        if min_mass < 1 {
            warn!("invalid min_mass; must be >= 1, using default {}", galaxy.min_mass);
        } else {
            galaxy.min_mass = min_mass;
        }

        if max_mass <= galaxy.min_mass {
            galaxy.max_mass = galaxy.min_mass + 99;
            warn!(
                "invalid max_mass; must be > min_mass, using default {}",
                galaxy.max_mass
            );
        } else {
            galaxy.max_mass = max_mass;
        }

        if density <= 0.0 || density > 1.0 {
            warn!(
                "invalid density; must be in (0, 1], using default {}",
                galaxy.density
            );
        } else {
            galaxy.density = density;
        }

        for (dim, label, target) in [
            (axis1_dim, "axis1_dim", &mut galaxy.axis1_dim),
            (axis2_dim, "axis2_dim", &mut galaxy.axis2_dim),
            (axis3_dim, "axis3_dim", &mut galaxy.axis3_dim),
        ] {
            if dim < 3 {
                warn!("invalid {}; must be >= 3, using default {}", label, *target);
            } else {
                *target = dim;
            }
        }

        let min_axis = galaxy
            .axis1_dim
            .min(galaxy.axis2_dim)
            .min(galaxy.axis3_dim);
        if boundary_radius == 0 || boundary_radius > min_axis / 2 {
            galaxy.boundary_radius = min_axis / 2;
            warn!(
                "invalid boundary_radius; must be in [1, {}], setting to {}",
                min_axis / 2,
                galaxy.boundary_radius
            );
        } else {
            galaxy.boundary_radius = boundary_radius;
        }

        galaxy
    }

    /// Sets up the CA instance and seeds the initial star systems from an
    /// entropy-derived seed.
    ///
    /// May be called again to restart the simulation with the same
    /// parameters; the old grid is discarded.
    pub fn init_galaxy(&mut self) -> CaResult<()> {
        self.init_galaxy_seeded(rand::random())
    }

    /// Sets up the CA instance and seeds the initial star systems,
    /// reproducibly.
    pub fn init_galaxy_seeded(&mut self, seed: u64) -> CaResult<()> {
        let size = NdVec([self.axis1_dim, self.axis2_dim, self.axis3_dim]);
        match self.ca.setup_dimensions(size) {
            // Restarting: replace the CA instance and shape it afresh.
            Err(CaError::AlreadyInitialized) => {
                self.ca = Automaton3D::new();
                self.ca.setup_dimensions(size)?;
            }
            other => other?,
        }
        self.ca.setup_boundary(Boundary::Periodic, self.boundary_radius)?;
        self.ca.setup_neighborhood(Neighborhood::VonNeumann);
        self.ca.setup_rule(Rule::Custom);
        self.ca.init_condition_seeded(1, self.density, seed)?;

        // Occupied cells get a uniform integer mass in [min_mass, max_mass).
        let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(1));
        let (min_mass, max_mass) = (self.min_mass, self.max_mass);
        for cell in self.ca.grid_mut().ok_or(CaError::CellsNull)?.cells_mut() {
            if cell.state != 0 {
                cell.mass = f64::from(rng.gen_range(min_mass..max_mass));
            }
        }

        info!("starting simulation");
        self.ca.print_grid()?;
        Ok(())
    }

    /// Runs the simulation for the given number of steps and prints the
    /// final state.
    pub fn simulation(&mut self, steps: u32) -> CaResult<()> {
        let steps = if steps < 1 {
            warn!("invalid number of steps; must be > 0, taking 1 step");
            1
        } else {
            steps
        };
        for _ in 0..steps {
            self.step_once()?;
        }
        info!("simulation finished after {} steps", self.ca.steps_taken());
        self.ca.print_grid()?;
        Ok(())
    }

    /// Advances the model by one step.
    fn step_once(&mut self) -> CaResult<()> {
        let params = RuleParams {
            time_step: self.time_step,
            radius: self.boundary_radius,
            size: self
                .ca
                .shape()
                .ok_or(CaError::CellsNull)?,
        };
        self.ca.step_with(move |pos: &mut UVec3D, nbhd: &[GalaxyCell], cell: &mut GalaxyCell| {
            formation_rule(params, pos, nbhd, cell)
        })
    }
}

/// Custom CA rule simulating the motion of one star system.
fn formation_rule(params: RuleParams, pos: &mut UVec3D, nbhd: &[GalaxyCell], cell: &mut GalaxyCell) {
    if cell.state == 0 {
        return; // empty space
    }

    // The neighborhood includes the cell of interest at its center.
    let center = nbhd.len() / 2;
    let mut total_force = [0.0; 3];
    for (i, neighbor) in nbhd.iter().enumerate() {
        if i == center || neighbor.state == 0 {
            continue;
        }
        let offset = geometry::von_neumann_offset::<Dim3D>(params.radius, i);
        let force = gravitational_force(cell, neighbor, offset);
        for (total, component) in total_force.iter_mut().zip(force) {
            *total += component;
        }
    }

    let accel = compute_accel(total_force, cell.mass);
    let velocity = compute_velocity(accel, cell, params.time_step);
    let displacement = compute_displacement(velocity, cell, params.time_step);
    cell.velocity = velocity;

    set_new_position(params, pos, nbhd, cell, displacement);
}

/// Gravitational pull of `neighbor` on the cell of interest, which sits at
/// the origin of the offset.
///
/// `F = m1 * m2 / |r|^2` directed along the offset toward the neighbor.
fn gravitational_force(cell: &GalaxyCell, neighbor: &GalaxyCell, offset: IVec3D) -> [f64; 3] {
    let r: Vec<f64> = (0..3).map(|i| offset.0[i] as f64).collect();
    let norm = (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt();
    let magnitude = cell.mass * neighbor.mass / (norm * norm);
    [
        magnitude * r[0] / norm,
        magnitude * r[1] / norm,
        magnitude * r[2] / norm,
    ]
}

/// `A = F / m`, per component.
fn compute_accel(total_force: [f64; 3], mass: f64) -> [f64; 3] {
    [
        total_force[0] / mass,
        total_force[1] / mass,
        total_force[2] / mass,
    ]
}

/// `V = v_i + a * dt`, per component.
fn compute_velocity(accel: [f64; 3], cell: &GalaxyCell, time_step: f64) -> [f64; 3] {
    [
        cell.velocity[0] + accel[0] * time_step,
        cell.velocity[1] + accel[1] * time_step,
        cell.velocity[2] + accel[2] * time_step,
    ]
}

/// `D = (v_i + v_f) / 2 * dt`, per component.
fn compute_displacement(velocity: [f64; 3], cell: &GalaxyCell, time_step: f64) -> [f64; 3] {
    [
        0.5 * (cell.velocity[0] + velocity[0]) * time_step,
        0.5 * (cell.velocity[1] + velocity[1]) * time_step,
        0.5 * (cell.velocity[2] + velocity[2]) * time_step,
    ]
}

/// Velocity after an inelastic merge: momentum is conserved, so
/// `v' = (m1 v1 + m2 v2) / (m1 + m2)` per component.
fn merge_velocity(cell: &GalaxyCell, other: &GalaxyCell) -> [f64; 3] {
    let total = cell.mass + other.mass;
    [
        (cell.mass * cell.velocity[0] + other.mass * other.velocity[0]) / total,
        (cell.mass * cell.velocity[1] + other.mass * other.velocity[1]) / total,
        (cell.mass * cell.velocity[2] + other.mass * other.velocity[2]) / total,
    ]
}

/// Rounds half away from zero, like the original integer conversion.
fn round_int(value: f64) -> isize {
    if value < 0.0 {
        (value - 0.5) as isize
    } else {
        (value + 0.5) as isize
    }
}

/// Flat neighborhood position of an offset in the Von Neumann layout, or
/// `None` if the offset is off-axis or beyond the radius.
///
/// Inverse of [`geometry::von_neumann_offset`] for rank 3.
fn vn_flat_index(radius: usize, offset: IVec3D) -> Option<usize> {
    let r = radius as isize;
    let [x, y, z] = offset.0;
    let nonzero = [x, y, z].iter().filter(|&&c| c != 0).count();
    if nonzero > 1 || x.abs() > r || y.abs() > r || z.abs() > r {
        return None;
    }
    let q = if x != 0 {
        if x < 0 {
            x + r
        } else {
            x + 5 * r
        }
    } else if y != 0 {
        if y < 0 {
            y + 2 * r
        } else {
            y + 4 * r
        }
    } else {
        z + 3 * r
    };
    Some(q as usize)
}

/// Checks the cell at `pos + offset` for a collision and merges into it if
/// occupied.
///
/// Occupancy comes from the previous generation via the neighborhood view;
/// path cells outside the Von Neumann cutoff are treated as empty. On a
/// merge the focus coordinate is moved to the collision site and the
/// merged state, mass, and velocity are written into the focus cell.
fn did_collide(
    params: RuleParams,
    pos: &mut UVec3D,
    nbhd: &[GalaxyCell],
    offset: IVec3D,
    cell: &mut GalaxyCell,
) -> bool {
    if offset.is_zero() {
        return false; // a cell cannot collide with itself
    }
    let Some(q) = vn_flat_index(params.radius, offset) else {
        return false;
    };
    let other = &nbhd[q];
    if other.state == 0 {
        return false;
    }
    cell.velocity = merge_velocity(cell, other);
    cell.state += other.state;
    cell.mass += other.mass;
    *pos = geometry::wrap_vec(*pos, offset, params.size);
    true
}

/// Walks the displacement vector from the focus cell using Bresenham's
/// line algorithm, stopping at the first collision; without one, the focus
/// coordinate moves to the periodic-wrapped end of the path.
fn set_new_position(
    params: RuleParams,
    pos: &mut UVec3D,
    nbhd: &[GalaxyCell],
    cell: &mut GalaxyCell,
    displacement: [f64; 3],
) {
    let dx = round_int(displacement[0]);
    let dy = round_int(displacement[1]);
    let dz = round_int(displacement[2]);

    let x_inc: isize = if dx < 0 { -1 } else { 1 };
    let y_inc: isize = if dy < 0 { -1 } else { 1 };
    let z_inc: isize = if dz < 0 { -1 } else { 1 };
    let l = dx.abs();
    let m = dy.abs();
    let n = dz.abs();
    let dx2 = l << 1;
    let dy2 = m << 1;
    let dz2 = n << 1;

    let mut offset = IVec3D::origin();

    if l >= m && l >= n {
        let mut err_1 = dy2 - l;
        let mut err_2 = dz2 - l;
        for _ in 0..l {
            if did_collide(params, pos, nbhd, offset, cell) {
                return;
            }
            if err_1 > 0 {
                offset.0[1] += y_inc;
                err_1 -= dx2;
            }
            if err_2 > 0 {
                offset.0[2] += z_inc;
                err_2 -= dx2;
            }
            err_1 += dy2;
            err_2 += dz2;
            offset.0[0] += x_inc;
        }
    } else if m >= l && m >= n {
        let mut err_1 = dx2 - m;
        let mut err_2 = dz2 - m;
        for _ in 0..m {
            if did_collide(params, pos, nbhd, offset, cell) {
                return;
            }
            if err_1 > 0 {
                offset.0[0] += x_inc;
                err_1 -= dy2;
            }
            if err_2 > 0 {
                offset.0[2] += z_inc;
                err_2 -= dy2;
            }
            err_1 += dx2;
            err_2 += dz2;
            offset.0[1] += y_inc;
        }
    } else {
        let mut err_1 = dy2 - n;
        let mut err_2 = dx2 - n;
        for _ in 0..n {
            if did_collide(params, pos, nbhd, offset, cell) {
                return;
            }
            if err_1 > 0 {
                offset.0[1] += y_inc;
                err_1 -= dz2;
            }
            if err_2 > 0 {
                offset.0[0] += x_inc;
                err_2 -= dz2;
            }
            err_1 += dy2;
            err_2 += dx2;
            offset.0[2] += z_inc;
        }
    }

    if did_collide(params, pos, nbhd, offset, cell) {
        return;
    }

    // No collision along the path; just take the new position.
    *pos = geometry::wrap_vec(*pos, offset, params.size);
}
