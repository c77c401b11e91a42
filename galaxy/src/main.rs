//! Interactive driver for the galaxy model.
//!
//! Prompts for every simulation parameter, re-prompting on garbage input,
//! then runs the model. Exits with 0 on a clean run and with the engine's
//! negative error code otherwise.

use std::io::{self, BufRead, Write};
use std::process;

use cagrid_galaxy::Galaxy;

/// Reads one line from stdin, or exits cleanly if the stream is closed.
fn read_line() -> String {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => {
            eprintln!("input stream closed");
            process::exit(1);
        }
        Ok(_) => line,
    }
}

fn input_failure() {
    println!("Invalid Input! Please input a valid numeric value.");
}

/// Prompts until the user supplies an integer in `[min, max)`; `max` of
/// `None` leaves the range unbounded above.
fn get_int_value(message: &str, min: usize, max: Option<usize>) -> usize {
    loop {
        print!("{}", message);
        let _ = io::stdout().flush();
        match read_line().trim().parse::<usize>() {
            Ok(x) if x >= min && max.map_or(true, |max| x < max) => return x,
            _ => input_failure(),
        }
    }
}

/// Prompts until the user supplies a float in `[min, max]`; `max` of
/// `None` leaves the range unbounded above.
fn get_float_value(message: &str, min: f64, max: Option<f64>) -> f64 {
    loop {
        print!("{}", message);
        let _ = io::stdout().flush();
        match read_line().trim().parse::<f64>() {
            Ok(x) if x >= min && max.map_or(true, |max| x <= max) => return x,
            _ => input_failure(),
        }
    }
}

fn main() {
    simple_logger::init().unwrap();

    // Grid dimensions.
    let axis1_dim = get_int_value("Input the desired z dimension size (>= 3): ", 3, None);
    let axis2_dim = get_int_value("Input the desired x dimension size (>= 3): ", 3, None);
    let axis3_dim = get_int_value("Input the desired y dimension size (>= 3): ", 3, None);

    // Cell mass range.
    let min_mass = get_int_value("Input the minimum mass a cell may have (>= 1): ", 1, None);
    let max_mass = get_int_value(
        &format!("Input the maximum mass a cell can have (> {}): ", min_mass),
        min_mass + 1,
        None,
    );

    let density = get_float_value(
        "Input the desired density of the cellular automata grid (0.0 < density <= 1.0): ",
        f64::MIN_POSITIVE,
        Some(1.0),
    );

    // The force cutoff must fit inside the smallest axis the user gave.
    let max_radius = axis2_dim.min(axis3_dim) / 2;
    let boundary_radius = get_int_value(
        &format!(
            "Input maximum distance to account for forces (1 <= distance <= {}): ",
            max_radius
        ),
        1,
        Some(max_radius + 1),
    );

    let time_step = get_float_value(
        "Input the desired simulation time_step (>= 0.1): ",
        0.1,
        None,
    );
    let steps = get_int_value(
        "Input the number of steps the simulation should take (>= 1): ",
        1,
        None,
    );
    println!();

    let mut galaxy = Galaxy::new(
        time_step,
        min_mass as u32,
        max_mass as u32,
        density,
        boundary_radius,
        axis1_dim,
        axis2_dim,
        axis3_dim,
    );

    let result = galaxy
        .init_galaxy()
        .and_then(|()| galaxy.simulation(steps as u32));
    if let Err(error) = result {
        eprintln!("{}", error);
        process::exit(error.code());
    }
}
