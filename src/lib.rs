//! Gravitational N-body simulation with two interchangeable force solvers:
//! exact pairwise summation and a Barnes-Hut quadtree approximation.

pub mod bodies;
pub mod config;
pub mod gravity;
pub mod integrator;
pub mod quadtree;

mod barnes_hut;
mod brute_force;

pub use barnes_hut::BarnesHut;
pub use brute_force::BruteForce;

use log::debug;
use nalgebra::Vector3;

use crate::bodies::Bodies;

/// How the per-body compute phase is scheduled.
///
/// Results are identical either way: each body only reads the shared
/// snapshot and writes its own force slot.
#[derive(Clone, Copy, Debug)]
pub enum Execution {
    SingleThreaded,
    /// Data-parallel over the rayon worker pool.
    Parallel,
}

/// A force-resolution strategy.
///
/// Overwrites every body's slot in `forces` with the net force on that body,
/// computed against the pre-step positions. Implementations must not touch
/// positions or velocities, so solvers stay interchangeable and the compute
/// phase stays read-only with respect to the body store.
pub trait ForceSolver: Send + Sync {
    fn compute_forces(&self, bodies: &Bodies, forces: &mut [Vector3<f64>], execution: Execution);
}

/// Drives the per-step loop: solve forces for all bodies, then integrate.
///
/// The two phases are strictly ordered; no position changes until the force
/// buffer is complete for every body.
#[derive(Clone, Debug)]
pub struct Simulation<S: ForceSolver> {
    bodies: Bodies,
    solver: S,
    forces: Vec<Vector3<f64>>,
    time_step: f64,
    execution: Execution,
}

impl<S: ForceSolver> Simulation<S> {
    #[must_use]
    pub fn new(bodies: Bodies, solver: S, time_step: f64) -> Self {
        let n = bodies.len();
        Self {
            bodies,
            solver,
            forces: vec![Vector3::zeros(); n],
            time_step,
            execution: Execution::SingleThreaded,
        }
    }

    #[must_use]
    pub fn parallel(mut self) -> Self {
        self.execution = Execution::Parallel;
        self
    }

    #[must_use]
    pub fn bodies(&self) -> &Bodies {
        &self.bodies
    }

    /// Forces accumulated during the most recent step.
    #[must_use]
    pub fn forces(&self) -> &[Vector3<f64>] {
        &self.forces
    }

    /// Advance the system by one time step.
    pub fn step(&mut self) {
        for force in &mut self.forces {
            *force = Vector3::zeros();
        }

        self.solver
            .compute_forces(&self.bodies, &mut self.forces, self.execution);
        integrator::integrate(&mut self.bodies, &self.forces, self.time_step);
    }

    pub fn run(&mut self, num_steps: usize) {
        for t in 0..num_steps {
            if t % 100 == 0 {
                debug!("{t} out of {num_steps} time steps done");
            }
            self.step();
        }
        debug!("simulation finished after {num_steps} steps");
    }
}
