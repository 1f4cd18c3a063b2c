use std::error::Error;
use std::fmt;

use crate::gravity;

/// Which force resolver the driver runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverKind {
    /// Exact pairwise summation, O(N^2).
    BruteForce,
    /// Quadtree approximation, O(N log N).
    BarnesHut,
}

/// Run-time configuration for a simulation run.
///
/// Validated once before the run starts; the physics loop itself never
/// rejects input.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub num_bodies: usize,
    pub constant: f64,
    pub softening: f64,
    pub time_step: f64,
    pub num_steps: usize,
    pub theta: f64,
    pub world_size: f64,
    pub velocity_scale: f64,
    pub mass_scale: f64,
    pub solver: SolverKind,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_bodies: 1000,
            constant: gravity::G,
            softening: 0.,
            time_step: 1e-3,
            num_steps: 1000,
            theta: 0.5,
            world_size: 1000.,
            velocity_scale: 100.,
            mass_scale: 1000.,
            solver: SolverKind::BarnesHut,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_bodies == 0 {
            return Err(ConfigError::NoBodies);
        }
        if self.constant <= 0. {
            return Err(ConfigError::NonPositive("gravitational constant", self.constant));
        }
        if self.softening < 0. {
            return Err(ConfigError::NegativeSoftening(self.softening));
        }
        if self.time_step <= 0. {
            return Err(ConfigError::NonPositive("time step", self.time_step));
        }
        if self.theta <= 0. {
            return Err(ConfigError::NonPositive("theta", self.theta));
        }
        if self.world_size <= 0. {
            return Err(ConfigError::NonPositive("world size", self.world_size));
        }
        if self.velocity_scale <= 0. {
            return Err(ConfigError::NonPositive("velocity scale", self.velocity_scale));
        }
        if self.mass_scale < 1. {
            return Err(ConfigError::MassScaleBelowOne(self.mass_scale));
        }
        Ok(())
    }
}

/// A configuration value that would make the simulation meaningless.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NoBodies,
    NonPositive(&'static str, f64),
    NegativeSoftening(f64),
    MassScaleBelowOne(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBodies => write!(f, "at least one body is required"),
            Self::NonPositive(name, value) => {
                write!(f, "{name} must be positive, got {value}")
            }
            Self::NegativeSoftening(value) => {
                write!(f, "softening length must be non-negative, got {value}")
            }
            Self::MassScaleBelowOne(value) => {
                write!(f, "mass scale must be at least 1, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}
