use nalgebra::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use crate::config::SimulationConfig;

use super::Bodies;

/// Produces initial conditions for a simulation run.
pub trait BodyCreator {
    fn create_body(&mut self) -> (f64, Vector3<f64>, Vector3<f64>);

    fn create_bodies(&mut self, n: usize) -> Bodies {
        (0..n).map(|_| self.create_body()).collect()
    }
}

/// Samples masses, positions, and velocities from arbitrary distributions.
///
/// The RNG is passed in explicitly so fixtures stay reproducible; there is no
/// implicit process-wide random state anywhere in the crate.
pub struct DistrBodyCreator<R, MD, PD, VD>
where
    R: Rng,
    MD: Distribution<f64>,
    PD: Distribution<f64>,
    VD: Distribution<f64>,
{
    rng: R,
    mass_distr: MD,
    position_distr: PD,
    velocity_distr: VD,
}

impl<R, MD, PD, VD> DistrBodyCreator<R, MD, PD, VD>
where
    R: Rng,
    MD: Distribution<f64>,
    PD: Distribution<f64>,
    VD: Distribution<f64>,
{
    pub fn new(mass_distr: MD, position_distr: PD, velocity_distr: VD, rng: R) -> Self {
        Self {
            rng,
            mass_distr,
            position_distr,
            velocity_distr,
        }
    }
}

impl<R, MD, PD, VD> BodyCreator for DistrBodyCreator<R, MD, PD, VD>
where
    R: Rng,
    MD: Distribution<f64>,
    PD: Distribution<f64>,
    VD: Distribution<f64>,
{
    fn create_body(&mut self) -> (f64, Vector3<f64>, Vector3<f64>) {
        let mass = self.mass_distr.sample(&mut self.rng);
        let position = Vector3::from_fn(|_, _| self.position_distr.sample(&mut self.rng));
        let velocity = Vector3::from_fn(|_, _| self.velocity_distr.sample(&mut self.rng));
        (mass, position, velocity)
    }
}

/// Uniform cloud from the run configuration: positions in `[0, world_size)`,
/// velocities in `[0, velocity_scale)`, masses in `[1, mass_scale]`.
#[must_use]
pub fn uniform_cloud(config: &SimulationConfig) -> Bodies {
    let rng = StdRng::seed_from_u64(config.seed);
    let mut creator = DistrBodyCreator::new(
        Uniform::new_inclusive(1., config.mass_scale),
        Uniform::new(0., config.world_size),
        Uniform::new(0., config.velocity_scale),
        rng,
    );

    creator.create_bodies(config.num_bodies)
}
