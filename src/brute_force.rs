use nalgebra::Vector3;
use rayon::prelude::*;

use crate::{bodies::Bodies, gravity::Gravity, Execution, ForceSolver};

/// Exact pairwise summation over all body pairs, O(N^2).
#[derive(Clone, Copy, Debug)]
pub struct BruteForce {
    gravity: Gravity,
}

impl BruteForce {
    #[must_use]
    pub fn new(gravity: Gravity) -> Self {
        Self { gravity }
    }

    fn force_on(&self, bodies: &Bodies, target: usize) -> Vector3<f64> {
        let position = bodies.positions[target];
        let mass = bodies.masses[target];

        let mut force = Vector3::zeros();
        for other in 0..bodies.len() {
            if other == target {
                continue;
            }
            force += self
                .gravity
                .force(position, mass, bodies.positions[other], bodies.masses[other]);
        }
        force
    }
}

impl ForceSolver for BruteForce {
    fn compute_forces(&self, bodies: &Bodies, forces: &mut [Vector3<f64>], execution: Execution) {
        match execution {
            Execution::SingleThreaded => {
                forces.iter_mut().enumerate().for_each(|(i, f)| {
                    *f = self.force_on(bodies, i);
                });
            }
            Execution::Parallel => {
                forces.par_iter_mut().enumerate().for_each(|(i, f)| {
                    *f = self.force_on(bodies, i);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn forces_are_antisymmetric() {
        let bodies = Bodies::new(
            vec![1e6, 1e6],
            vec![Vector3::new(1., 0., 0.), Vector3::new(-1., 0., 0.)],
            vec![Vector3::zeros(); 2],
        );

        let solver = BruteForce::new(Gravity::new(crate::gravity::G, 0.));
        let mut forces = vec![Vector3::zeros(); 2];
        solver.compute_forces(&bodies, &mut forces, Execution::SingleThreaded);

        assert_abs_diff_eq!(forces[0], -forces[1], epsilon = 1e-12);
    }

    #[test]
    fn reference_two_body_force() {
        let bodies = Bodies::new(
            vec![5., 10.],
            vec![Vector3::zeros(), Vector3::new(10., 0., 0.)],
            vec![Vector3::zeros(); 2],
        );

        let solver = BruteForce::new(Gravity::new(1., 0.));
        let mut forces = vec![Vector3::zeros(); 2];
        solver.compute_forces(&bodies, &mut forces, Execution::SingleThreaded);

        // G m1 m2 / d^2 = 1 * 5 * 10 / 100
        assert_abs_diff_eq!(forces[0], Vector3::new(0.5, 0., 0.));
        assert_abs_diff_eq!(forces[1], Vector3::new(-0.5, 0., 0.));
    }

    #[test]
    fn coincident_pair_produces_finite_forces() {
        let pos = Vector3::new(2., 2., 2.);
        let bodies = Bodies::new(vec![1., 1.], vec![pos, pos], vec![Vector3::zeros(); 2]);

        let solver = BruteForce::new(Gravity::new(1., 1e-6));
        let mut forces = vec![Vector3::zeros(); 2];
        solver.compute_forces(&bodies, &mut forces, Execution::SingleThreaded);

        for f in &forces {
            assert!(f.iter().all(|c| c.is_finite()));
        }
    }
}
