use log::trace;
use nalgebra::Vector3;
use rayon::prelude::*;

use crate::{bodies::Bodies, gravity::Gravity, quadtree::QuadTree, Execution, ForceSolver};

/// Hierarchical Barnes-Hut approximation, O(N log N).
///
/// Builds a fresh quadtree sequentially, then resolves the force on each body
/// by traversal. The tree is only read during the solve, so the per-body loop
/// parallelizes without synchronization.
#[derive(Clone, Copy, Debug)]
pub struct BarnesHut {
    gravity: Gravity,
    theta: f64,
}

impl BarnesHut {
    #[must_use]
    pub fn new(gravity: Gravity, theta: f64) -> Self {
        Self { gravity, theta }
    }
}

impl ForceSolver for BarnesHut {
    fn compute_forces(&self, bodies: &Bodies, forces: &mut [Vector3<f64>], execution: Execution) {
        let tree = QuadTree::build(bodies);
        trace!("built quadtree, total mass {}", tree.total_mass());

        match execution {
            Execution::SingleThreaded => {
                forces.iter_mut().enumerate().for_each(|(i, f)| {
                    *f = tree.force_on(bodies, i, &self.gravity, self.theta);
                });
            }
            Execution::Parallel => {
                forces.par_iter_mut().enumerate().for_each(|(i, f)| {
                    *f = tree.force_on(bodies, i, &self.gravity, self.theta);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use crate::brute_force::BruteForce;

    use super::*;

    fn planar_cloud(n: usize, seed: u64) -> Bodies {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                (
                    rng.gen_range(1.0..1000.0),
                    Vector3::new(rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0), 0.),
                    Vector3::zeros(),
                )
            })
            .collect()
    }

    #[test]
    fn theta_zero_reproduces_brute_force() {
        let bodies = planar_cloud(50, 0);
        let gravity = Gravity::new(1., 1e-4);

        let mut exact = vec![Vector3::zeros(); 50];
        BruteForce::new(gravity).compute_forces(&bodies, &mut exact, Execution::SingleThreaded);

        let mut approximate = vec![Vector3::zeros(); 50];
        BarnesHut::new(gravity, f64::MIN_POSITIVE).compute_forces(
            &bodies,
            &mut approximate,
            Execution::SingleThreaded,
        );

        // identical contributions, summed in tree order instead of index order
        let tol = 1e-9 * exact.iter().map(|e| e.norm()).fold(1., f64::max);
        for (e, a) in exact.iter().zip(&approximate) {
            assert_abs_diff_eq!(*e, *a, epsilon = tol);
        }
    }

    #[test]
    fn accuracy_improves_as_theta_shrinks() {
        let bodies = planar_cloud(100, 1);
        let gravity = Gravity::new(1., 1e-4);

        let mut exact = vec![Vector3::zeros(); 100];
        BruteForce::new(gravity).compute_forces(&bodies, &mut exact, Execution::SingleThreaded);

        let error = |theta: f64| {
            let mut approximate = vec![Vector3::zeros(); 100];
            BarnesHut::new(gravity, theta).compute_forces(
                &bodies,
                &mut approximate,
                Execution::SingleThreaded,
            );
            exact
                .iter()
                .zip(&approximate)
                .map(|(e, a)| (e - a).norm())
                .fold(0., f64::max)
        };

        let coarse = error(1.0);
        let fine = error(0.1);
        assert!(fine <= coarse);

        let scale = exact.iter().map(|e| e.norm()).fold(0., f64::max);
        assert!(fine <= 1e-2 * scale);
    }

    #[test]
    fn parallel_solve_matches_single_threaded() {
        let bodies = planar_cloud(64, 2);
        let solver = BarnesHut::new(Gravity::new(1., 1e-4), 0.5);

        let mut single = vec![Vector3::zeros(); 64];
        solver.compute_forces(&bodies, &mut single, Execution::SingleThreaded);

        let mut parallel = vec![Vector3::zeros(); 64];
        solver.compute_forces(&bodies, &mut parallel, Execution::Parallel);

        assert_eq!(single, parallel);
    }

    #[test]
    fn z_component_is_never_driven_by_the_planar_tree() {
        let mut bodies = planar_cloud(20, 3);
        for pos in &mut bodies.positions {
            pos[2] = 17.;
        }

        let solver = BarnesHut::new(Gravity::new(1., 1e-4), 0.5);
        let mut forces = vec![Vector3::zeros(); 20];
        solver.compute_forces(&bodies, &mut forces, Execution::SingleThreaded);

        for f in &forces {
            assert_eq!(f[2], 0.);
        }
    }
}
