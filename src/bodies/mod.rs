mod creator;

pub use creator::*;

use nalgebra::{Vector2, Vector3};

/// A collection of point masses.
///
/// This struct uses the Struct-of-Arrays (SoA) architecture: positions and
/// velocities are 3D, while the quadtree only partitions the x/y plane.
#[derive(Clone, Debug)]
pub struct Bodies {
    pub masses: Vec<f64>,
    pub positions: Vec<Vector3<f64>>,
    pub velocities: Vec<Vector3<f64>>,
}

impl Bodies {
    /// # Panics
    /// Panics if the arrays have different lengths.
    #[must_use]
    pub fn new(
        masses: Vec<f64>,
        positions: Vec<Vector3<f64>>,
        velocities: Vec<Vector3<f64>>,
    ) -> Self {
        let len = masses.len();
        assert_eq!(len, positions.len());
        assert_eq!(len, velocities.len());

        Self {
            masses,
            positions,
            velocities,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Position of body `index` projected onto the plane the tree partitions.
    #[must_use]
    pub fn planar_position(&self, index: usize) -> Vector2<f64> {
        self.positions[index].xy()
    }

    /// Total kinetic plus pairwise potential energy, for drift checks.
    #[must_use]
    pub fn mechanical_energy(&self, constant: f64) -> f64 {
        let kinetic: f64 = self
            .masses
            .iter()
            .zip(&self.velocities)
            .map(|(m, v)| 0.5 * m * v.norm_squared())
            .sum();

        let mut potential = 0.;
        for i in 0..self.len() {
            for j in (i + 1)..self.len() {
                let dist = (self.positions[j] - self.positions[i]).norm();
                if dist > 0. {
                    potential -= constant * self.masses[i] * self.masses[j] / dist;
                }
            }
        }

        kinetic + potential
    }
}

impl FromIterator<(f64, Vector3<f64>, Vector3<f64>)> for Bodies {
    fn from_iter<T: IntoIterator<Item = (f64, Vector3<f64>, Vector3<f64>)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let cap = iter.size_hint().0;
        let mut masses = Vec::with_capacity(cap);
        let mut positions = Vec::with_capacity(cap);
        let mut velocities = Vec::with_capacity(cap);

        for (m, p, v) in iter {
            masses.push(m);
            positions.push(p);
            velocities.push(v);
        }

        Self {
            masses,
            positions,
            velocities,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    use super::*;

    #[test]
    fn collect_from_tuples() {
        let bodies: Bodies = (0..4)
            .map(|i| {
                (
                    i as f64 + 1.,
                    Vector3::new(i as f64, 0., 0.),
                    Vector3::zeros(),
                )
            })
            .collect();

        assert_eq!(bodies.len(), 4);
        assert_abs_diff_eq!(bodies.masses[3], 4.);
        assert_abs_diff_eq!(bodies.positions[2][0], 2.);
    }

    #[test]
    fn planar_position_drops_z() {
        let bodies = Bodies::new(
            vec![1.],
            vec![Vector3::new(1., 2., 3.)],
            vec![Vector3::zeros()],
        );

        assert_eq!(bodies.planar_position(0), nalgebra::Vector2::new(1., 2.));
    }
}
