use nalgebra::SVector;

/// Gravitational constant in SI units.
pub const G: f64 = 6.6743015e-11;

/// Newtonian gravity with a minimum-distance floor.
///
/// The softening length caps the force magnitude at separations below it,
/// so near-coincident bodies cannot produce unbounded forces.
#[derive(Clone, Copy, Debug)]
pub struct Gravity {
    pub constant: f64,
    pub softening: f64,
}

impl Gravity {
    #[must_use]
    pub fn new(constant: f64, softening: f64) -> Self {
        Self {
            constant,
            softening,
        }
    }

    /// Force exerted on body 1 by body 2.
    ///
    /// Dimension generic: the brute-force solver evaluates it in 3D, the
    /// quadtree in the x/y plane. Exactly coincident positions contribute
    /// nothing, since no direction is defined there.
    #[must_use]
    pub fn force<const D: usize>(
        &self,
        position1: SVector<f64, D>,
        mass1: f64,
        position2: SVector<f64, D>,
        mass2: f64,
    ) -> SVector<f64, D> {
        let r = position2 - position1;
        let dist = r.norm();
        if dist == 0. {
            return SVector::zeros();
        }

        let eff = dist.max(self.softening);
        r * (self.constant * mass1 * mass2 / (eff * eff * dist))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::{Vector2, Vector3};

    use super::*;

    #[test]
    fn attractive_along_separation() {
        let gravity = Gravity::new(1., 0.);
        let f = gravity.force(Vector3::new(1., 0., 0.), 1., Vector3::new(-1., 0., 0.), 1.);

        assert!(f[0] < 0.);
        assert_abs_diff_eq!(f[1], 0.);
        assert_abs_diff_eq!(f[2], 0.);
    }

    #[test]
    fn exact_above_softening() {
        let gravity = Gravity::new(1., 1e-3);
        let f = gravity.force(Vector2::zeros(), 5., Vector2::new(10., 0.), 10.);

        assert_abs_diff_eq!(f[0], 0.5);
        assert_abs_diff_eq!(f[1], 0.);
    }

    #[test]
    fn floored_below_softening() {
        let gravity = Gravity::new(1., 1.);
        let f = gravity.force(Vector3::zeros(), 1., Vector3::new(1e-6, 0., 0.), 1.);

        // magnitude capped at G m1 m2 / eps^2, direction preserved
        assert_abs_diff_eq!(f.norm(), 1.);
        assert!(f[0] > 0.);
    }

    #[test]
    fn coincident_positions_yield_zero() {
        let gravity = Gravity::new(1., 0.);
        let pos = Vector3::new(3., -2., 7.);
        let f = gravity.force(pos, 10., pos, 20.);

        assert_eq!(f, Vector3::zeros());
        assert!(f.iter().all(|c| c.is_finite()));
    }
}
