use nalgebra::Vector3;

use crate::bodies::Bodies;

/// Semi-implicit (symplectic) Euler.
///
/// Velocities are updated from the accumulated forces first, then positions
/// from the already-updated velocities. Must only run once the force buffer
/// is complete for all bodies; the driver enforces that ordering.
pub fn integrate(bodies: &mut Bodies, forces: &[Vector3<f64>], time_step: f64) {
    for i in 0..bodies.len() {
        bodies.velocities[i] += forces[i] / bodies.masses[i] * time_step;
        bodies.positions[i] += bodies.velocities[i] * time_step;
    }
}
