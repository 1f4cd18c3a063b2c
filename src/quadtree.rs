use log::trace;
use nalgebra::{Vector2, Vector3};

use crate::{bodies::Bodies, gravity::Gravity};

/// Maximum subdivision depth.
///
/// Bodies at numerically identical positions would otherwise force unbounded
/// recursion; below this depth they share a single leaf and act as a combined
/// point mass.
pub const MAX_DEPTH: usize = 48;

/// A quadtree over the x/y plane of the body store.
///
/// Built sequentially once per step from the current positions and discarded
/// afterwards. Traversal is read-only, so forces for different target bodies
/// can be computed concurrently on the same tree.
#[derive(Clone, Debug)]
pub struct QuadTree {
    root: Node,
}

impl QuadTree {
    /// Fits the root square to the x/y extent of the bodies and inserts them
    /// one by one.
    #[must_use]
    pub fn build(bodies: &Bodies) -> Self {
        let (origin, size) = bounding_square(bodies);
        let mut root = Node::new(origin, size);

        for index in 0..bodies.len() {
            root.insert(bodies, index, 0);
        }

        Self { root }
    }

    /// Approximate net force on `target`, in the plane of the tree.
    ///
    /// Nodes satisfying `size / distance < theta` are treated as single point
    /// masses; everything else is resolved by recursing into the children.
    #[must_use]
    pub fn force_on(
        &self,
        bodies: &Bodies,
        target: usize,
        gravity: &Gravity,
        theta: f64,
    ) -> Vector3<f64> {
        let planar = self.root.force_on(bodies, target, gravity, theta);
        Vector3::new(planar[0], planar[1], 0.)
    }

    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.root.mass
    }

    #[must_use]
    pub fn center_of_mass(&self) -> Vector2<f64> {
        self.root.center_of_mass
    }
}

fn bounding_square(bodies: &Bodies) -> (Vector2<f64>, f64) {
    if bodies.is_empty() {
        return (Vector2::zeros(), 0.);
    }

    let mut min = bodies.planar_position(0);
    let mut max = min;
    for index in 1..bodies.len() {
        let pos = bodies.planar_position(index);
        min = min.inf(&pos);
        max = max.sup(&pos);
    }

    let extent = max - min;
    (min, extent[0].max(extent[1]))
}

#[derive(Clone, Debug)]
enum Cell {
    Empty,
    /// More than one occupant only at the depth cap.
    Leaf(Vec<usize>),
    Internal(Box<[Node; 4]>),
}

#[derive(Clone, Debug)]
struct Node {
    origin: Vector2<f64>,
    size: f64,
    mass: f64,
    center_of_mass: Vector2<f64>,
    cell: Cell,
}

impl Node {
    fn new(origin: Vector2<f64>, size: f64) -> Self {
        Self {
            origin,
            size,
            mass: 0.,
            center_of_mass: Vector2::zeros(),
            cell: Cell::Empty,
        }
    }

    fn insert(&mut self, bodies: &Bodies, index: usize, depth: usize) {
        let position = bodies.planar_position(index);
        let (origin, size) = (self.origin, self.size);

        match &mut self.cell {
            Cell::Empty => {
                self.cell = Cell::Leaf(vec![index]);
            }

            // Coincident positions cannot be separated by subdividing further.
            Cell::Leaf(occupants) if depth >= MAX_DEPTH => {
                occupants.push(index);
            }

            // Occupied leaf: split the square at its midpoint and re-route
            // the resident before placing the new body.
            Cell::Leaf(_) => {
                let Cell::Leaf(residents) = std::mem::replace(&mut self.cell, Cell::Empty)
                else {
                    unreachable!()
                };
                trace!("subdividing region ({}, {}) size {size}", origin[0], origin[1]);

                let mut children = Self::subdivide(origin, size);
                for &resident in &residents {
                    let quadrant =
                        Self::quadrant(origin, size, bodies.planar_position(resident));
                    children[quadrant].insert(bodies, resident, depth + 1);
                }

                let quadrant = Self::quadrant(origin, size, position);
                children[quadrant].insert(bodies, index, depth + 1);

                self.cell = Cell::Internal(children);
            }

            Cell::Internal(children) => {
                let quadrant = Self::quadrant(origin, size, position);
                children[quadrant].insert(bodies, index, depth + 1);
            }
        }

        // Post-order aggregate update, applied at every node along the
        // insertion path so internal nodes always represent their subtrees.
        let mass = bodies.masses[index];
        let total = self.mass + mass;
        self.center_of_mass = (self.center_of_mass * self.mass + position * mass) / total;
        self.mass = total;
    }

    /// Four children tiling the parent square, determined purely by the
    /// parent's origin and size. They persist for the tree's lifetime.
    fn subdivide(origin: Vector2<f64>, size: f64) -> Box<[Node; 4]> {
        let half = size / 2.;
        Box::new([
            Node::new(origin, half),
            Node::new(origin + Vector2::new(half, 0.), half),
            Node::new(origin + Vector2::new(0., half), half),
            Node::new(origin + Vector2::new(half, half), half),
        ])
    }

    /// x < mid -> {0, 2}, x >= mid -> {1, 3}; y < mid -> {0, 1}, y >= mid -> {2, 3}.
    fn quadrant(origin: Vector2<f64>, size: f64, position: Vector2<f64>) -> usize {
        let mid = origin + Vector2::new(size / 2., size / 2.);
        usize::from(position[0] >= mid[0]) + 2 * usize::from(position[1] >= mid[1])
    }

    fn force_on(
        &self,
        bodies: &Bodies,
        target: usize,
        gravity: &Gravity,
        theta: f64,
    ) -> Vector2<f64> {
        let position = bodies.planar_position(target);
        let mass = bodies.masses[target];

        match &self.cell {
            Cell::Empty => Vector2::zeros(),

            // The target never attracts itself, even when it shares a leaf
            // with coincident bodies at the depth cap.
            Cell::Leaf(occupants) => occupants
                .iter()
                .filter(|&&occupant| occupant != target)
                .fold(Vector2::zeros(), |acc, &occupant| {
                    acc + gravity.force(
                        position,
                        mass,
                        bodies.planar_position(occupant),
                        bodies.masses[occupant],
                    )
                }),

            Cell::Internal(children) => {
                let dist = (self.center_of_mass - position).norm();

                // size / dist < theta, written to stay defined at dist = 0
                if self.size < theta * dist {
                    gravity.force(position, mass, self.center_of_mass, self.mass)
                } else {
                    children.iter().fold(Vector2::zeros(), |acc, child| {
                        acc + child.force_on(bodies, target, gravity, theta)
                    })
                }
            }
        }
    }
}
