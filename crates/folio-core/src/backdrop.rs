//! Floating wireframe shapes and the particle field behind the cards.
//!
//! Both are ambient: they step every frame regardless of mode and never
//! interact with input.

use std::f64::consts::PI;

use rand::Rng;
use serde::Serialize;

use crate::config::BackdropConfig;
use crate::math::{Euler, Vec3};

/// Shapes drift inside this square on x and y before bouncing.
const SHAPE_BOUNDS: f64 = 10.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Octahedron,
    Icosahedron,
    Tetrahedron,
}

impl ShapeKind {
    const ALL: [ShapeKind; 3] = [ShapeKind::Octahedron, ShapeKind::Icosahedron, ShapeKind::Tetrahedron];

    pub fn radius(&self) -> f64 {
        match self {
            ShapeKind::Octahedron => 0.6,
            ShapeKind::Icosahedron => 0.5,
            ShapeKind::Tetrahedron => 0.7,
        }
    }

    /// Vertices on a sphere of `radius()`.
    pub fn vertices(&self) -> Vec<Vec3> {
        let raw: Vec<Vec3> = match self {
            ShapeKind::Octahedron => vec![
                Vec3::X,
                -Vec3::X,
                Vec3::Y,
                -Vec3::Y,
                Vec3::Z,
                -Vec3::Z,
            ],
            ShapeKind::Icosahedron => {
                let t = (1.0 + 5f64.sqrt()) / 2.0;
                vec![
                    Vec3::new(-1.0, t, 0.0),
                    Vec3::new(1.0, t, 0.0),
                    Vec3::new(-1.0, -t, 0.0),
                    Vec3::new(1.0, -t, 0.0),
                    Vec3::new(0.0, -1.0, t),
                    Vec3::new(0.0, 1.0, t),
                    Vec3::new(0.0, -1.0, -t),
                    Vec3::new(0.0, 1.0, -t),
                    Vec3::new(t, 0.0, -1.0),
                    Vec3::new(t, 0.0, 1.0),
                    Vec3::new(-t, 0.0, -1.0),
                    Vec3::new(-t, 0.0, 1.0),
                ]
            }
            ShapeKind::Tetrahedron => vec![
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(-1.0, -1.0, 1.0),
                Vec3::new(-1.0, 1.0, -1.0),
                Vec3::new(1.0, -1.0, -1.0),
            ],
        };
        let r = self.radius();
        raw.into_iter()
            .filter_map(|v| v.normalize())
            .map(|v| v * r)
            .collect()
    }

    /// Wireframe edges: every vertex pair at the minimum pair distance.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let verts = self.vertices();
        let mut min = f64::INFINITY;
        for i in 0..verts.len() {
            for j in i + 1..verts.len() {
                min = min.min((verts[i] - verts[j]).length());
            }
        }
        let mut edges = Vec::new();
        for i in 0..verts.len() {
            for j in i + 1..verts.len() {
                if (verts[i] - verts[j]).length() <= min * (1.0 + 1e-6) {
                    edges.push((i, j));
                }
            }
        }
        edges
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FloatingShape {
    pub kind: ShapeKind,
    pub position: Vec3,
    pub rotation: Euler,
    /// Per-frame drift on x and y
    pub speed_x: f64,
    pub speed_y: f64,
    /// Per-frame spin applied to x and y rotation
    pub spin: f64,
}

impl FloatingShape {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let kind = ShapeKind::ALL[rng.gen_range(0..ShapeKind::ALL.len())];
        Self {
            kind,
            position: Vec3::new(
                (rng.gen::<f64>() - 0.5) * 20.0,
                (rng.gen::<f64>() - 0.5) * 20.0,
                (rng.gen::<f64>() - 0.5) * 15.0 - 5.0,
            ),
            rotation: Euler::new(rng.gen::<f64>() * PI, rng.gen::<f64>() * PI, 0.0),
            speed_x: (rng.gen::<f64>() - 0.5) * 0.002,
            speed_y: (rng.gen::<f64>() - 0.5) * 0.002,
            spin: (rng.gen::<f64>() - 0.5) * 0.02,
        }
    }

    pub fn step(&mut self) {
        self.rotation.x += self.spin;
        self.rotation.y += self.spin;
        self.position.x += self.speed_x;
        self.position.y += self.speed_y;

        if self.position.x.abs() > SHAPE_BOUNDS {
            self.speed_x = -self.speed_x;
        }
        if self.position.y.abs() > SHAPE_BOUNDS {
            self.speed_y = -self.speed_y;
        }
    }

    /// World-space wireframe segments.
    pub fn segments(&self) -> Vec<(Vec3, Vec3)> {
        let m = self.rotation.matrix();
        let verts: Vec<Vec3> = self
            .kind
            .vertices()
            .into_iter()
            .map(|v| self.position + m.mul_vec(v))
            .collect();
        self.kind
            .edges()
            .into_iter()
            .map(|(a, b)| (verts[a], verts[b]))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    /// Local positions; the field rotates as a whole
    pub points: Vec<Vec3>,
    pub rotation: Euler,
    spin: f64,
}

impl ParticleField {
    fn random<R: Rng + ?Sized>(rng: &mut R, count: usize, extent: f64, spin: f64) -> Self {
        let points = (0..count)
            .map(|_| {
                Vec3::new(
                    (rng.gen::<f64>() - 0.5) * extent,
                    (rng.gen::<f64>() - 0.5) * extent,
                    (rng.gen::<f64>() - 0.5) * extent,
                )
            })
            .collect();
        Self {
            points,
            rotation: Euler::IDENTITY,
            spin,
        }
    }

    pub fn step(&mut self, scroll_progress: f64) {
        self.rotation.y += self.spin;
        self.rotation.x = scroll_progress * PI;
    }

    /// World-space particle positions.
    pub fn world_points(&self) -> impl Iterator<Item = Vec3> + '_ {
        let m = self.rotation.matrix();
        self.points.iter().map(move |p| m.mul_vec(*p))
    }
}

#[derive(Debug, Clone)]
pub struct Backdrop {
    pub shapes: Vec<FloatingShape>,
    pub particles: ParticleField,
}

impl Backdrop {
    pub fn generate<R: Rng + ?Sized>(config: &BackdropConfig, rng: &mut R) -> Self {
        let shapes = (0..config.shape_count).map(|_| FloatingShape::random(rng)).collect();
        let particles = ParticleField::random(
            rng,
            config.particle_count,
            config.particle_extent,
            config.particle_spin,
        );
        Self { shapes, particles }
    }

    pub fn step(&mut self, scroll_progress: f64) {
        for shape in &mut self.shapes {
            shape.step();
        }
        self.particles.step(scroll_progress);
    }
}
