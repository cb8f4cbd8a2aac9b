//! # Ray Collision
//!
//! Every ray query in the world, for terrain and for entities, goes
//! through [`ray_triangle`]. Distances are in units of the ray direction,
//! which need not be normalized.

use glam::Vec3;

use crate::mesh::{MeshSupplier, SharedMesh};

/// Determinant and distance cutoff for [`ray_triangle`].
pub const RAY_EPSILON: f32 = 0.000_01;

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the ray parameter `t` of the hit, or `None` when the ray is
/// parallel to the plane, misses the triangle, or hits at `t <= RAY_EPSILON`.
///
/// The barycentric test rejects `u < 0`, `v < 0` and `u + v > 1`, so hits
/// past the hypotenuse edge are misses.
#[inline]
#[must_use]
pub fn ray_triangle(origin: Vec3, dir: Vec3, p0: Vec3, p1: Vec3, p2: Vec3) -> Option<f32> {
    let e1 = p1 - p0;
    let e2 = p2 - p0;

    let h = dir.cross(e2);
    let a = e1.dot(h);
    if a.abs() < RAY_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - p0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = f * dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * e2.dot(q);
    (t > RAY_EPSILON).then_some(t)
}

/// Anything a ray can hit.
pub trait Collidable {
    /// Ray parameter of the nearest hit against this shape placed at `offset`.
    fn ray_collides(&self, offset: Vec3, origin: Vec3, dir: Vec3) -> Option<f32>;
}

/// Collision against the triangles of a live mesh.
#[derive(Clone, Debug)]
pub struct MeshCollision {
    mesh: SharedMesh,
}

impl MeshCollision {
    /// Collides against `mesh`, sharing it with whoever renders it.
    #[inline]
    #[must_use]
    pub fn new(mesh: SharedMesh) -> Self {
        Self { mesh }
    }
}

impl Collidable for MeshCollision {
    fn ray_collides(&self, offset: Vec3, origin: Vec3, dir: Vec3) -> Option<f32> {
        // Testing the ray in the mesh's frame is the same as offsetting every vertex.
        let local = origin - offset;
        let mesh = self.mesh.read();
        mesh.triangles()
            .filter_map(|[p0, p1, p2]| ray_triangle(local, dir, p0, p1, p2))
            .min_by(f32::total_cmp)
    }
}

impl MeshSupplier for MeshCollision {
    fn mesh(&self) -> &SharedMesh {
        &self.mesh
    }
}

/// Axis-aligned box in an entity's local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from its corners.
    #[inline]
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
}

impl Collidable for Aabb {
    /// Slab test. A ray starting inside the box hits its exit face.
    ///
    /// An axis the ray does not move along is a bound on the origin alone,
    /// with both faces counting as inside.
    fn ray_collides(&self, offset: Vec3, origin: Vec3, dir: Vec3) -> Option<f32> {
        let near = self.min + offset - origin;
        let far = self.max + offset - origin;
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let d = dir[axis];
            if d == 0.0 {
                if near[axis] > 0.0 || far[axis] < 0.0 {
                    return None;
                }
                continue;
            }
            let (t1, t2) = (near[axis] / d, far[axis] / d);
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        if t_max < 0.0 || t_min > t_max {
            return None;
        }
        Some(if t_min >= 0.0 { t_min } else { t_max })
    }
}

impl Collidable for [Aabb] {
    fn ray_collides(&self, offset: Vec3, origin: Vec3, dir: Vec3) -> Option<f32> {
        self.iter()
            .filter_map(|aabb| aabb.ray_collides(offset, origin, dir))
            .min_by(f32::total_cmp)
    }
}
