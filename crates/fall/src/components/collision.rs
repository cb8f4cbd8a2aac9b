//! Ray-collidable shape of an entity.

use fall_core::{Aabb, Collidable, MeshCollision, MeshSupplier, SharedMesh};
use glam::Vec3;

/// What rays hit when they reach this entity. Shapes are in the owner's
/// local frame and follow its position, not its rotation.
#[derive(Clone, Debug)]
pub enum Collision {
    /// The triangles of a mesh, usually the one the entity is drawn with.
    Mesh(MeshCollision),
    /// A set of boxes.
    Boxes(Vec<Aabb>),
}

impl Collision {
    /// Collides against `mesh`.
    #[must_use]
    pub fn mesh(mesh: SharedMesh) -> Self {
        Self::Mesh(MeshCollision::new(mesh))
    }

    /// Collides against `boxes`.
    #[must_use]
    pub fn boxes(boxes: Vec<Aabb>) -> Self {
        Self::Boxes(boxes)
    }

    /// The underlying mesh, for the mesh variant.
    #[must_use]
    pub fn mesh_supplier(&self) -> Option<&dyn MeshSupplier> {
        match self {
            Self::Mesh(mesh) => Some(mesh),
            Self::Boxes(_) => None,
        }
    }
}

impl Collidable for Collision {
    fn ray_collides(&self, offset: Vec3, origin: Vec3, dir: Vec3) -> Option<f32> {
        match self {
            Self::Mesh(mesh) => mesh.ray_collides(offset, origin, dir),
            Self::Boxes(boxes) => boxes.as_slice().ray_collides(offset, origin, dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxes_pick_nearest() {
        let collision = Collision::boxes(vec![
            Aabb::new(Vec3::new(-1.0, 0.0, 10.0), Vec3::new(1.0, 2.0, 12.0)),
            Aabb::new(Vec3::new(-1.0, 0.0, 4.0), Vec3::new(1.0, 2.0, 6.0)),
        ]);
        let offset = Vec3::new(0.0, 0.0, 1.0);
        let t = collision
            .ray_collides(offset, Vec3::new(0.0, 1.0, 0.0), Vec3::Z)
            .unwrap();
        assert!((t - 5.0).abs() < 1e-5);
        assert!(collision
            .ray_collides(offset, Vec3::new(5.0, 1.0, 0.0), Vec3::Z)
            .is_none());
    }
}
