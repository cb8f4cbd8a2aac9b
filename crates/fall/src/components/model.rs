//! Static render model.

use fall_core::{DrawCommand, Entity, MeshSupplier, SharedMesh};

use crate::context::FrameContext;

/// A mesh drawn at the owner's interpolated position.
#[derive(Clone, Debug)]
pub struct Model {
    mesh: SharedMesh,
    rotation: f32,
}

impl Model {
    /// Draws `mesh` turned `rotation` degrees about Y.
    #[must_use]
    pub fn new(mesh: SharedMesh, rotation: f32) -> Self {
        Self { mesh, rotation }
    }

    /// Fixed yaw in degrees.
    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    pub(crate) fn render(&self, owner: &Entity, ctx: &mut FrameContext<'_>) {
        let pos = owner.lerped_pos(ctx.clock.tick_delta);
        ctx.sink
            .submit(DrawCommand::at(self.mesh.clone(), pos).rotated(self.rotation, 0.0));
    }
}

impl MeshSupplier for Model {
    fn mesh(&self) -> &SharedMesh {
        &self.mesh
    }
}
