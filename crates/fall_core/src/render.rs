//! # Render Boundary
//!
//! Renderables never touch a graphics API. They submit [`DrawCommand`]s to
//! a [`RenderSink`] owned by the render layer, which batches and uploads
//! however it likes.

use glam::Vec3;

use crate::mesh::SharedMesh;

/// Which pass a draw belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderPass {
    /// Regular depth-tested geometry.
    Opaque,
    /// Translucent water surface drawn after opaque geometry.
    Water,
    /// Cloth and other double-sided geometry.
    Cloth,
}

/// One mesh draw with its model transform.
#[derive(Clone, Debug)]
pub struct DrawCommand {
    /// The mesh to draw.
    pub mesh: SharedMesh,
    /// Pass the draw is queued in.
    pub pass: RenderPass,
    /// World-space translation.
    pub translation: Vec3,
    /// Rotation about the Y axis, degrees.
    pub yaw: f32,
    /// Rotation about the local X axis, degrees.
    pub pitch: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl DrawCommand {
    /// An unrotated, unscaled draw of `mesh` at `translation`.
    #[inline]
    #[must_use]
    pub fn at(mesh: SharedMesh, translation: Vec3) -> Self {
        Self {
            mesh,
            pass: RenderPass::Opaque,
            translation,
            yaw: 0.0,
            pitch: 0.0,
            scale: 1.0,
        }
    }

    /// Sets the pass.
    #[inline]
    #[must_use]
    pub fn in_pass(mut self, pass: RenderPass) -> Self {
        self.pass = pass;
        self
    }

    /// Sets yaw and pitch.
    #[inline]
    #[must_use]
    pub fn rotated(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }

    /// Sets the uniform scale.
    #[inline]
    #[must_use]
    pub fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// Receiver of draw commands.
pub trait RenderSink {
    /// Queues one draw.
    fn submit(&mut self, command: DrawCommand);
}

/// A sink that records every command, used by headless runs and tests.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    triangles: usize,
}

impl DrawList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in submission order.
    #[inline]
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Triangles submitted since the last clear.
    #[inline]
    #[must_use]
    pub const fn triangles(&self) -> usize {
        self.triangles
    }

    /// Number of commands in `pass`.
    #[must_use]
    pub fn count_in(&self, pass: RenderPass) -> usize {
        self.commands.iter().filter(|c| c.pass == pass).count()
    }

    /// Forgets recorded commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.triangles = 0;
    }
}

impl RenderSink for DrawList {
    fn submit(&mut self, command: DrawCommand) {
        self.triangles += command.mesh.read().triangle_count();
        self.commands.push(command);
    }
}
