//! # Triangle Meshes
//!
//! A [`Mesh`] is an indexed triangle list built between `begin` and `end`.
//! The same triangles feed the render layer and the ray queries, so there
//! is no separate physics mesh.
//!
//! Live meshes are shared as [`SharedMesh`] handles. Placement code can
//! read and nudge their vertices through [`MeshSupplier`] without knowing
//! how the render layer uploads them.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use parking_lot::RwLock;

/// A mesh shared between components, chunks and draw commands.
pub type SharedMesh = Arc<RwLock<Mesh>>;

/// Wraps a finished mesh in a [`SharedMesh`] handle.
#[inline]
#[must_use]
pub fn share(mesh: Mesh) -> SharedMesh {
    Arc::new(RwLock::new(mesh))
}

/// Vertex layout uploaded by the render layer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in the mesh's local frame.
    pub pos: [f32; 3],
    /// Packed RGBA colour.
    pub color: u32,
}

impl Vertex {
    /// Creates a vertex.
    #[inline]
    #[must_use]
    pub fn new(pos: Vec3, color: u32) -> Self {
        Self { pos: pos.to_array(), color }
    }

    /// Position as a vector.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.pos)
    }
}

/// Indexed triangle mesh.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    building: bool,
    dirty: bool,
    revision: u32,
}

impl Mesh {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with room for `vertices` vertices and `triangles` triangles.
    #[must_use]
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(triangles * 3),
            ..Self::default()
        }
    }

    /// Starts a rebuild, discarding the previous contents.
    ///
    /// # Panics
    ///
    /// Panics if the mesh is already being built.
    pub fn begin(&mut self) {
        assert!(!self.building, "Mesh::begin called while already building");
        self.vertices.clear();
        self.indices.clear();
        self.building = true;
    }

    /// Appends a vertex and returns its index.
    ///
    /// # Panics
    ///
    /// Panics outside `begin`/`end`.
    pub fn put(&mut self, vertex: Vertex) -> u32 {
        assert!(self.building, "Mesh::put called outside begin/end");
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Appends one triangle.
    #[inline]
    pub fn tri(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Appends a quad as the triangles `(a, b, c)` and `(c, d, a)`.
    #[inline]
    pub fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.tri(a, b, c);
        self.tri(c, d, a);
    }

    /// Finishes a rebuild.
    ///
    /// # Panics
    ///
    /// Panics if `begin` was not called.
    pub fn end(&mut self) {
        assert!(self.building, "Mesh::end called without begin");
        self.building = false;
        self.dirty = false;
        self.revision = self.revision.wrapping_add(1);
    }

    /// Whether a rebuild is in progress.
    #[inline]
    #[must_use]
    pub const fn is_building(&self) -> bool {
        self.building
    }

    /// Whether vertices were edited since the last `end`/`end_mutation`.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Bumped every time the render layer should re-upload.
    #[inline]
    #[must_use]
    pub const fn revision(&self) -> u32 {
        self.revision
    }

    /// The vertex buffer.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The vertex buffer as raw bytes for upload.
    #[inline]
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer, three per triangle.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates triangles as vertex positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize].position(),
                self.vertices[tri[1] as usize].position(),
                self.vertices[tri[2] as usize].position(),
            ]
        })
    }

    /// Index and position of the vertex closest to `pos`.
    ///
    /// Ties keep the later vertex. Returns `None` for an empty mesh.
    #[must_use]
    pub fn closest_vertex(&self, pos: Vec3) -> Option<(usize, Vec3)> {
        let mut best: Option<(usize, Vec3, f32)> = None;
        for (index, vertex) in self.vertices.iter().enumerate() {
            let candidate = vertex.position();
            let dist = pos.distance_squared(candidate);
            if best.map_or(true, |(_, _, d)| dist <= d) {
                best = Some((index, candidate, dist));
            }
        }
        best.map(|(index, candidate, _)| (index, candidate))
    }

    /// Moves one vertex and marks the mesh dirty.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_vertex(&mut self, index: usize, pos: Vec3) {
        self.vertices[index].pos = pos.to_array();
        self.dirty = true;
    }

    /// Publishes vertex edits made with [`Mesh::set_vertex`].
    pub fn end_mutation(&mut self) {
        if self.dirty {
            self.dirty = false;
            self.revision = self.revision.wrapping_add(1);
        }
    }
}

/// Something that exposes a live mesh for reading and nudging vertices.
pub trait MeshSupplier {
    /// The supplied mesh.
    fn mesh(&self) -> &SharedMesh;

    /// Index and position of the vertex closest to `pos`.
    fn closest_vertex(&self, pos: Vec3) -> Option<(usize, Vec3)> {
        self.mesh().read().closest_vertex(pos)
    }

    /// Moves one vertex of the supplied mesh.
    fn set_vertex(&self, index: usize, pos: Vec3) {
        self.mesh().write().set_vertex(index, pos);
    }

    /// Publishes the edits made with `set_vertex`.
    fn end_mutation(&self) {
        self.mesh().write().end_mutation();
    }
}

impl MeshSupplier for SharedMesh {
    fn mesh(&self) -> &SharedMesh {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.begin();
        let a = mesh.put(Vertex::new(Vec3::new(0.0, 0.0, 0.0), 0));
        let b = mesh.put(Vertex::new(Vec3::new(1.0, 0.0, 0.0), 0));
        let c = mesh.put(Vertex::new(Vec3::new(1.0, 0.0, 1.0), 0));
        let d = mesh.put(Vertex::new(Vec3::new(0.0, 0.0, 1.0), 0));
        mesh.quad(a, b, c, d);
        mesh.end();
        mesh
    }

    #[test]
    fn test_quad_winding() {
        let mesh = square();
        assert_eq!(mesh.indices(), &[0, 1, 2, 2, 3, 0]);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_bytes().len(), 4 * std::mem::size_of::<Vertex>());
    }

    #[test]
    fn test_rebuild_discards_old_contents() {
        let mut mesh = square();
        mesh.begin();
        mesh.end();
        assert_eq!(mesh.triangle_count(), 0);
        assert_eq!(mesh.revision(), 2);
    }

    #[test]
    #[should_panic(expected = "already building")]
    fn test_double_begin_panics() {
        let mut mesh = Mesh::new();
        mesh.begin();
        mesh.begin();
    }

    #[test]
    #[should_panic(expected = "without begin")]
    fn test_end_without_begin_panics() {
        Mesh::new().end();
    }

    #[test]
    fn test_supplier_nudges_vertex() {
        let shared = share(square());
        let (index, pos) = shared.closest_vertex(Vec3::new(0.9, 0.3, 0.1)).unwrap();
        assert_eq!(index, 1);
        assert_eq!(pos, Vec3::new(1.0, 0.0, 0.0));

        shared.set_vertex(index, Vec3::new(1.0, 2.0, 0.0));
        assert!(shared.read().is_dirty());
        shared.end_mutation();
        assert!(!shared.read().is_dirty());
        assert_eq!(shared.read().vertices()[1].position(), Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_closest_vertex_empty() {
        assert!(Mesh::new().closest_vertex(Vec3::ZERO).is_none());
    }
}
