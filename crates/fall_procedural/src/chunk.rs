//! # Chunk System
//!
//! The terrain is an unbounded grid of 16x16 world-unit tiles. Each tile is
//! a heightfield mesh sampled on a `quality x quality` grid; the same
//! triangles are drawn and ray-tested.
//!
//! ## Chunk Addressing
//!
//! A world position maps to the chunk `(floor(x) >> 4, floor(z) >> 4)`, so
//! negative coordinates round toward negative infinity.

use fall_core::{
    Collidable, DrawCommand, Mesh, MeshCollision, MeshSupplier, RenderPass, RenderSink, SharedMesh,
    Vertex,
};
use glam::Vec3;
use thiserror::Error;

use crate::terrain::HeightFn;

/// Chunk width/depth in world units.
pub const CHUNK_SIZE: i32 = 16;

/// `log2(CHUNK_SIZE)`.
pub const CHUNK_SHIFT: u32 = 4;

/// Highest supported grid subdivision.
pub const MAX_QUALITY: usize = 16;

/// Vertex colour of terrain.
const TERRAIN_COLOR: u32 = 0xffff_ffff;

/// Chunk generation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// Quality must split a chunk into whole tiles.
    #[error("chunk quality {0} must be a power of two between 1 and 16")]
    InvalidQuality(usize),
}

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not world units).
    pub x: i32,
    /// Z coordinate (in chunks, not world units).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The chunk containing the world position `(x, z)`.
    #[inline]
    #[must_use]
    pub fn containing(x: f32, z: f32) -> Self {
        Self {
            x: (x.floor() as i32) >> CHUNK_SHIFT,
            z: (z.floor() as i32) >> CHUNK_SHIFT,
        }
    }

    /// World X of the chunk's corner.
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i32 {
        self.x * CHUNK_SIZE
    }

    /// World Z of the chunk's corner.
    #[inline]
    #[must_use]
    pub const fn world_z(self) -> i32 {
        self.z * CHUNK_SIZE
    }

    /// The coordinate shifted by `(dx, dz)` chunks.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// Squared distance to `other` in chunk units.
    #[inline]
    #[must_use]
    pub const fn distance_sq(self, other: Self) -> i32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }
}

/// Bilinear interpolation of `terrain` over the four lattice points around `(x, z)`.
#[must_use]
pub fn height_at<H: HeightFn + ?Sized>(terrain: &H, x: f32, z: f32) -> f32 {
    let x0 = x.floor();
    let z0 = z.floor();
    let (ix, iz) = (x0 as i32, z0 as i32);

    let h00 = terrain.height(ix, iz);
    let h10 = terrain.height(ix + 1, iz);
    let h01 = terrain.height(ix, iz + 1);
    let h11 = terrain.height(ix + 1, iz + 1);

    let fx = x - x0;
    let fz = z - z0;
    (1.0 - fx) * (1.0 - fz) * h00 + fx * (1.0 - fz) * h10 + (1.0 - fx) * fz * h01 + fx * fz * h11
}

/// A generated terrain tile.
///
/// Vertices are in world space, so the chunk collides with no offset.
#[derive(Clone, Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    mesh: SharedMesh,
    collision: MeshCollision,
    water: bool,
}

impl Chunk {
    /// Wraps an already built world-space mesh.
    ///
    /// The chunk has water if any vertex lies below y = 0.
    #[must_use]
    pub fn from_mesh(coord: ChunkCoord, mesh: Mesh) -> Self {
        let water = mesh.vertices().iter().any(|v| v.pos[1] < 0.0);
        let mesh = fall_core::share(mesh);
        Self {
            coord,
            collision: MeshCollision::new(mesh.clone()),
            mesh,
            water,
        }
    }

    /// Grid coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Whether part of the tile is under water.
    #[inline]
    #[must_use]
    pub const fn has_water(&self) -> bool {
        self.water
    }

    /// The collidable view of the mesh.
    #[inline]
    #[must_use]
    pub fn collision(&self) -> &MeshCollision {
        &self.collision
    }

    /// Queues the terrain draw, plus the water surface if the tile has one.
    pub fn draw(&self, sink: &mut dyn RenderSink) {
        sink.submit(DrawCommand::at(self.mesh.clone(), Vec3::ZERO));
        if self.water {
            sink.submit(DrawCommand::at(self.mesh.clone(), Vec3::ZERO).in_pass(RenderPass::Water));
        }
    }
}

impl Collidable for Chunk {
    #[inline]
    fn ray_collides(&self, offset: Vec3, origin: Vec3, dir: Vec3) -> Option<f32> {
        self.collision.ray_collides(offset, origin, dir)
    }
}

impl MeshSupplier for Chunk {
    fn mesh(&self) -> &SharedMesh {
        &self.mesh
    }
}

/// Builds chunk meshes at a fixed grid quality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkGenerator {
    quality: usize,
    tile: i32,
}

impl ChunkGenerator {
    /// Creates a generator splitting each chunk into `quality x quality` tiles.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidQuality`] unless `quality` is a power
    /// of two no larger than [`MAX_QUALITY`].
    pub fn new(quality: usize) -> Result<Self, ChunkError> {
        if !quality.is_power_of_two() || quality > MAX_QUALITY {
            return Err(ChunkError::InvalidQuality(quality));
        }
        Ok(Self {
            quality,
            tile: CHUNK_SIZE / quality as i32,
        })
    }

    /// Grid subdivision per side.
    #[inline]
    #[must_use]
    pub const fn quality(&self) -> usize {
        self.quality
    }

    /// Generates the chunk at `coord`.
    ///
    /// Each shared grid vertex is emitted once: a memo table of
    /// `(quality + 1)^2` entries maps grid points to mesh indices.
    #[must_use]
    pub fn generate<H: HeightFn + ?Sized>(&self, coord: ChunkCoord, terrain: &H) -> Chunk {
        let n = self.quality;
        let stride = n + 1;
        let mut memo = [u32::MAX; (MAX_QUALITY + 1) * (MAX_QUALITY + 1)];
        let mut mesh = Mesh::with_capacity(stride * stride, n * n * 2);

        let mut vertex = |mesh: &mut Mesh, i: usize, j: usize| -> u32 {
            let slot = &mut memo[i * stride + j];
            if *slot == u32::MAX {
                let x = coord.world_x() + i as i32 * self.tile;
                let z = coord.world_z() + j as i32 * self.tile;
                let pos = Vec3::new(x as f32, terrain.height(x, z), z as f32);
                *slot = mesh.put(Vertex::new(pos, TERRAIN_COLOR));
            }
            *slot
        };

        mesh.begin();
        for i in 0..n {
            for j in 0..n {
                let i1 = vertex(&mut mesh, i, j);
                let i2 = vertex(&mut mesh, i + 1, j);
                let i3 = vertex(&mut mesh, i + 1, j + 1);
                let i4 = vertex(&mut mesh, i, j + 1);
                mesh.quad(i4, i3, i2, i1);
            }
        }
        mesh.end();

        Chunk::from_mesh(coord, mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slope(x: i32, z: i32) -> f32 {
        x as f32 * 0.5 + z as f32 * 0.25
    }

    #[test]
    fn test_coord_from_world_pos() {
        assert_eq!(ChunkCoord::containing(0.0, 0.0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::containing(15.9, 16.0), ChunkCoord::new(0, 1));
        assert_eq!(ChunkCoord::containing(-0.5, -16.0), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::containing(-16.5, 31.0), ChunkCoord::new(-2, 1));
    }

    #[test]
    fn test_shared_vertices_emitted_once() {
        let generator = ChunkGenerator::new(8).unwrap();
        let chunk = generator.generate(ChunkCoord::new(2, -1), &slope);
        let mesh = chunk.mesh.read();
        assert_eq!(mesh.vertices().len(), 9 * 9);
        assert_eq!(mesh.triangle_count(), 8 * 8 * 2);
    }

    #[test]
    fn test_vertices_in_world_space() {
        let generator = ChunkGenerator::new(4).unwrap();
        let chunk = generator.generate(ChunkCoord::new(1, 2), &slope);
        let mesh = chunk.mesh.read();
        for vertex in mesh.vertices() {
            let [x, y, z] = vertex.pos;
            assert!((16.0..=32.0).contains(&x));
            assert!((32.0..=48.0).contains(&z));
            assert!((x % 4.0).abs() < 1e-6);
            assert!((y - slope(x as i32, z as i32)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_first_quad_winding() {
        let generator = ChunkGenerator::new(2).unwrap();
        let chunk = generator.generate(ChunkCoord::new(0, 0), &slope);
        let mesh = chunk.mesh.read();
        // Emission order (0,0) (1,0) (1,1) (0,1) gives i1..i4 = 0..3.
        assert_eq!(&mesh.indices()[..6], &[3, 2, 1, 1, 0, 3]);
    }

    #[test]
    fn test_water_flag() {
        let generator = ChunkGenerator::new(8).unwrap();
        let dry = generator.generate(ChunkCoord::new(0, 0), &|_: i32, _: i32| 1.0_f32);
        let wet = generator.generate(ChunkCoord::new(0, 0), &|x: i32, _: i32| if x == 8 { -0.1_f32 } else { 1.0 });
        assert!(!dry.has_water());
        assert!(wet.has_water());

        let mut draws = fall_core::DrawList::new();
        wet.draw(&mut draws);
        dry.draw(&mut draws);
        assert_eq!(draws.count_in(RenderPass::Water), 1);
        assert_eq!(draws.count_in(RenderPass::Opaque), 2);
    }

    #[test]
    fn test_invalid_quality() {
        assert_eq!(ChunkGenerator::new(3), Err(ChunkError::InvalidQuality(3)));
        assert_eq!(ChunkGenerator::new(0), Err(ChunkError::InvalidQuality(0)));
        assert_eq!(ChunkGenerator::new(32), Err(ChunkError::InvalidQuality(32)));
        assert!(ChunkGenerator::new(16).is_ok());
    }

    #[test]
    fn test_height_at_bilinear() {
        let checker = |x: i32, z: i32| if (x + z) % 2 == 0 { 0.0_f32 } else { 4.0 };
        assert!((height_at(&checker, 0.0, 0.0)).abs() < 1e-6);
        assert!((height_at(&checker, 0.5, 0.5) - 2.0).abs() < 1e-6);
        assert!((height_at(&checker, 0.25, 0.0) - 1.0).abs() < 1e-6);
        // A plane is reproduced exactly, including on negative coordinates.
        assert!((height_at(&slope, -2.5, 3.5) - slope(-5, 7) / 2.0).abs() < 1e-5);
        assert_eq!(height_at(&slope, 7.3, -1.2).to_bits(), height_at(&slope, 7.3, -1.2).to_bits());
    }

    #[test]
    fn test_terrain_ray() {
        let generator = ChunkGenerator::new(8).unwrap();
        let chunk = generator.generate(ChunkCoord::new(0, 0), &|_: i32, _: i32| 2.0_f32);
        let t = chunk
            .ray_collides(Vec3::ZERO, Vec3::new(5.3, 10.0, 7.1), Vec3::NEG_Y)
            .unwrap();
        assert!((t - 8.0).abs() < 1e-5);
    }
}
