//! # Fall Procedural Terrain
//!
//! Heightfield terrain generated one chunk at a time.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same terrain
//! 2. **Chunked**: Terrain is built in 16x16 world-unit tiles
//! 3. **Pluggable**: Chunks only see a [`HeightFn`], never the noise behind it
//!
//! ## Core Components
//!
//! - `ChunkGenerator`: Builds a chunk mesh from a height function
//! - `NoiseTerrain`: The default height function
//! - `SimplexNoise`: Seeded 2D noise
//!
//! ## Example
//!
//! ```rust,ignore
//! use fall_procedural::{ChunkCoord, ChunkGenerator, NoiseTerrain};
//!
//! let terrain = NoiseTerrain::new(42);
//! let generator = ChunkGenerator::new(8)?;
//! let chunk = generator.generate(ChunkCoord::new(0, 0), &terrain);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod noise;
pub mod terrain;

pub use chunk::{height_at, Chunk, ChunkCoord, ChunkError, ChunkGenerator, CHUNK_SHIFT, CHUNK_SIZE};
pub use noise::SimplexNoise;
pub use terrain::{HeightFn, NoiseTerrain};
