//! # Fall Core
//!
//! Pooled component storage and geometry for the Fall world simulation:
//! - Component slot groups rented from one contiguous pool by index
//! - Entity handles carrying interpolated transforms
//! - Triangle meshes shared between rendering and ray queries
//!
//! ## Architecture Rules
//!
//! 1. **Indices, not pointers** - slot views are always re-derived from the pool
//! 2. **One allocation per growth** - the pool doubles, entities never allocate
//! 3. **No graphics calls** - drawing goes through [`RenderSink`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use fall_core::{ComponentPool, Entity};
//!
//! let mut pool = ComponentPool::new(1024);
//! let mut entity = Entity::new(pool.rent());
//! entity.add(pool.get_mut(entity.index()), my_component);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod collision;
pub mod ecs;
pub mod interaction;
pub mod math;
pub mod memory;
pub mod mesh;
pub mod render;

pub use collision::{ray_triangle, Aabb, Collidable, MeshCollision, RAY_EPSILON};
pub use ecs::{Component, ComponentKind, Entity, EntityId, SlotGroup, Transform, Variant, KIND_COUNT};
pub use interaction::{Hand, InteractKind, Interaction};
pub use memory::ComponentPool;
pub use mesh::{share, Mesh, MeshSupplier, SharedMesh, Vertex};
pub use render::{DrawCommand, DrawList, RenderPass, RenderSink};
