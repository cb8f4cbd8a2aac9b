//! # Fall
//!
//! The running game world: entities near the player are ticked at a fixed
//! rate, terrain streams in around them, and each frame renders the
//! interpolated state into a [`fall_core::RenderSink`].
//!
//! ## Architecture Rules
//!
//! 1. **No globals** - [`GameContext`] owns the world and lends narrower
//!    contexts to component hooks
//! 2. **Spawns are deferred** - entities created during a tick join the
//!    world at the next tick boundary
//! 3. **One ray query** - aiming, picking and terrain hits share
//!    [`World::raycast`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fall::{spawn, GameContext, ModelLibrary, World, WorldConfig};
//!
//! let models = Arc::new(ModelLibrary::placeholder());
//! let mut world = World::with_noise_terrain(WorldConfig::default(), models)?;
//! let player = spawn::populate(&mut world);
//! let mut game = GameContext::new(world, player);
//! let stats = game.frame(Duration::from_millis(16), &mut draw_list);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod components;
pub mod config;
pub mod context;
pub mod error;
pub mod game_loop;
pub mod input;
pub mod items;
pub mod raycast;
pub mod spawn;
pub mod world;

pub use config::WorldConfig;
pub use context::{Clock, FrameContext, GameContext, SimContext};
pub use error::{FallError, FallResult};
pub use game_loop::{FixedTicker, FrameStats, FrameStatsAccumulator};
pub use input::InputState;
pub use items::{Item, ItemId, ItemRegistry, ItemStack};
pub use raycast::{HitKind, HitResult, HitTarget, RayQuery};
pub use spawn::ModelLibrary;
pub use world::{RenderStats, TickStats, World};
