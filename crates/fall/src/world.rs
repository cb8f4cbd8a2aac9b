//! # World
//!
//! Owns every live entity, the entities spawned during the current tick,
//! the terrain chunk cache and the component pool behind them all.
//!
//! ## Tick
//!
//! 1. Entities that update and sit inside the activation radius run their
//!    `update` hooks. Each hook gets the entity's slot group checked out
//!    of the pool and a [`SimContext`] over everything else.
//! 2. Entities spawned during step 1 join the live list. They were not
//!    updated this tick.
//! 3. Tombstoned entities run `die` and return their pool index. Anything
//!    they spawn waits for the next tick.
//! 4. When the player has crossed into another chunk, missing chunks in
//!    the streaming window around it are generated. Chunks are never
//!    evicted.
//!
//! ## Frame
//!
//! Chunks and entities near the player and roughly in front of it get a
//! `render` call. The angle test is a cheap stand-in for frustum culling.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use fall_core::math::{calc_angle, wrap_degrees};
use fall_core::{
    Collidable, ComponentPool, Entity, EntityId, Interaction, Transform, Variant,
};
use fall_procedural::{Chunk, ChunkCoord, ChunkGenerator, HeightFn, NoiseTerrain};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::components::AnyComponent;
use crate::config::WorldConfig;
use crate::context::{Clock, FrameContext, SimContext};
use crate::error::FallResult;
use crate::input::InputState;
use crate::items::ItemRegistry;
use crate::raycast::{HitResult, HitTarget, RayQuery};
use crate::spawn::ModelLibrary;

/// Marks a pool index with no live-list entry.
const UNLISTED: u32 = u32::MAX;

/// What one tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Entities whose `update` ran.
    pub activated: usize,
    /// Spawned entities that joined the live list.
    pub merged: usize,
    /// Tombstoned entities whose pool index was returned.
    pub reclaimed: usize,
    /// Chunks generated by streaming.
    pub chunks_generated: usize,
}

/// What one frame drew.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Chunks drawn.
    pub chunks: usize,
    /// Entities rendered.
    pub entities: usize,
}

/// The simulated world.
pub struct World {
    config: WorldConfig,
    pool: ComponentPool<AnyComponent>,
    objs: Vec<Entity>,
    pending: Vec<Entity>,
    /// Pool index -> position in `objs`.
    locations: Vec<u32>,
    /// Scratch list of entities being reclaimed.
    graveyard: Vec<Entity>,
    chunks: HashMap<ChunkCoord, Chunk>,
    generator: ChunkGenerator,
    terrain: Box<dyn HeightFn + Send + Sync>,
    rng: ChaCha8Rng,
    items: ItemRegistry,
    models: Arc<ModelLibrary>,
    last_player_chunk: Option<ChunkCoord>,
    in_view: usize,
}

impl World {
    /// Creates an empty world over `terrain`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(
        config: WorldConfig,
        terrain: Box<dyn HeightFn + Send + Sync>,
        models: Arc<ModelLibrary>,
    ) -> FallResult<Self> {
        config.validate()?;
        let generator = ChunkGenerator::new(config.chunk_quality)?;
        let items = ItemRegistry::with_defaults(models.log.clone());

        Ok(Self {
            pool: ComponentPool::new(config.pool_initial_capacity),
            objs: Vec::with_capacity(config.pool_initial_capacity),
            pending: Vec::new(),
            locations: Vec::with_capacity(config.pool_initial_capacity),
            graveyard: Vec::new(),
            chunks: HashMap::new(),
            generator,
            terrain,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            items,
            models,
            last_player_chunk: None,
            in_view: 0,
            config,
        })
    }

    /// Creates an empty world over [`NoiseTerrain`] seeded from the config.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn with_noise_terrain(config: WorldConfig, models: Arc<ModelLibrary>) -> FallResult<Self> {
        let terrain = NoiseTerrain::new(config.seed);
        Self::new(config, Box::new(terrain), models)
    }

    // ========================================================================
    // TICK
    // ========================================================================

    /// Runs one tick around `player`.
    ///
    /// # Panics
    ///
    /// Panics if `player` is neither live nor pending.
    pub fn update(&mut self, player: EntityId, clock: Clock, input: &InputState) -> TickStats {
        let anchor = self.expect_entity(player).current;
        let radius_sq = self.config.activation_radius_sq;
        let mut stats = TickStats::default();

        let (objs, _, mut ctx) = self.split(clock, input);
        for entity in objs.iter_mut() {
            if entity.removed || !entity.updates {
                continue;
            }
            if entity.planar_distance_sq(anchor.x, anchor.z) >= radius_sq {
                continue;
            }
            let index = entity.index();
            let mut group = ctx.pool.take(index);
            entity.update(&mut group, &mut ctx);
            ctx.pool.restore(index, group);
            stats.activated += 1;
        }

        stats.merged = self.merge_pending();
        stats.reclaimed = self.reclaim(clock, input);

        let centre = match self.entity(player) {
            Some(entity) => ChunkCoord::containing(entity.current.x, entity.current.z),
            None => ChunkCoord::containing(anchor.x, anchor.z),
        };
        stats.chunks_generated = self.stream_chunks(centre);
        stats
    }

    /// Lends the live list, the reclaim scratch list and a hook context
    /// over the rest of the world.
    fn split<'w>(
        &'w mut self,
        clock: Clock,
        input: &'w InputState,
    ) -> (&'w mut Vec<Entity>, &'w mut Vec<Entity>, SimContext<'w>) {
        let Self {
            config,
            pool,
            objs,
            pending,
            graveyard,
            terrain,
            rng,
            items,
            in_view,
            ..
        } = self;
        let ctx = SimContext {
            pool,
            pending,
            terrain: &**terrain,
            clock,
            input,
            rng,
            in_view: *in_view,
            items,
            config,
        };
        (objs, graveyard, ctx)
    }

    fn merge_pending(&mut self) -> usize {
        let merged = self.pending.len();
        let from = self.objs.len();
        self.objs.append(&mut self.pending);
        self.reindex(from);
        merged
    }

    fn reclaim(&mut self, clock: Clock, input: &InputState) -> usize {
        if !self.objs.iter().any(|entity| entity.removed) {
            return 0;
        }
        let graveyard = &mut self.graveyard;
        self.objs.retain(|entity| {
            if entity.removed {
                graveyard.push(*entity);
            }
            !entity.removed
        });
        self.reindex(0);

        let (_, graveyard, mut ctx) = self.split(clock, input);
        let reclaimed = graveyard.len();
        for mut entity in graveyard.drain(..) {
            let index = entity.index();
            let mut group = ctx.pool.take(index);
            entity.die(&mut group, &mut ctx);
            // Left in place until the index is rented again.
            ctx.pool.restore(index, group);
            ctx.pool.ret(entity.id());
        }
        reclaimed
    }

    fn reindex(&mut self, from: usize) {
        if from == 0 {
            self.locations.fill(UNLISTED);
        }
        for (position, entity) in self.objs.iter().enumerate().skip(from) {
            let index = entity.index();
            if index >= self.locations.len() {
                self.locations.resize(index + 1, UNLISTED);
            }
            self.locations[index] = position as u32;
        }
    }

    /// Generates every missing chunk in the window around `centre`, once
    /// per chunk the player enters.
    fn stream_chunks(&mut self, centre: ChunkCoord) -> usize {
        if self.last_player_chunk == Some(centre) {
            return 0;
        }
        self.last_player_chunk = Some(centre);

        let window = self.config.chunk_window;
        let mut generated = 0;
        for dx in -window..=window {
            for dz in -window..=window {
                let coord = centre.offset(dx, dz);
                if let Entry::Vacant(slot) = self.chunks.entry(coord) {
                    slot.insert(self.generator.generate(coord, &*self.terrain));
                    generated += 1;
                }
            }
        }
        if generated > 0 {
            debug!(
                centre_x = centre.x,
                centre_z = centre.z,
                generated,
                cached = self.chunks.len(),
                "Streamed terrain chunks"
            );
        }
        generated
    }

    /// Delivers `interaction` to `target`. Pending and tombstoned targets
    /// are skipped. Returns whether it was delivered.
    pub fn interact(
        &mut self,
        target: EntityId,
        interaction: &Interaction,
        clock: Clock,
        input: &InputState,
    ) -> bool {
        let Some(position) = self.position(target) else {
            return false;
        };
        if self.objs[position].removed {
            return false;
        }

        let (objs, _, mut ctx) = self.split(clock, input);
        let entity = &mut objs[position];
        let mut group = ctx.pool.take(entity.index());
        entity.interact(&mut group, interaction, &mut ctx);
        ctx.pool.restore(entity.index(), group);
        true
    }

    // ========================================================================
    // FRAME
    // ========================================================================

    /// Renders the chunks and entities `player` can see.
    ///
    /// # Panics
    ///
    /// Panics if `player` is not live.
    pub fn render(&mut self, player: EntityId, frame: &mut FrameContext<'_>) -> RenderStats {
        let viewer = *self.expect_entity(player);
        let yaw = viewer.lerped_yaw(frame.clock.tick_delta);

        let chunks = self.render_chunks(&viewer, yaw, frame);

        let mut entities = 0;
        for entity in &self.objs {
            if entity.removed {
                continue;
            }
            let d = entity.planar_distance_sq(viewer.current.x, viewer.current.z);
            if d > self.config.render_radius_sq {
                continue;
            }
            if d > self.config.entity_cull_near_sq {
                let heading = calc_angle(
                    entity.current.z - viewer.current.z,
                    entity.current.x - viewer.current.x,
                );
                if wrap_degrees(heading - yaw).abs() >= self.config.entity_cull_angle {
                    continue;
                }
            }
            entity.render(self.pool.get(entity.index()), frame);
            entities += 1;
        }

        self.in_view = entities;
        RenderStats { chunks, entities }
    }

    fn render_chunks(&self, viewer: &Entity, yaw: f32, frame: &mut FrameContext<'_>) -> usize {
        let centre = ChunkCoord::containing(viewer.current.x, viewer.current.z);
        let radius_sq = self.config.chunk_render_radius_sq;
        let radius = (radius_sq as f32).sqrt() as i32;

        let mut drawn = 0;
        for i in -radius..=radius {
            for j in -radius..=radius {
                let d = i * i + j * j;
                if d > radius_sq {
                    continue;
                }
                if d > self.config.chunk_cull_near_sq
                    && wrap_degrees(calc_angle(j as f32, i as f32) - yaw).abs()
                        > self.config.chunk_cull_angle
                {
                    continue;
                }
                if let Some(chunk) = self.chunks.get(&centre.offset(i, j)) {
                    chunk.draw(frame.sink);
                    drawn += 1;
                }
            }
        }
        drawn
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Casts a ray from `eye` along `dir` against collidable entities, then
    /// against the cached chunks around the eye.
    ///
    /// Hits count in `(0, reach]`, in units of `dir`. Terrain only replaces
    /// an entity hit when strictly nearer.
    #[must_use]
    pub fn raycast(&self, eye: Vec3, dir: Vec3) -> HitResult {
        let mut query = RayQuery::new(eye, dir, self.config.reach);

        for entity in &self.objs {
            if entity.removed
                || entity.planar_distance_sq(eye.x, eye.z) > self.config.broad_phase_radius_sq
            {
                continue;
            }
            let shapes = self
                .pool
                .get(entity.index())
                .iter()
                .flatten()
                .filter_map(AnyComponent::collidable);
            for shape in shapes {
                query.offer(
                    HitTarget::Entity(entity.id()),
                    shape.ray_collides(entity.pos(), eye, dir),
                );
            }
        }

        let centre = ChunkCoord::containing(eye.x, eye.z);
        for dx in -1..=1 {
            for dz in -1..=1 {
                let coord = centre.offset(dx, dz);
                if let Some(chunk) = self.chunks.get(&coord) {
                    query.offer(HitTarget::Tile(coord), chunk.ray_collides(Vec3::ZERO, eye, dir));
                }
            }
        }
        query.finish()
    }

    /// The chunk at `coord`, generating it on first use.
    pub fn chunk_at(&mut self, coord: ChunkCoord) -> &Chunk {
        let generator = self.generator;
        let terrain = &*self.terrain;
        self.chunks
            .entry(coord)
            .or_insert_with(|| generator.generate(coord, terrain))
    }

    /// The chunk at `coord`, if it has been generated.
    #[inline]
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Puts a prebuilt chunk in the cache, replacing any chunk at its coordinate.
    pub fn insert_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.coord(), chunk);
    }

    /// Chunks generated so far.
    #[inline]
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Interpolated terrain height at `(x, z)`.
    #[inline]
    #[must_use]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        fall_procedural::height_at(&*self.terrain, x, z)
    }

    /// The terrain height function.
    #[inline]
    #[must_use]
    pub fn terrain(&self) -> &dyn HeightFn {
        &*self.terrain
    }

    // ========================================================================
    // ENTITIES
    // ========================================================================

    /// Spawns an entity from outside a tick. Like spawns from hooks, it
    /// joins the live list at the next tick boundary.
    pub fn spawn(
        &mut self,
        transform: Transform,
        updates: bool,
        components: impl IntoIterator<Item = AnyComponent>,
    ) -> EntityId {
        let id = self.pool.rent();
        let mut entity = Entity::placed(id, transform);
        entity.updates = updates;
        let group = self.pool.get_mut(entity.index());
        for component in components {
            entity.add(group, component);
        }
        self.pending.push(entity);
        id
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        let position = *self.locations.get(id.index() as usize)?;
        if position == UNLISTED {
            return None;
        }
        let position = position as usize;
        (self.objs.get(position)?.id() == id).then_some(position)
    }

    /// A live or pending entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        match self.position(id) {
            Some(position) => Some(&self.objs[position]),
            None => self.pending.iter().find(|entity| entity.id() == id),
        }
    }

    /// A live or pending entity, mutably.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match self.position(id) {
            Some(position) => Some(&mut self.objs[position]),
            None => self.pending.iter_mut().find(|entity| entity.id() == id),
        }
    }

    fn expect_entity(&self, id: EntityId) -> &Entity {
        match self.entity(id) {
            Some(entity) => entity,
            None => panic!("entity {id} is not in the world"),
        }
    }

    /// A component of entity `id`.
    #[must_use]
    pub fn component<T: Variant<AnyComponent>>(&self, id: EntityId) -> Option<&T> {
        if !self.pool.is_live(id) {
            return None;
        }
        self.pool.component::<T>(id.index() as usize)
    }

    /// A component of entity `id`, mutably.
    pub fn component_mut<T: Variant<AnyComponent>>(&mut self, id: EntityId) -> Option<&mut T> {
        if !self.pool.is_live(id) {
            return None;
        }
        self.pool.component_mut::<T>(id.index() as usize)
    }

    /// Live entities, tombstones included until the end of the tick.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.objs
    }

    /// Entities spawned since the last tick boundary.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &[Entity] {
        &self.pending
    }

    /// Entities rendered by the last frame.
    #[inline]
    #[must_use]
    pub const fn in_view(&self) -> usize {
        self.in_view
    }

    /// The component pool.
    #[inline]
    #[must_use]
    pub const fn pool(&self) -> &ComponentPool<AnyComponent> {
        &self.pool
    }

    /// Item definitions.
    #[inline]
    #[must_use]
    pub const fn items(&self) -> &ItemRegistry {
        &self.items
    }

    /// World randomness.
    #[inline]
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Shared meshes.
    #[inline]
    #[must_use]
    pub const fn models(&self) -> &Arc<ModelLibrary> {
        &self.models
    }

    /// World tunables.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Life, Model};
    use fall_core::{share, Hand, InteractKind, Mesh};

    fn flat_world() -> World {
        let config = WorldConfig {
            chunk_window: 1,
            pool_initial_capacity: 2,
            ..WorldConfig::production()
        };
        let models = Arc::new(ModelLibrary::placeholder());
        World::new(config, Box::new(|_: i32, _: i32| 0.0_f32), models).unwrap()
    }

    #[test]
    fn test_spawned_entities_join_at_tick_boundary() {
        let mut world = flat_world();
        let player = world.spawn(Transform::at(0.0, 0.0, 0.0), true, []);
        assert!(world.entities().is_empty());
        assert!(world.entity(player).is_some());

        let stats = world.update(player, Clock::default(), &InputState::default());
        assert_eq!(stats.activated, 0);
        assert_eq!(stats.merged, 1);
        assert_eq!(world.entities().len(), 1);
        assert!(world.pending().is_empty());
    }

    #[test]
    fn test_streaming_runs_once_per_chunk() {
        let mut world = flat_world();
        let player = world.spawn(Transform::at(0.0, 0.0, 0.0), true, []);
        let input = InputState::default();

        assert_eq!(world.update(player, Clock::default(), &input).chunks_generated, 9);
        assert_eq!(world.update(player, Clock::default(), &input).chunks_generated, 0);

        world.entity_mut(player).unwrap().current.x = 16.0;
        assert_eq!(world.update(player, Clock::default(), &input).chunks_generated, 3);
        assert_eq!(world.chunk_count(), 12);
    }

    #[test]
    fn test_tombstones_reclaim_pool_index() {
        let mut world = flat_world();
        let input = InputState::default();
        let player = world.spawn(Transform::at(0.0, 0.0, 0.0), true, []);
        let rock = world.spawn(
            Transform::at(2.0, 0.0, 0.0),
            false,
            [AnyComponent::Model(Model::new(share(Mesh::new()), 0.0)), Life::new(0).into()],
        );
        world.update(player, Clock::default(), &input);

        let hit = Interaction::new(player, Hand::Left, InteractKind::Hit);
        assert!(world.interact(rock, &hit, Clock::default(), &input));
        assert!(world.entity(rock).unwrap().removed);

        let stats = world.update(player, Clock::default(), &input);
        assert_eq!(stats.reclaimed, 1);
        assert!(world.entity(rock).is_none());
        assert!(world.component::<Life>(rock).is_none());
        assert!(!world.interact(rock, &hit, Clock::default(), &input));
        assert_eq!(world.pool().live_count(), 1);
    }

    #[test]
    fn test_chunk_at_caches() {
        let mut world = flat_world();
        let coord = ChunkCoord::new(3, -2);
        let first: *const Chunk = world.chunk_at(coord);
        let second: *const Chunk = world.chunk_at(coord);
        assert!(std::ptr::eq(first, second));
        assert_eq!(world.chunk_count(), 1);
    }
}
