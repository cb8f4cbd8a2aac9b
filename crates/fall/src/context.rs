//! # Game Context
//!
//! There are no globals. [`GameContext`] owns the world, the player
//! handle, input and timing, and lends narrower contexts to component
//! hooks:
//!
//! - [`SimContext`] for `update`, `interact` and `die`: mutable access to
//!   the pool and the deferred-add buffer, plus terrain, randomness and
//!   the tick clock.
//! - [`FrameContext`] for `render`: the render sink, the frame clock and
//!   the player's view.

use std::sync::Arc;
use std::time::{Duration, Instant};

use fall_core::{
    ComponentPool, Entity, EntityId, Hand, InteractKind, Interaction, RenderSink, Transform,
    Variant,
};
use fall_procedural::HeightFn;
use rand_chacha::ChaCha8Rng;

use crate::components::{AnyComponent, Camera, Play, View};
use crate::config::WorldConfig;
use crate::game_loop::{FixedTicker, FrameStats, FrameStatsAccumulator};
use crate::input::InputState;
use crate::items::ItemRegistry;
use crate::raycast::HitResult;
use crate::spawn::ModelLibrary;
use crate::world::{RenderStats, TickStats, World};

/// Simulation time as seen by one tick or one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    /// Milliseconds since the world started.
    pub now_ms: f64,
    /// Fraction of the next tick already elapsed, in `[0, 1]`.
    pub tick_delta: f32,
    /// Ticks run so far.
    pub ticks: u64,
}

/// Everything a simulation hook may touch besides its own entity.
pub struct SimContext<'a> {
    /// Component storage. The running entity's own group is checked out,
    /// so looking it up here finds empty slots.
    pub pool: &'a mut ComponentPool<AnyComponent>,
    /// Entities spawned this tick. They join the world at the next tick boundary.
    pub(crate) pending: &'a mut Vec<Entity>,
    /// Terrain height function.
    pub terrain: &'a dyn HeightFn,
    /// Time of this tick.
    pub clock: Clock,
    /// Player input for this tick.
    pub input: &'a InputState,
    /// World randomness.
    pub rng: &'a mut ChaCha8Rng,
    /// Entities rendered by the last frame.
    pub in_view: usize,
    /// Item definitions.
    pub items: &'a ItemRegistry,
    /// World tunables.
    pub config: &'a WorldConfig,
}

impl SimContext<'_> {
    /// Spawns an entity. It becomes visible to the world on the next tick.
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

    /// Interpolated terrain height at `(x, z)`.
    #[inline]
    #[must_use]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        fall_procedural::height_at(self.terrain, x, z)
    }

    /// Milliseconds since the world started.
    #[inline]
    #[must_use]
    pub fn now(&self) -> f64 {
        self.clock.now_ms
    }

    /// Another entity's component, if `id` is live and has one.
    pub fn component_mut<T: Variant<AnyComponent>>(&mut self, id: EntityId) -> Option<&mut T> {
        if !self.pool.is_live(id) {
            return None;
        }
        self.pool.component_mut::<T>(id.index() as usize)
    }
}

/// Everything a render hook may touch.
pub struct FrameContext<'a> {
    /// Receives the draws.
    pub sink: &'a mut dyn RenderSink,
    /// Time of this frame.
    pub clock: Clock,
    /// Where the player looks from.
    pub view: View,
    /// Shared meshes.
    pub models: &'a ModelLibrary,
}

/// The running game: world, player and timing.
pub struct GameContext {
    world: World,
    player: EntityId,
    models: Arc<ModelLibrary>,
    /// Input gathered since the last tick.
    pub input: InputState,
    hit: HitResult,
    ticker: FixedTicker,
    clock: Clock,
    stats: FrameStatsAccumulator,
    frame: u64,
}

impl GameContext {
    /// Wraps a populated world around `player`.
    #[must_use]
    pub fn new(world: World, player: EntityId) -> Self {
        let ticker = FixedTicker::from_config(world.config());
        let models = Arc::clone(world.models());
        Self {
            world,
            player,
            models,
            input: InputState::default(),
            hit: HitResult::NONE,
            ticker,
            clock: Clock::default(),
            stats: FrameStatsAccumulator::new(),
            frame: 0,
        }
    }

    /// The world.
    #[inline]
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The world, mutably.
    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The player handle.
    #[inline]
    #[must_use]
    pub const fn player(&self) -> EntityId {
        self.player
    }

    /// What the player aimed at during the last tick.
    #[inline]
    #[must_use]
    pub const fn hit(&self) -> &HitResult {
        &self.hit
    }

    /// The clock of the last tick or frame.
    #[inline]
    #[must_use]
    pub const fn clock(&self) -> Clock {
        self.clock
    }

    /// Statistics over every frame so far.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats
    }

    /// Runs one tick: the world, then the player's aim and actions.
    pub fn tick(&mut self, clock: Clock) -> TickStats {
        self.clock = clock;
        let stats = self.world.update(self.player, clock, &self.input);
        self.hit = self.aim();
        self.act();
        self.input.end_tick();
        stats
    }

    /// Runs one frame: catches up on ticks for `elapsed`, then renders.
    pub fn frame(&mut self, elapsed: Duration, sink: &mut dyn RenderSink) -> FrameStats {
        let start = Instant::now();
        let due = self.ticker.advance(elapsed);
        let mut activated = 0;
        for _ in 0..due {
            let clock = self.ticker.tick();
            activated += self.tick(clock).activated;
        }
        let tick_us = start.elapsed().as_micros() as u64;

        let start = Instant::now();
        self.clock = self.ticker.frame_clock();
        let render = self.render(sink);
        let render_us = start.elapsed().as_micros() as u64;

        let stats = FrameStats {
            frame: self.frame,
            ticks_run: due,
            ticks_dropped: self.ticker.last_dropped(),
            activated,
            entities_rendered: render.entities,
            chunks_rendered: render.chunks,
            tick_us,
            render_us,
        };
        self.stats.record(stats);
        self.frame += 1;
        stats
    }

    /// Renders the world from the player's view at the current clock.
    pub fn render(&mut self, sink: &mut dyn RenderSink) -> RenderStats {
        let view = self.view();
        let mut frame = FrameContext {
            sink,
            clock: self.clock,
            view,
            models: &self.models,
        };
        self.world.render(self.player, &mut frame)
    }

    /// The player's view at the current clock.
    ///
    /// # Panics
    ///
    /// Panics if the player has left the world or has no camera.
    #[must_use]
    pub fn view(&self) -> View {
        let player = self.expect_player();
        View::of(
            player,
            self.clock.tick_delta,
            self.input.first_person,
            self.world.terrain(),
        )
    }

    fn expect_player(&self) -> &Entity {
        match self.world.entity(self.player) {
            Some(player) => player,
            None => panic!("player {} is not in the world", self.player),
        }
    }

    fn aim(&self) -> HitResult {
        let player = self.expect_player();
        let Some(camera) = self.world.component::<Camera>(self.player) else {
            return HitResult::NONE;
        };
        let eye = View::first_person_eye(player, self.clock.tick_delta);
        self.world.raycast(eye, camera.front())
    }

    /// One action per tick: a left punch, else a right punch, else a pickup.
    fn act(&mut self) {
        let input = self.input;
        let now = self.clock.now_ms;
        let can_hit = self
            .world
            .component::<Play>(self.player)
            .is_some_and(|play| play.can_hit(now));

        let (hand, kind) = if input.primary && can_hit {
            (Hand::Left, InteractKind::Hit)
        } else if input.secondary && can_hit {
            (Hand::Right, InteractKind::Hit)
        } else if input.pickup {
            (Hand::Right, InteractKind::Pickup)
        } else {
            return;
        };

        if kind == InteractKind::Hit {
            if let Some(play) = self.world.component_mut::<Play>(self.player) {
                play.punch(hand, now);
            }
        }
        if let Some(target) = self.hit.entity() {
            let interaction = Interaction::new(self.player, hand, kind);
            self.world.interact(target, &interaction, self.clock, &input);
        }
    }
}
