//! # Entity Handles
//!
//! An entity is an identifier, a pair of transforms and two flags. Its
//! components are not owned here: they live in the pool slot group at
//! `id.index()`, and every hook receives that group explicitly.

use glam::Vec3;

use crate::ecs::{Component, Variant};
use crate::interaction::Interaction;
use crate::math::lerp;

/// Unique identifier for an entity.
///
/// The ID is split into two parts:
/// - Lower 32 bits: Index into the component pool
/// - Upper 32 bits: Generation counter for detecting stale references
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new entity ID from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Null/invalid entity ID.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

/// Position and orientation. Angles are in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    /// World X.
    pub x: f32,
    /// World Y (up).
    pub y: f32,
    /// World Z.
    pub z: f32,
    /// Heading, 0 facing +X.
    pub yaw: f32,
    /// Elevation, positive looking up.
    pub pitch: f32,
}

impl Transform {
    /// Creates a transform at a position with no rotation.
    #[inline]
    #[must_use]
    pub const fn at(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, yaw: 0.0, pitch: 0.0 }
    }

    /// Position as a vector.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Componentwise linear interpolation from `self` to `to`.
    #[inline]
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            z: lerp(self.z, to.z, t),
            yaw: lerp(self.yaw, to.yaw, t),
            pitch: lerp(self.pitch, to.pitch, t),
        }
    }
}

/// A simulated object.
///
/// `current` is this tick's state and `prev` the last tick's. Rendering
/// reads the interpolation of the two, so anything that moves an entity
/// must call [`Entity::set_prev`] once per tick before writing `current`.
#[derive(Clone, Copy, Debug)]
pub struct Entity {
    id: EntityId,
    /// State at the current tick.
    pub current: Transform,
    /// State at the previous tick.
    pub prev: Transform,
    /// Whether the world ticks this entity. Static decor clears it.
    pub updates: bool,
    /// Tombstone. Reclaimed at the end of the tick it was set in.
    pub removed: bool,
}

impl Entity {
    /// Creates an entity at the origin for a freshly rented pool id.
    #[inline]
    #[must_use]
    pub const fn new(id: EntityId) -> Self {
        Self {
            id,
            current: Transform::at(0.0, 0.0, 0.0),
            prev: Transform::at(0.0, 0.0, 0.0),
            updates: false,
            removed: false,
        }
    }

    /// Creates an entity placed at `transform`, with `prev` already synced.
    #[inline]
    #[must_use]
    pub const fn placed(id: EntityId, transform: Transform) -> Self {
        Self {
            id,
            current: transform,
            prev: transform,
            updates: false,
            removed: false,
        }
    }

    /// The pool id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Pool index of this entity's slot group.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.id.index() as usize
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub fn pos(&self) -> Vec3 {
        self.current.position()
    }

    /// Moves the entity without touching `prev`.
    #[inline]
    pub fn set_pos(&mut self, pos: Vec3) {
        self.current.x = pos.x;
        self.current.y = pos.y;
        self.current.z = pos.z;
    }

    /// Copies the current transform into `prev`.
    #[inline]
    pub fn set_prev(&mut self) {
        self.prev = self.current;
    }

    /// Interpolated transform at `tick_delta` into the next tick.
    #[inline]
    #[must_use]
    pub fn lerped(&self, tick_delta: f32) -> Transform {
        self.prev.lerp(&self.current, tick_delta)
    }

    /// Interpolated X.
    #[inline]
    #[must_use]
    pub fn lerped_x(&self, tick_delta: f32) -> f32 {
        lerp(self.prev.x, self.current.x, tick_delta)
    }

    /// Interpolated Y.
    #[inline]
    #[must_use]
    pub fn lerped_y(&self, tick_delta: f32) -> f32 {
        lerp(self.prev.y, self.current.y, tick_delta)
    }

    /// Interpolated Z.
    #[inline]
    #[must_use]
    pub fn lerped_z(&self, tick_delta: f32) -> f32 {
        lerp(self.prev.z, self.current.z, tick_delta)
    }

    /// Interpolated yaw.
    #[inline]
    #[must_use]
    pub fn lerped_yaw(&self, tick_delta: f32) -> f32 {
        lerp(self.prev.yaw, self.current.yaw, tick_delta)
    }

    /// Interpolated pitch.
    #[inline]
    #[must_use]
    pub fn lerped_pitch(&self, tick_delta: f32) -> f32 {
        lerp(self.prev.pitch, self.current.pitch, tick_delta)
    }

    /// Interpolated position.
    #[inline]
    #[must_use]
    pub fn lerped_pos(&self, tick_delta: f32) -> Vec3 {
        Vec3::new(
            self.lerped_x(tick_delta),
            self.lerped_y(tick_delta),
            self.lerped_z(tick_delta),
        )
    }

    /// Squared distance to `(x, z)` on the horizontal plane.
    #[inline]
    #[must_use]
    pub fn planar_distance_sq(&self, x: f32, z: f32) -> f32 {
        let dx = self.current.x - x;
        let dz = self.current.z - z;
        dx * dx + dz * dz
    }

    // ========================================================================
    // COMPONENT SLOTS
    // ========================================================================

    /// Stores `component` in its kind's slot, replacing any previous one.
    #[inline]
    pub fn add<C: Component>(&self, group: &mut [Option<C>], component: C) {
        let slot = component.kind().slot();
        group[slot] = Some(component);
    }

    /// Whether the group holds a component of `T`'s kind.
    #[inline]
    #[must_use]
    pub fn has<T: Variant<C>, C>(&self, group: &[Option<C>]) -> bool {
        group[T::KIND.slot()].as_ref().and_then(T::peek).is_some()
    }

    /// Borrows the component of `T`'s kind.
    ///
    /// # Panics
    ///
    /// Panics if the slot is empty. Asking for a component an entity was
    /// never given is a logic error.
    #[must_use]
    pub fn get<'g, T: Variant<C>, C>(&self, group: &'g [Option<C>]) -> &'g T {
        match group[T::KIND.slot()].as_ref().and_then(T::peek) {
            Some(component) => component,
            None => panic!("entity {} has no {} component", self.id, T::KIND.name()),
        }
    }

    /// Mutably borrows the component of `T`'s kind.
    ///
    /// # Panics
    ///
    /// Panics if the slot is empty.
    #[must_use]
    pub fn get_mut<'g, T: Variant<C>, C>(&self, group: &'g mut [Option<C>]) -> &'g mut T {
        match group[T::KIND.slot()].as_mut().and_then(T::peek_mut) {
            Some(component) => component,
            None => panic!("entity {} has no {} component", self.id, T::KIND.name()),
        }
    }

    // ========================================================================
    // LIFECYCLE DISPATCH
    // ========================================================================

    /// Runs `update` on every occupied slot in kind order.
    pub fn update<C: Component>(&mut self, group: &mut [Option<C>], ctx: &mut C::Tick<'_>) {
        for component in group.iter_mut().flatten() {
            component.update(self, ctx);
        }
    }

    /// Runs `render` on every occupied slot in kind order.
    pub fn render<C: Component>(&self, group: &[Option<C>], ctx: &mut C::Frame<'_>) {
        for component in group.iter().flatten() {
            component.render(self, ctx);
        }
    }

    /// Delivers `interaction` to every occupied slot in kind order.
    pub fn interact<C: Component>(
        &mut self,
        group: &mut [Option<C>],
        interaction: &Interaction,
        ctx: &mut C::Tick<'_>,
    ) {
        for component in group.iter_mut().flatten() {
            component.interact(self, interaction, ctx);
        }
    }

    /// Runs `die` on every occupied slot in kind order.
    pub fn die<C: Component>(&mut self, group: &mut [Option<C>], ctx: &mut C::Tick<'_>) {
        for component in group.iter_mut().flatten() {
            component.die(self, ctx);
        }
    }
}
