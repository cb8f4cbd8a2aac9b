//! # Component Kinds
//!
//! The closed set of component kinds and the lifecycle trait every
//! component type implements.
//!
//! ## Dispatch
//!
//! A component type is normally one tagged enum with a variant per kind.
//! The owning [`Entity`] walks its slot group in kind order and calls the
//! hook on each occupied slot, so iteration order is fixed and
//! deterministic.

use crate::ecs::Entity;
use crate::interaction::Interaction;

/// Number of component kinds, and therefore the slot-group stride.
pub const KIND_COUNT: usize = 10;

/// One slot per component kind, indexed by [`ComponentKind::slot`].
pub type SlotGroup<C> = [Option<C>; KIND_COUNT];

/// Closed enumeration of component kinds.
///
/// The discriminant is the slot offset inside an entity's group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ComponentKind {
    /// First/third person camera and movement.
    Camera = 0,
    /// Ray-collidable geometry.
    Collision = 1,
    /// Static render model.
    Model = 2,
    /// Player avatar and punch animation.
    Play = 3,
    /// Falling snow flake.
    Snow = 4,
    /// Snow-emitting tree.
    Tree = 5,
    /// Item dropped on death.
    Drop = 6,
    /// Item lying in the world.
    ItemDrop = 7,
    /// Carried item stacks.
    Inventory = 8,
    /// Hit points.
    Life = 9,
}

impl ComponentKind {
    /// Every kind in slot order.
    pub const ALL: [Self; KIND_COUNT] = [
        Self::Camera,
        Self::Collision,
        Self::Model,
        Self::Play,
        Self::Snow,
        Self::Tree,
        Self::Drop,
        Self::ItemDrop,
        Self::Inventory,
        Self::Life,
    ];

    /// Slot offset of this kind inside a slot group.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Human readable name, used in panic messages and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Collision => "collision",
            Self::Model => "model",
            Self::Play => "play",
            Self::Snow => "snow",
            Self::Tree => "tree",
            Self::Drop => "drop",
            Self::ItemDrop => "item_drop",
            Self::Inventory => "inventory",
            Self::Life => "life",
        }
    }
}

/// A component stored in the pool.
///
/// Every hook has an empty default so a component only implements the
/// capabilities it actually has. The owner is passed in on every call
/// instead of being stored in the component.
///
/// `Tick` is the context threaded through simulation hooks and `Frame`
/// the one threaded through rendering.
pub trait Component: Sized {
    /// Context borrowed for the duration of a tick hook.
    type Tick<'t>;
    /// Context borrowed for the duration of a render hook.
    type Frame<'f>;

    /// The kind this component occupies.
    fn kind(&self) -> ComponentKind;

    /// Called once per tick while the owner is active.
    fn update(&mut self, _owner: &mut Entity, _ctx: &mut Self::Tick<'_>) {}

    /// Called once per frame while the owner is selected for rendering.
    fn render(&self, _owner: &Entity, _ctx: &mut Self::Frame<'_>) {}

    /// Called when another entity interacts with the owner.
    fn interact(
        &mut self,
        _owner: &mut Entity,
        _interaction: &Interaction,
        _ctx: &mut Self::Tick<'_>,
    ) {
    }

    /// Called once when the owner is reclaimed.
    fn die(&mut self, _owner: &mut Entity, _ctx: &mut Self::Tick<'_>) {}
}

/// Typed access to one variant of a component enum.
pub trait Variant<C>: Sized {
    /// The slot this variant lives in.
    const KIND: ComponentKind;

    /// Borrows the variant if `component` is one.
    fn peek(component: &C) -> Option<&Self>;

    /// Mutably borrows the variant if `component` is one.
    fn peek_mut(component: &mut C) -> Option<&mut Self>;
}
