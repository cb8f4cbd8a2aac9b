//! Messages one entity sends to another.

use crate::ecs::EntityId;

/// What the source entity is doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractKind {
    /// Attack, e.g. punching a tree.
    Hit,
    /// Generic use action.
    Use,
    /// Pick the target up into the source's inventory.
    Pickup,
}

/// Which hand performed the interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hand {
    /// Left hand, primary button.
    Left,
    /// Right hand, secondary button.
    Right,
}

/// An interaction delivered to every component of the target entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interaction {
    /// The entity that initiated it.
    pub source: EntityId,
    /// The hand used.
    pub hand: Hand,
    /// The action.
    pub kind: InteractKind,
}

impl Interaction {
    /// Creates an interaction message.
    #[inline]
    #[must_use]
    pub const fn new(source: EntityId, hand: Hand, kind: InteractKind) -> Self {
        Self { source, hand, kind }
    }
}
