//! Hit points.

use fall_core::{Entity, InteractKind, Interaction};

/// Dies after more hits than it has health.
#[derive(Clone, Debug)]
pub struct Life {
    health: i32,
}

impl Life {
    /// Starts at `health`.
    #[must_use]
    pub const fn new(health: i32) -> Self {
        Self { health }
    }

    /// Remaining health. Negative once the owner is dead.
    #[inline]
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    pub(crate) fn interact(&mut self, owner: &mut Entity, interaction: &Interaction) {
        if interaction.kind != InteractKind::Hit {
            return;
        }
        self.health -= 1;
        if self.health < 0 {
            owner.removed = true;
        }
    }
}
