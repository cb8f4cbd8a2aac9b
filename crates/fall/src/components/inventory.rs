//! Carried items.

use crate::items::{ItemId, ItemStack};

/// Item stacks, one per item type.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    stacks: Vec<ItemStack>,
}

impl Inventory {
    /// An empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `stack`, merging it into an existing stack of the same item.
    /// A merged stack stops growing at `u32::MAX`.
    pub fn add(&mut self, stack: ItemStack) {
        if stack.is_empty() {
            return;
        }
        match self.stacks.iter_mut().find(|s| s.item == stack.item) {
            Some(existing) => existing.size = existing.size.saturating_add(stack.size),
            None => self.stacks.push(stack),
        }
    }

    /// How many of `item` are carried.
    #[must_use]
    pub fn count(&self, item: ItemId) -> u32 {
        self.stacks
            .iter()
            .find(|s| s.item == item)
            .map_or(0, |s| s.size)
    }

    /// Stacks in the order their items were first picked up.
    #[inline]
    #[must_use]
    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }
}
