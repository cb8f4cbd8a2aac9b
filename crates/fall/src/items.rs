//! # Items
//!
//! Item definitions are registered once at world creation. Everything else
//! refers to them by [`ItemId`].

use std::collections::HashMap;

use fall_core::SharedMesh;

use crate::error::{FallError, FallResult};

/// Unique identifier for an item type. Ids are dense, in registration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u16);

impl ItemId {
    /// The empty item.
    pub const AIR: Self = Self(0);
    /// Logs dropped by trees.
    pub const WOOD: Self = Self(1);
}

/// An item definition.
#[derive(Clone, Debug)]
pub struct Item {
    /// Unique identifier.
    pub id: ItemId,
    /// Registry name.
    pub name: String,
    /// Model shown when the item lies in the world.
    pub model: Option<SharedMesh>,
}

/// A number of one item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemStack {
    /// The item type.
    pub item: ItemId,
    /// Number of items in this stack.
    pub size: u32,
}

impl ItemStack {
    /// Creates a new item stack.
    #[inline]
    #[must_use]
    pub const fn new(item: ItemId, size: u32) -> Self {
        Self { item, size }
    }

    /// Returns true if the stack holds nothing.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0 || self.item.0 == ItemId::AIR.0
    }
}

/// Every item the world knows about.
#[derive(Clone, Debug, Default)]
pub struct ItemRegistry {
    items: Vec<Item>,
    by_name: HashMap<String, ItemId>,
}

impl ItemRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in items, `air` and `wood`, in id order.
    #[must_use]
    pub fn with_defaults(wood_model: SharedMesh) -> Self {
        let mut registry = Self::new();
        registry.register("air", None);
        registry.register("wood", Some(wood_model));
        registry
    }

    /// Adds an item and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the name is taken or the id space is exhausted.
    pub fn register(&mut self, name: &str, model: Option<SharedMesh>) -> ItemId {
        assert!(
            !self.by_name.contains_key(name),
            "item {name} registered twice"
        );
        let id = ItemId(u16::try_from(self.items.len()).unwrap_or_else(|_| {
            panic!("more than {} items registered", u16::MAX)
        }));
        self.items.push(Item {
            id,
            name: name.to_owned(),
            model,
        });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    /// Looks an item up by id.
    #[inline]
    #[must_use]
    pub fn by_id(&self, id: ItemId) -> Option<&Item> {
        self.items.get(usize::from(id.0))
    }

    /// Looks an item up by name.
    ///
    /// # Errors
    ///
    /// Returns [`FallError::UnknownItem`] if nothing is registered as `name`.
    pub fn by_name(&self, name: &str) -> FallResult<&Item> {
        self.by_name
            .get(name)
            .and_then(|id| self.by_id(*id))
            .ok_or_else(|| FallError::UnknownItem(name.to_owned()))
    }

    /// Number of registered items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
