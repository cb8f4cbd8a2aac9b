//! # Entities and Components
//!
//! Entities are index handles into the [`ComponentPool`](crate::ComponentPool).
//! Components live in a fixed-size slot group per entity, one slot per
//! [`ComponentKind`].

mod component;
mod entity;

pub use component::{Component, ComponentKind, SlotGroup, Variant, KIND_COUNT};
pub use entity::{Entity, EntityId, Transform};
