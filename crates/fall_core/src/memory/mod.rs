//! # Memory Management
//!
//! The component pool: every entity's slot group lives in one backing array,
//! rented and returned by index.

mod pool;

pub use pool::ComponentPool;
