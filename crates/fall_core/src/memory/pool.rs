//! # Component Pool
//!
//! One backing array holds every entity's slot group, `KIND_COUNT` slots
//! per entity. Index `i` owns slots `i * KIND_COUNT .. (i + 1) * KIND_COUNT`.
//!
//! ## Growth
//!
//! When the logical count outgrows the backing array, the array doubles.
//! Nothing outside the pool ever holds a reference into it across that
//! event: entities keep an index and callers re-fetch the slot view with
//! [`ComponentPool::get`], so a relocation cannot leave a stale view.
//!
//! ## Reuse
//!
//! Returned indices go to a FIFO queue. The old components stay in place
//! until the index is rented again, and only then is the region cleared.

use std::collections::VecDeque;

use tracing::debug;

use crate::ecs::{EntityId, SlotGroup, Variant, KIND_COUNT};

/// Slab of component slot groups addressed by entity index.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. It is owned and mutated by the single
/// simulation thread.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool: ComponentPool<MyComponent> = ComponentPool::new(1024);
///
/// let id = pool.rent();
/// pool.get_mut(id.index() as usize)[kind.slot()] = Some(component);
///
/// pool.ret(id);
/// ```
pub struct ComponentPool<C> {
    /// `capacity * KIND_COUNT` slots.
    slots: Vec<Option<C>>,
    /// Per-index generation, bumped on every reuse.
    generations: Vec<u32>,
    /// Per-index vacancy, set between `ret` and the next `rent`.
    vacant: Vec<bool>,
    /// Returned indices, reused oldest first.
    free: VecDeque<u32>,
    /// Indices ever handed out.
    count: usize,
    /// Slot groups the backing array can hold.
    capacity: usize,
    /// Number of growth events.
    relocations: u32,
}

impl<C> ComponentPool<C> {
    /// Creates a pool with room for `capacity` entities before the first growth.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        let mut slots = Vec::with_capacity(capacity * KIND_COUNT);
        slots.resize_with(capacity * KIND_COUNT, || None);

        Self {
            slots,
            generations: vec![0; capacity],
            vacant: vec![false; capacity],
            free: VecDeque::new(),
            count: 0,
            capacity,
            relocations: 0,
        }
    }

    /// Slot groups the backing array holds before the next growth.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Indices handed out so far, live or returned.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Indices currently rented.
    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.count - self.free.len()
    }

    /// Indices waiting in the free queue.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// How many times the backing array has been reallocated.
    #[inline]
    #[must_use]
    pub const fn relocations(&self) -> u32 {
        self.relocations
    }

    /// Whether `id` names a rented index of the current generation.
    #[inline]
    #[must_use]
    pub fn is_live(&self, id: EntityId) -> bool {
        let index = id.index() as usize;
        index < self.count && !self.vacant[index] && self.generations[index] == id.generation()
    }

    /// Rents an index with an empty slot group.
    ///
    /// Reuses the oldest returned index if there is one, clearing whatever
    /// its previous owner left behind. Otherwise extends the logical count,
    /// doubling the backing array when it is full.
    pub fn rent(&mut self) -> EntityId {
        if let Some(index) = self.free.pop_front() {
            let slot = index as usize;
            self.clear_region(slot);
            self.vacant[slot] = false;
            self.generations[slot] = self.generations[slot].wrapping_add(1);
            return EntityId::new(index, self.generations[slot]);
        }

        if self.count == self.capacity {
            self.grow();
        }

        let index = self.count;
        self.count += 1;
        EntityId::new(index as u32, self.generations[index])
    }

    /// Returns an index to the free queue without clearing it.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale or already returned.
    pub fn ret(&mut self, id: EntityId) {
        assert!(self.is_live(id), "returned stale or vacant pool index {id}");
        self.vacant[id.index() as usize] = true;
        self.free.push_back(id.index());
    }

    /// Slot view of `index`, `KIND_COUNT` long.
    ///
    /// # Panics
    ///
    /// Panics if `index` is beyond the logical count.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> &[Option<C>] {
        let range = self.region(index);
        &self.slots[range]
    }

    /// Mutable slot view of `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is beyond the logical count.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut [Option<C>] {
        let range = self.region(index);
        &mut self.slots[range]
    }

    /// Typed lookup of one component of `index`.
    #[inline]
    #[must_use]
    pub fn component<T: Variant<C>>(&self, index: usize) -> Option<&T> {
        self.get(index)[T::KIND.slot()].as_ref().and_then(T::peek)
    }

    /// Typed mutable lookup of one component of `index`.
    #[inline]
    pub fn component_mut<T: Variant<C>>(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)[T::KIND.slot()].as_mut().and_then(T::peek_mut)
    }

    /// Moves the slot group of `index` out, leaving empty slots behind.
    ///
    /// Lets a component run a hook that rents further indices (and so may
    /// grow the pool) while its own group is held by value. Pair with
    /// [`ComponentPool::restore`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is beyond the logical count.
    pub fn take(&mut self, index: usize) -> SlotGroup<C> {
        let view = self.get_mut(index);
        std::array::from_fn(|kind| view[kind].take())
    }

    /// Puts a group taken with [`ComponentPool::take`] back.
    ///
    /// # Panics
    ///
    /// Panics if `index` is beyond the logical count.
    pub fn restore(&mut self, index: usize, group: SlotGroup<C>) {
        let view = self.get_mut(index);
        for (slot, component) in view.iter_mut().zip(group) {
            *slot = component;
        }
    }

    fn region(&self, index: usize) -> std::ops::Range<usize> {
        assert!(
            index < self.count,
            "pool index {index} is beyond the logical count {}",
            self.count
        );
        let start = index * KIND_COUNT;
        start..start + KIND_COUNT
    }

    fn clear_region(&mut self, index: usize) {
        let start = index * KIND_COUNT;
        for slot in &mut self.slots[start..start + KIND_COUNT] {
            *slot = None;
        }
    }

    fn grow(&mut self) {
        let capacity = self.capacity * 2;
        self.slots.reserve_exact((capacity - self.capacity) * KIND_COUNT);
        self.slots.resize_with(capacity * KIND_COUNT, || None);
        self.generations.resize(capacity, 0);
        self.vacant.resize(capacity, false);
        self.capacity = capacity;
        self.relocations += 1;

        debug!(
            capacity,
            relocations = self.relocations,
            live = self.live_count(),
            "component pool relocated"
        );
    }
}
