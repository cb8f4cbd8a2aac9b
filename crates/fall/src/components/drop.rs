//! Loot left behind on death.

use fall_core::{Entity, Transform};
use rand::Rng;

use crate::components::{AnyComponent, Collision, ItemDrop, Model};
use crate::context::SimContext;
use crate::items::{ItemId, ItemStack};

/// Dropped items appear this far above the owner's base.
const DROP_HEIGHT: f32 = 4.0;

/// What the owner drops when it dies: between `min` and `max` of one item.
#[derive(Clone, Debug)]
pub struct DropTable {
    item: ItemId,
    min: u32,
    max: u32,
}

impl DropTable {
    /// Drops `min..=max` of `item`.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    #[must_use]
    pub fn new(item: ItemId, min: u32, max: u32) -> Self {
        assert!(min <= max, "drop range {min}..={max} is empty");
        Self { item, min, max }
    }

    /// The dropped item.
    #[inline]
    #[must_use]
    pub const fn item(&self) -> ItemId {
        self.item
    }

    pub(crate) fn die(&self, owner: &Entity, ctx: &mut SimContext<'_>) {
        let size = ctx.rng.gen_range(self.min..=self.max);
        let stack = ItemStack::new(self.item, size);

        let mut components = vec![AnyComponent::ItemDrop(ItemDrop::new(stack, &mut *ctx.rng))];
        if let Some(mesh) = ctx.items.by_id(self.item).and_then(|item| item.model.clone()) {
            components.push(Model::new(mesh.clone(), 0.0).into());
            components.push(Collision::mesh(mesh).into());
        }

        let at = Transform::at(
            owner.current.x,
            owner.current.y + DROP_HEIGHT,
            owner.current.z,
        );
        ctx.spawn(at, true, components);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testbed::TestBed;
    use fall_core::ComponentKind;

    #[test]
    fn test_death_spawns_item_with_model() {
        let mut bed = TestBed::flat(0.0);
        let table = DropTable::new(ItemId::WOOD, 1, 3);
        let mut tree = bed.place(
            Transform::at(1.0, 2.0, 3.0),
            [AnyComponent::Drop(table)],
        );

        let mut group = bed.pool.take(tree.index());
        let mut ctx = bed.ctx();
        tree.die(&mut group, &mut ctx);
        bed.pool.restore(tree.index(), group);

        assert_eq!(bed.pending.len(), 1);
        let item = bed.pending[0];
        assert!((item.current.y - 6.0).abs() < f32::EPSILON);

        let slots = bed.pool.get(item.index());
        assert!(slots[ComponentKind::Model.slot()].is_some());
        assert!(slots[ComponentKind::Collision.slot()].is_some());
        let stack = bed.pool.component::<ItemDrop>(item.index()).unwrap().stack();
        assert_eq!(stack.item, ItemId::WOOD);
        assert!((1..=3).contains(&stack.size));
    }

    #[test]
    fn test_modelless_item_drops_bare() {
        let mut bed = TestBed::flat(0.0);
        let table = DropTable::new(ItemId::AIR, 2, 2);
        let mut owner = bed.place(Transform::at(0.0, 0.0, 0.0), [AnyComponent::Drop(table)]);

        let mut group = bed.pool.take(owner.index());
        let mut ctx = bed.ctx();
        owner.die(&mut group, &mut ctx);

        let item = bed.pending[0];
        let slots = bed.pool.get(item.index());
        assert!(slots[ComponentKind::Model.slot()].is_none());
        assert_eq!(bed.pool.component::<ItemDrop>(item.index()).unwrap().stack().size, 2);
    }

    #[test]
    #[should_panic(expected = "is empty")]
    fn test_inverted_range_panics() {
        let _ = DropTable::new(ItemId::WOOD, 3, 1);
    }
}
