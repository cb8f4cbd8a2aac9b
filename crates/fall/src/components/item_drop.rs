//! Items lying in the world, waiting to be picked up.

use fall_core::{Entity, InteractKind, Interaction};
use glam::Vec3;
use rand::Rng;

use crate::components::Inventory;
use crate::context::SimContext;
use crate::items::ItemStack;

const GRAVITY: f32 = 0.1;

/// Items rest this far above the terrain.
const REST_HEIGHT: f32 = 1.25;

/// A stack tossed out with a random velocity that falls until it rests.
#[derive(Clone, Debug)]
pub struct ItemDrop {
    stack: ItemStack,
    velocity: Vec3,
}

impl ItemDrop {
    /// Tosses `stack` up and sideways.
    #[must_use]
    pub fn new(stack: ItemStack, rng: &mut impl Rng) -> Self {
        Self {
            stack,
            velocity: Vec3::new(
                rng.gen_range(-0.5..0.5),
                rng.gen_range(0.5..1.0),
                rng.gen_range(-0.5..0.5),
            ),
        }
    }

    /// The carried stack.
    #[inline]
    #[must_use]
    pub const fn stack(&self) -> ItemStack {
        self.stack
    }

    /// Current velocity per tick.
    #[inline]
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub(crate) fn update(&mut self, owner: &mut Entity, ctx: &mut SimContext<'_>) {
        owner.set_prev();
        let ground = ctx.height_at(owner.current.x, owner.current.z);
        if ground + self.velocity.y + REST_HEIGHT > owner.current.y {
            return;
        }
        self.velocity.y -= GRAVITY;
        owner.set_pos(owner.pos() + self.velocity);
    }

    pub(crate) fn interact(
        &self,
        owner: &mut Entity,
        interaction: &Interaction,
        ctx: &mut SimContext<'_>,
    ) {
        if interaction.kind != InteractKind::Pickup || owner.removed {
            return;
        }
        // Only entities that can carry items pick them up.
        let Some(inventory) = ctx.component_mut::<Inventory>(interaction.source) else {
            return;
        };
        inventory.add(self.stack);
        owner.removed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AnyComponent, Life};
    use crate::context::testbed::TestBed;
    use crate::items::ItemId;
    use fall_core::{Hand, Transform};

    #[test]
    fn test_falls_then_rests() {
        let mut bed = TestBed::flat(0.0);
        let drop = ItemDrop::new(ItemStack::new(ItemId::WOOD, 2), &mut bed.rng);
        assert!((0.5..1.0).contains(&drop.velocity().y));
        let mut item = bed.place(Transform::at(0.0, 10.0, 0.0), [AnyComponent::ItemDrop(drop)]);

        let mut ticks = 0;
        loop {
            let before = item.current;
            bed.update(&mut item);
            if item.current == before {
                break;
            }
            ticks += 1;
            assert!(ticks < 500, "item never came to rest");
        }
        assert!(item.current.y < REST_HEIGHT);

        // At rest, prev keeps tracking current.
        bed.update(&mut item);
        assert_eq!(item.prev, item.current);
    }

    #[test]
    fn test_pickup_moves_stack_into_inventory() {
        let mut bed = TestBed::flat(0.0);
        let player = bed.place(Transform::at(0.0, 0.0, 0.0), [AnyComponent::Inventory(Inventory::new())]);
        let drop = ItemDrop::new(ItemStack::new(ItemId::WOOD, 3), &mut bed.rng);
        let mut item = bed.place(Transform::at(1.0, 1.0, 1.0), [AnyComponent::ItemDrop(drop)]);

        let mut group = bed.pool.take(item.index());
        let mut ctx = bed.ctx();
        let hit = Interaction::new(player.id(), Hand::Left, InteractKind::Hit);
        item.interact(&mut group, &hit, &mut ctx);
        assert!(!item.removed);

        let pickup = Interaction::new(player.id(), Hand::Right, InteractKind::Pickup);
        item.interact(&mut group, &pickup, &mut ctx);
        item.interact(&mut group, &pickup, &mut ctx);
        assert!(item.removed);

        let inventory = bed.pool.component::<Inventory>(player.index()).unwrap();
        assert_eq!(inventory.count(ItemId::WOOD), 3);
    }

    #[test]
    fn test_pickup_without_inventory_leaves_item() {
        let mut bed = TestBed::flat(0.0);
        let bystander = bed.place(Transform::at(0.0, 0.0, 0.0), [AnyComponent::Life(Life::new(1))]);
        let drop = ItemDrop::new(ItemStack::new(ItemId::WOOD, 2), &mut bed.rng);
        let mut item = bed.place(Transform::at(1.0, 1.0, 1.0), [AnyComponent::ItemDrop(drop)]);

        let mut group = bed.pool.take(item.index());
        let mut ctx = bed.ctx();
        let pickup = Interaction::new(bystander.id(), Hand::Right, InteractKind::Pickup);
        item.interact(&mut group, &pickup, &mut ctx);
        assert!(!item.removed);
        bed.pool.restore(item.index(), group);
        assert_eq!(bed.pool.component::<ItemDrop>(item.index()).unwrap().stack().size, 2);
    }
}
