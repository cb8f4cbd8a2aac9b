//! Trees that snow.

use fall_core::{Entity, Transform};
use rand::Rng;

use crate::components::{AnyComponent, Snow};
use crate::context::SimContext;

/// Flakes start this far above the tree's base, plus up to [`SPAWN_SPREAD`].
const SPAWN_HEIGHT: f32 = 16.0;
const SPAWN_SPREAD: f32 = 12.0;

/// Spawns one snow flake above the owner every tick, unless the last
/// frame already showed more entities than the snow budget.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tree;

impl Tree {
    pub(crate) fn update(self, owner: &mut Entity, ctx: &mut SimContext<'_>) {
        if ctx.in_view > ctx.config.snow_budget {
            return;
        }
        let y = owner.current.y + SPAWN_HEIGHT + ctx.rng.gen_range(0.0..SPAWN_SPREAD);
        let snow = Snow::new(&mut *ctx.rng);
        ctx.spawn(
            Transform::at(owner.current.x, y, owner.current.z),
            true,
            [AnyComponent::Snow(snow)],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testbed::TestBed;

    #[test]
    fn test_spawns_flake_above_into_pending() {
        let mut bed = TestBed::flat(0.0);
        let mut tree = bed.place(Transform::at(4.0, 10.0, -4.0), [AnyComponent::Tree(Tree)]);

        bed.update(&mut tree);
        assert_eq!(bed.pending.len(), 1);
        let flake = bed.pending[0];
        assert!(flake.updates);
        assert!((26.0..38.0).contains(&flake.current.y));
        assert!((flake.current.x - 4.0).abs() < f32::EPSILON);
        assert!(bed.pool.component::<Snow>(flake.index()).is_some());
    }

    #[test]
    fn test_respects_snow_budget() {
        let mut bed = TestBed::flat(0.0);
        bed.in_view = bed.config.snow_budget + 1;
        let mut tree = bed.place(Transform::at(0.0, 0.0, 0.0), [AnyComponent::Tree(Tree)]);

        bed.update(&mut tree);
        assert!(bed.pending.is_empty());

        bed.in_view = bed.config.snow_budget;
        bed.update(&mut tree);
        assert_eq!(bed.pending.len(), 1);
    }
}
