//! # World Tick Integration Test
//!
//! Tick ordering across the whole world: spawns stay invisible until the
//! next boundary, activation stops at the radius, and the catch-up cap
//! holds under a long stall.

use std::sync::Arc;
use std::time::Duration;

use fall::components::{AnyComponent, DropTable, Inventory, ItemDrop, Life, Snow, Tree};
use fall::{spawn, Clock, GameContext, InputState, ItemId, ModelLibrary, World, WorldConfig};
use fall_core::{DrawList, EntityId, Hand, InteractKind, Interaction, Transform};

fn flat_world(config: WorldConfig) -> World {
    World::new(
        config,
        Box::new(|_: i32, _: i32| 0.0_f32),
        Arc::new(ModelLibrary::placeholder()),
    )
    .unwrap()
}

fn small_config() -> WorldConfig {
    WorldConfig {
        chunk_window: 1,
        pool_initial_capacity: 4,
        tree_cells: 2,
        bush_cells: 1,
        ..WorldConfig::production()
    }
}

/// Test: a flake spawned by a tree is counted one tick later, not the same tick.
#[test]
fn test_spawns_are_deferred_one_tick() {
    let mut world = flat_world(small_config());
    let input = InputState::default();
    let player = world.spawn(Transform::at(0.0, 0.0, 0.0), false, []);
    world.spawn(Transform::at(5.0, 0.0, 5.0), true, [AnyComponent::Tree(Tree)]);

    // Tick 1: both join the world, nothing was live yet.
    let first = world.update(player, Clock::default(), &input);
    assert_eq!(first.activated, 0);
    assert_eq!(first.merged, 2);

    // Tick 2: the tree runs and spawns a flake, which is not activated.
    let second = world.update(player, Clock::default(), &input);
    assert_eq!(second.activated, 1);
    assert_eq!(second.merged, 1);

    // Tick 3: the flake from tick 2 runs alongside the tree.
    let third = world.update(player, Clock::default(), &input);
    assert_eq!(third.activated, 2);
    assert_eq!(
        world
            .entities()
            .iter()
            .filter(|entity| world.component::<Snow>(entity.id()).is_some())
            .count(),
        2
    );
}

/// Test: activation uses a strict comparison on squared planar distance.
#[test]
fn test_activation_radius_boundary() {
    let config = WorldConfig {
        activation_radius_sq: 100.0,
        ..small_config()
    };
    let mut world = flat_world(config);
    let input = InputState::default();
    let player = world.spawn(Transform::at(0.0, 0.0, 0.0), false, []);
    // Height is ignored: only x and z count.
    world.spawn(Transform::at(10.0, 50.0, 0.0), true, []);
    world.spawn(Transform::at(0.0, -50.0, 9.99), true, []);

    world.update(player, Clock::default(), &input);
    let stats = world.update(player, Clock::default(), &input);
    assert_eq!(stats.activated, 1);
}

/// Test: a stalled frame runs at most the capped number of ticks.
#[test]
fn test_stalled_frame_is_capped() {
    let mut world = flat_world(small_config());
    let player = spawn::populate(&mut world);
    let mut game = GameContext::new(world, player);
    let mut draws = DrawList::new();

    let stats = game.frame(Duration::from_secs(5), &mut draws);
    assert_eq!(stats.ticks_run, 10);
    assert_eq!(stats.ticks_dropped, 90);

    let next = game.frame(Duration::from_millis(50), &mut draws);
    assert_eq!(next.ticks_run, 1);
    assert_eq!(next.ticks_dropped, 0);
    assert_eq!(game.stats().frames_capped, 1);
    assert!((game.clock().now_ms - 5050.0).abs() < 1e-6);
}

/// Test: the player falls onto the terrain and stays there.
#[test]
fn test_player_lands_on_terrain() {
    let mut world = flat_world(small_config());
    let player = spawn::populate(&mut world);
    let mut game = GameContext::new(world, player);

    for tick in 1u32..=100 {
        game.tick(Clock {
            now_ms: f64::from(tick) * 50.0,
            ticks: u64::from(tick),
            ..Clock::default()
        });
    }
    let entity = *game.world().entity(player).unwrap();
    assert!(entity.current.y.abs() < 1e-4);
    assert!((entity.prev.y - entity.current.y).abs() < 1e-4);
}

/// A player and a tree in a pool of `capacity`, after the tree has been
/// punched down and reclaimed. Returns the world and the player.
fn reclaim_dying_tree(capacity: usize) -> (World, EntityId) {
    let config = WorldConfig {
        pool_initial_capacity: capacity,
        ..small_config()
    };
    let mut world = flat_world(config);
    let input = InputState::default();
    let player = world.spawn(
        Transform::at(0.0, 0.0, 0.0),
        false,
        [AnyComponent::Inventory(Inventory::new())],
    );
    let tree = world.spawn(
        Transform::at(5.0, 0.0, 0.0),
        false,
        [
            AnyComponent::Drop(DropTable::new(ItemId::WOOD, 1, 3)),
            Life::new(0).into(),
        ],
    );
    world.update(player, Clock::default(), &input);

    let hit = Interaction::new(player, Hand::Left, InteractKind::Hit);
    assert!(world.interact(tree, &hit, Clock::default(), &input));
    assert_eq!(world.update(player, Clock::default(), &input).reclaimed, 1);
    (world, player)
}

/// Test: a drop spawned from `die` while the pool is exactly full grows
/// the pool without disturbing live components.
#[test]
fn test_death_drop_into_full_pool() {
    let (full, full_player) = reclaim_dying_tree(2);
    assert_eq!(full.pool().capacity(), 4);
    assert_eq!(full.pool().relocations(), 1);

    let (spare, spare_player) = reclaim_dying_tree(3);
    assert_eq!(spare.pool().capacity(), 3);
    assert_eq!(spare.pool().relocations(), 0);

    for (world, player) in [(&full, full_player), (&spare, spare_player)] {
        assert!(world.component::<Inventory>(player).is_some());
        assert_eq!(world.pool().live_count(), 2);

        let item = world.pending()[0];
        assert!((item.current.y - 4.0).abs() < f32::EPSILON);
        let stack = world.component::<ItemDrop>(item.id()).unwrap().stack();
        assert_eq!(stack.item, ItemId::WOOD);
        assert!((1..=3).contains(&stack.size));
    }
}
