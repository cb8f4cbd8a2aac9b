//! # World Population
//!
//! The shared meshes every entity draws with, and the initial forest,
//! bushes and player.

use fall_core::{share, EntityId, Mesh, SharedMesh, Transform, Vertex};
use glam::Vec3;
use rand::Rng;
use tracing::info;

use crate::components::{
    AnyComponent, Camera, Collision, DropTable, Inventory, Life, Model, Play, Tree, SNOW_MODELS,
};
use crate::items::ItemId;
use crate::world::World;

/// Spacing of the tree grid and how far each tree strays from its cell.
const TREE_SPACING: f32 = 50.0;
const TREE_JITTER: f32 = 12.5;

/// Spacing of the bush cluster grid, how far a cluster strays from its
/// cell and how far bushes spread around the cluster.
const BUSH_SPACING: f32 = 100.0;
const BUSH_CELL_JITTER: f32 = 40.0;
const BUSH_SPREAD: f32 = 24.0;
/// Each cluster tries a 3x3 block of bushes.
const BUSH_CLUSTER: usize = 3;

/// Trees and bushes are sunk this far into the ground.
const SINK: f32 = 2.0;

const TREE_HEALTH: i32 = 10;
const BUSH_HEALTH: i32 = 5;

const PLAYER_SPAWN: Transform = Transform {
    x: -1.0,
    y: 25.0,
    z: -1.0,
    yaw: 180.0,
    pitch: 0.0,
};

const BARK: u32 = 0x5A3A_22FF;
const LEAVES: u32 = 0x2F6B_3AFF;
const SNOW: u32 = 0xF4F8_FFFF;
const SKIN: u32 = 0xE0B0_90FF;
const CLOTH: u32 = 0x8A1C_1CFF;

/// Meshes shared by every entity that draws them.
#[derive(Clone, Debug)]
pub struct ModelLibrary {
    /// Tree variants.
    pub trees: Vec<SharedMesh>,
    /// Bush variants.
    pub bushes: Vec<SharedMesh>,
    /// Snow flakes.
    pub snow: [SharedMesh; SNOW_MODELS],
    /// Player head.
    pub head: SharedMesh,
    /// Player hand.
    pub hand: SharedMesh,
    /// Player cape, drawn in the cloth pass.
    pub cape: SharedMesh,
    /// Dropped wood.
    pub log: SharedMesh,
}

impl ModelLibrary {
    /// Simple procedural shapes standing in for loaded models.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            trees: vec![share(tree_mesh(14.0)), share(tree_mesh(18.0))],
            bushes: vec![share(cuboid(Vec3::new(-2.0, 0.0, -2.0), Vec3::new(2.0, 2.5, 2.0), LEAVES))],
            snow: [share(octahedron(0.25, SNOW)), share(octahedron(0.4, SNOW))],
            head: share(cuboid(Vec3::splat(-1.0), Vec3::splat(1.0), SKIN)),
            hand: share(cuboid(Vec3::splat(-1.0), Vec3::splat(1.0), SKIN)),
            cape: share(cape_mesh(4, 6)),
            log: share(cuboid(Vec3::new(-1.5, -0.5, -0.5), Vec3::new(1.5, 0.5, 0.5), BARK)),
        }
    }
}

/// Box between two corners, six outward-facing quads.
fn cuboid(min: Vec3, max: Vec3, color: u32) -> Mesh {
    let mut mesh = Mesh::with_capacity(8, 12);
    mesh.begin();
    append_cuboid(&mut mesh, min, max, color);
    mesh.end();
    mesh
}

fn append_cuboid(mesh: &mut Mesh, min: Vec3, max: Vec3, color: u32) {
    let corner = |i: u32| {
        Vec3::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        )
    };
    let v: [u32; 8] = std::array::from_fn(|i| mesh.put(Vertex::new(corner(i as u32), color)));
    mesh.quad(v[0], v[2], v[3], v[1]); // -z
    mesh.quad(v[4], v[5], v[7], v[6]); // +z
    mesh.quad(v[0], v[4], v[6], v[2]); // -x
    mesh.quad(v[1], v[3], v[7], v[5]); // +x
    mesh.quad(v[0], v[1], v[5], v[4]); // -y
    mesh.quad(v[2], v[6], v[7], v[3]); // +y
}

/// A trunk with a square pyramid of leaves on top.
fn tree_mesh(height: f32) -> Mesh {
    let crown = height * 0.3;
    let mut mesh = Mesh::with_capacity(13, 18);
    mesh.begin();
    append_cuboid(
        &mut mesh,
        Vec3::new(-0.75, 0.0, -0.75),
        Vec3::new(0.75, crown + 1.0, 0.75),
        BARK,
    );

    let half = height * 0.3;
    let apex = mesh.put(Vertex::new(Vec3::new(0.0, height, 0.0), LEAVES));
    let base = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
        .map(|(x, z)| mesh.put(Vertex::new(Vec3::new(x * half, crown, z * half), LEAVES)));
    for i in 0..4 {
        mesh.tri(base[i], base[(i + 1) % 4], apex);
    }
    mesh.quad(base[3], base[2], base[1], base[0]);
    mesh.end();
    mesh
}

fn octahedron(radius: f32, color: u32) -> Mesh {
    let mut mesh = Mesh::with_capacity(6, 8);
    mesh.begin();
    let top = mesh.put(Vertex::new(Vec3::Y * radius, color));
    let bottom = mesh.put(Vertex::new(-Vec3::Y * radius, color));
    let ring = [Vec3::X, Vec3::Z, -Vec3::X, -Vec3::Z].map(|dir| mesh.put(Vertex::new(dir * radius, color)));
    for i in 0..4 {
        let (a, b) = (ring[i], ring[(i + 1) % 4]);
        mesh.tri(a, b, top);
        mesh.tri(b, a, bottom);
    }
    mesh.end();
    mesh
}

/// A flat `columns x rows` grid hanging down from the shoulders.
fn cape_mesh(columns: u32, rows: u32) -> Mesh {
    let (width, length) = (2.4, 3.6);
    let stride = columns + 1;
    let mut mesh = Mesh::with_capacity(
        (stride * (rows + 1)) as usize,
        (columns * rows * 2) as usize,
    );
    mesh.begin();
    for row in 0..=rows {
        for column in 0..=columns {
            let x = (column as f32 / columns as f32 - 0.5) * width;
            let y = -(row as f32 / rows as f32) * length;
            mesh.put(Vertex::new(Vec3::new(0.0, y, x), CLOTH));
        }
    }
    for row in 0..rows {
        for column in 0..columns {
            let a = row * stride + column;
            mesh.quad(a, a + 1, a + stride + 1, a + stride);
        }
    }
    mesh.end();
    mesh
}

/// Plants the forest and spawns the player. Returns the player.
///
/// Everything lands in the pending list and joins the world on the next
/// tick. Cells whose terrain is under water stay empty.
pub fn populate(world: &mut World) -> EntityId {
    let library = std::sync::Arc::clone(world.models());
    let trees = plant_trees(world, &library);
    let bushes = plant_bushes(world, &library);

    let player = world.spawn(
        PLAYER_SPAWN,
        true,
        [
            AnyComponent::Camera(Camera::new(PLAYER_SPAWN.yaw, PLAYER_SPAWN.pitch)),
            Play::new().into(),
            Inventory::new().into(),
        ],
    );
    info!(trees, bushes, %player, "Populated world");
    player
}

/// One tree per grid cell. Models are drawn unrotated so their collision
/// mesh matches what is on screen.
fn plant_trees(world: &mut World, library: &ModelLibrary) -> usize {
    let cells = world.config().tree_cells;
    let mut planted = 0;

    for i in -cells..=cells {
        for j in -cells..=cells {
            let rng = world.rng_mut();
            let x = i as f32 * TREE_SPACING + rng.gen_range(-TREE_JITTER..TREE_JITTER);
            let z = j as f32 * TREE_SPACING + rng.gen_range(-TREE_JITTER..TREE_JITTER);
            let height = world.height_at(x, z);
            if height < 0.0 {
                continue;
            }
            let variant = world.rng_mut().gen_range(0..library.trees.len());
            let mesh = library.trees[variant].clone();
            world.spawn(
                Transform::at(x, height - SINK, z),
                true,
                [
                    AnyComponent::Model(Model::new(mesh.clone(), 0.0)),
                    AnyComponent::Tree(Tree),
                    Collision::mesh(mesh).into(),
                    DropTable::new(ItemId::WOOD, 1, 3).into(),
                    Life::new(TREE_HEALTH).into(),
                ],
            );
            planted += 1;
        }
    }
    planted
}

/// Bush clusters on a coarser grid. A third of the cells stay empty, and
/// each slot of a cluster's 3x3 block is filled one time in three.
fn plant_bushes(world: &mut World, library: &ModelLibrary) -> usize {
    let cells = world.config().bush_cells;
    let mut planted = 0;

    for i in -cells..=cells {
        for j in -cells..=cells {
            let rng = world.rng_mut();
            if rng.gen_range(0..3) == 2 {
                continue;
            }
            let cx = i as f32 * BUSH_SPACING + rng.gen_range(-BUSH_CELL_JITTER..BUSH_CELL_JITTER);
            let cz = j as f32 * BUSH_SPACING + rng.gen_range(-BUSH_CELL_JITTER..BUSH_CELL_JITTER);

            for _ in 0..BUSH_CLUSTER * BUSH_CLUSTER {
                let rng = world.rng_mut();
                if rng.gen_range(0..3) != 0 {
                    continue;
                }
                let x = cx + rng.gen_range(-BUSH_SPREAD..BUSH_SPREAD);
                let z = cz + rng.gen_range(-BUSH_SPREAD..BUSH_SPREAD);
                let height = world.height_at(x, z);
                if height < 0.0 {
                    continue;
                }
                let variant = world.rng_mut().gen_range(0..library.bushes.len());
                let mesh = library.bushes[variant].clone();
                world.spawn(
                    Transform::at(x, height - SINK, z),
                    false,
                    [
                        AnyComponent::Model(Model::new(mesh.clone(), 0.0)),
                        Collision::mesh(mesh).into(),
                        Life::new(BUSH_HEALTH).into(),
                    ],
                );
                planted += 1;
            }
        }
    }
    planted
}
