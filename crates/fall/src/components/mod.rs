//! # Game Components
//!
//! Every component the game knows is a variant of [`AnyComponent`], stored
//! in the pool slot of its kind. Hooks are plain methods on each variant's
//! type; `AnyComponent` only routes to them.
//!
//! Capabilities that only some kinds have are exposed as optional views:
//! [`AnyComponent::collidable`] and [`AnyComponent::mesh_supplier`].

mod camera;
mod collision;
mod drop;
mod inventory;
mod item_drop;
mod life;
mod model;
mod play;
mod snow;
mod tree;

pub use camera::{Camera, View};
pub use collision::Collision;
pub use drop::DropTable;
pub use inventory::Inventory;
pub use item_drop::ItemDrop;
pub use life::Life;
pub use model::Model;
pub use play::Play;
pub use snow::{Snow, SNOW_MODELS};
pub use tree::Tree;

use fall_core::{Collidable, Component, ComponentKind, Entity, Interaction, MeshSupplier, Variant};

use crate::context::{FrameContext, SimContext};

/// A component of any kind.
#[derive(Clone, Debug)]
pub enum AnyComponent {
    /// See [`Camera`].
    Camera(Camera),
    /// See [`Collision`].
    Collision(Collision),
    /// See [`Model`].
    Model(Model),
    /// See [`Play`].
    Play(Play),
    /// See [`Snow`].
    Snow(Snow),
    /// See [`Tree`].
    Tree(Tree),
    /// See [`DropTable`].
    Drop(DropTable),
    /// See [`ItemDrop`].
    ItemDrop(ItemDrop),
    /// See [`Inventory`].
    Inventory(Inventory),
    /// See [`Life`].
    Life(Life),
}

impl AnyComponent {
    /// The component as something a ray can hit.
    #[must_use]
    pub fn collidable(&self) -> Option<&dyn Collidable> {
        match self {
            Self::Collision(collision) => Some(collision),
            _ => None,
        }
    }

    /// The component's live mesh, if it has one.
    #[must_use]
    pub fn mesh_supplier(&self) -> Option<&dyn MeshSupplier> {
        match self {
            Self::Model(model) => Some(model),
            Self::Collision(collision) => collision.mesh_supplier(),
            _ => None,
        }
    }
}

impl Component for AnyComponent {
    type Tick<'t> = SimContext<'t>;
    type Frame<'f> = FrameContext<'f>;

    fn kind(&self) -> ComponentKind {
        match self {
            Self::Camera(_) => ComponentKind::Camera,
            Self::Collision(_) => ComponentKind::Collision,
            Self::Model(_) => ComponentKind::Model,
            Self::Play(_) => ComponentKind::Play,
            Self::Snow(_) => ComponentKind::Snow,
            Self::Tree(_) => ComponentKind::Tree,
            Self::Drop(_) => ComponentKind::Drop,
            Self::ItemDrop(_) => ComponentKind::ItemDrop,
            Self::Inventory(_) => ComponentKind::Inventory,
            Self::Life(_) => ComponentKind::Life,
        }
    }

    fn update(&mut self, owner: &mut Entity, ctx: &mut SimContext<'_>) {
        match self {
            Self::Camera(camera) => camera.update(owner, ctx),
            Self::Snow(snow) => snow.update(owner, ctx),
            Self::Tree(tree) => tree.update(owner, ctx),
            Self::ItemDrop(drop) => drop.update(owner, ctx),
            _ => {}
        }
    }

    fn render(&self, owner: &Entity, ctx: &mut FrameContext<'_>) {
        match self {
            Self::Model(model) => model.render(owner, ctx),
            Self::Play(play) => play.render(owner, ctx),
            Self::Snow(snow) => snow.render(owner, ctx),
            _ => {}
        }
    }

    fn interact(&mut self, owner: &mut Entity, interaction: &Interaction, ctx: &mut SimContext<'_>) {
        match self {
            Self::ItemDrop(drop) => drop.interact(owner, interaction, ctx),
            Self::Life(life) => life.interact(owner, interaction),
            _ => {}
        }
    }

    fn die(&mut self, owner: &mut Entity, ctx: &mut SimContext<'_>) {
        if let Self::Drop(table) = self {
            table.die(owner, ctx);
        }
    }
}

macro_rules! variant {
    ($ty:ident => $kind:ident) => {
        impl Variant<AnyComponent> for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;

            fn peek(component: &AnyComponent) -> Option<&Self> {
                match component {
                    AnyComponent::$kind(inner) => Some(inner),
                    _ => None,
                }
            }

            fn peek_mut(component: &mut AnyComponent) -> Option<&mut Self> {
                match component {
                    AnyComponent::$kind(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for AnyComponent {
            fn from(component: $ty) -> Self {
                Self::$kind(component)
            }
        }
    };
}

variant!(Camera => Camera);
variant!(Collision => Collision);
variant!(Model => Model);
variant!(Play => Play);
variant!(Snow => Snow);
variant!(Tree => Tree);
variant!(DropTable => Drop);
variant!(ItemDrop => ItemDrop);
variant!(Inventory => Inventory);
variant!(Life => Life);
