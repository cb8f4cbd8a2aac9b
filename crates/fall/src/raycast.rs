//! # Unified Raycast
//!
//! One aim query answers against entities and terrain with the same
//! triangle test. [`RayQuery`] keeps the nearest hit seen so far; the
//! world feeds it entity candidates first and chunks second, and a later
//! candidate only replaces the current hit when it is strictly nearer.
//! Equal distances therefore keep the entity.

use fall_core::EntityId;
use fall_procedural::ChunkCoord;
use glam::Vec3;

/// What a ray hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HitTarget {
    /// Nothing within reach.
    #[default]
    None,
    /// A collidable entity.
    Entity(EntityId),
    /// A terrain chunk.
    Tile(ChunkCoord),
}

/// Discriminant of [`HitTarget`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitKind {
    /// Nothing within reach.
    None,
    /// An entity.
    Entity,
    /// Terrain.
    Tile,
}

/// Outcome of a raycast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    /// What was hit.
    pub target: HitTarget,
    /// Ray parameter of the hit, in units of the ray direction.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

impl Default for HitResult {
    fn default() -> Self {
        Self::NONE
    }
}

impl HitResult {
    /// A miss.
    pub const NONE: Self = Self {
        target: HitTarget::None,
        distance: 0.0,
        point: Vec3::ZERO,
    };

    /// Kind of the hit target.
    #[must_use]
    pub const fn kind(&self) -> HitKind {
        match self.target {
            HitTarget::None => HitKind::None,
            HitTarget::Entity(_) => HitKind::Entity,
            HitTarget::Tile(_) => HitKind::Tile,
        }
    }

    /// Whether anything was hit.
    #[inline]
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        !matches!(self.target, HitTarget::None)
    }

    /// The hit entity, if the ray stopped at one.
    #[must_use]
    pub const fn entity(&self) -> Option<EntityId> {
        match self.target {
            HitTarget::Entity(id) => Some(id),
            _ => None,
        }
    }

    /// The hit chunk, if the ray stopped at terrain.
    #[must_use]
    pub const fn tile(&self) -> Option<ChunkCoord> {
        match self.target {
            HitTarget::Tile(coord) => Some(coord),
            _ => None,
        }
    }
}

/// Nearest-hit accumulator for one ray.
#[derive(Clone, Copy, Debug)]
pub struct RayQuery {
    origin: Vec3,
    dir: Vec3,
    reach: f32,
    best: HitResult,
}

impl RayQuery {
    /// Starts a query along `dir` from `origin`, accepting hits in `(0, reach]`.
    #[must_use]
    pub const fn new(origin: Vec3, dir: Vec3, reach: f32) -> Self {
        Self {
            origin,
            dir,
            reach,
            best: HitResult::NONE,
        }
    }

    /// Ray origin.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Ray direction.
    #[inline]
    #[must_use]
    pub const fn dir(&self) -> Vec3 {
        self.dir
    }

    /// Records `target` at `t` if it is within reach and strictly nearer
    /// than the current hit. Returns whether it was recorded.
    pub fn offer(&mut self, target: HitTarget, t: Option<f32>) -> bool {
        let Some(t) = t else {
            return false;
        };
        if t <= 0.0 || t > self.reach {
            return false;
        }
        if self.best.is_hit() && t >= self.best.distance {
            return false;
        }
        self.best = HitResult {
            target,
            distance: t,
            point: self.origin + self.dir * t,
        };
        true
    }

    /// The nearest recorded hit.
    #[inline]
    #[must_use]
    pub const fn finish(self) -> HitResult {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_hit_wins() {
        let mut query = RayQuery::new(Vec3::ZERO, Vec3::Z, 24.0);
        let far = EntityId::new(1, 0);
        let near = EntityId::new(2, 0);

        assert!(query.offer(HitTarget::Entity(far), Some(10.0)));
        assert!(query.offer(HitTarget::Entity(near), Some(4.0)));
        assert!(!query.offer(HitTarget::Entity(far), Some(6.0)));

        let hit = query.finish();
        assert_eq!(hit.entity(), Some(near));
        assert_eq!(hit.point, Vec3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn test_reach_bounds() {
        let mut query = RayQuery::new(Vec3::ZERO, Vec3::X, 24.0);
        let tile = HitTarget::Tile(ChunkCoord::new(0, 0));

        assert!(!query.offer(tile, None));
        assert!(!query.offer(tile, Some(0.0)));
        assert!(!query.offer(tile, Some(24.01)));
        assert_eq!(query.finish().kind(), HitKind::None);

        assert!(query.offer(tile, Some(24.0)));
        assert_eq!(query.finish().tile(), Some(ChunkCoord::new(0, 0)));
    }

    #[test]
    fn test_tie_keeps_first_hit() {
        let mut query = RayQuery::new(Vec3::ZERO, Vec3::Z, 24.0);
        let entity = EntityId::new(3, 1);

        assert!(query.offer(HitTarget::Entity(entity), Some(5.0)));
        assert!(!query.offer(HitTarget::Tile(ChunkCoord::new(0, 0)), Some(5.0)));
        assert_eq!(query.finish().kind(), HitKind::Entity);
    }

    #[test]
    fn test_default_is_miss() {
        let hit = HitResult::default();
        assert!(!hit.is_hit());
        assert_eq!(hit.entity(), None);
        assert_eq!(hit.tile(), None);
    }
}
