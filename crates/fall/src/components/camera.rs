//! Player camera and walking.

use fall_core::{Entity, EntityId};
use fall_procedural::HeightFn;
use glam::Vec3;

use crate::context::SimContext;

/// Degrees of yaw/pitch per pixel of mouse motion.
pub const MOUSE_SENSITIVITY: f32 = 0.1;

/// Pitch is clamped to this many degrees above and below the horizon.
pub const PITCH_LIMIT: f32 = 89.0;

/// First-person eye height above the feet.
pub const EYE_HEIGHT: f32 = 5.0;

/// Third-person look-at height above the feet.
const TARGET_HEIGHT: f32 = 4.0;

/// Third-person distance behind the target.
const THIRD_PERSON_DISTANCE: f32 = 25.0;

/// Third-person eye never sinks closer than this to the ground.
const GROUND_CLEARANCE: f32 = 0.33;

const GRAVITY: f32 = 0.2;
const HORIZONTAL_DAMPING: f32 = 0.5;

/// Mouse look, walking and gravity for the entity that owns it.
#[derive(Clone, Debug)]
pub struct Camera {
    front: Vec3,
    right: Vec3,
    velocity: Vec3,
}

impl Camera {
    /// A resting camera looking along `yaw`/`pitch`.
    #[must_use]
    pub fn new(yaw: f32, pitch: f32) -> Self {
        let (front, right) = Self::vectors(yaw, pitch);
        Self {
            front,
            right,
            velocity: Vec3::ZERO,
        }
    }

    /// Unit view direction and unit right vector for `yaw`/`pitch` in degrees.
    ///
    /// Yaw 0 looks down +X, yaw 90 down +Z.
    #[must_use]
    pub fn vectors(yaw: f32, pitch: f32) -> (Vec3, Vec3) {
        let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
        let front = Vec3::new(pitch.cos() * yaw.cos(), pitch.sin(), pitch.cos() * yaw.sin())
            .normalize_or_zero();
        let right = front.cross(Vec3::Y).normalize_or_zero();
        (front, right)
    }

    /// View direction as of the last tick.
    #[inline]
    #[must_use]
    pub const fn front(&self) -> Vec3 {
        self.front
    }

    /// Right vector as of the last tick.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> Vec3 {
        self.right
    }

    /// Current velocity per tick.
    #[inline]
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub(crate) fn update(&mut self, owner: &mut Entity, ctx: &mut SimContext<'_>) {
        owner.set_prev();

        let input = ctx.input;
        if input.cursor_grabbed {
            owner.current.yaw += input.mouse_dx * MOUSE_SENSITIVITY;
            owner.current.pitch = (owner.current.pitch - input.mouse_dy * MOUSE_SENSITIVITY)
                .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        (self.front, self.right) = Self::vectors(owner.current.yaw, owner.current.pitch);

        let (forward, rightward) = input.movement();
        let flat_front = Vec3::new(self.front.x, 0.0, self.front.z).normalize_or_zero();
        self.velocity += flat_front * forward + self.right * rightward;
        self.velocity.y -= GRAVITY;

        let ground = ctx.height_at(owner.current.x, owner.current.z);
        let mut pos = owner.pos() + self.velocity;
        if pos.y < ground {
            pos.y = ground;
            self.velocity.y = 0.0;
        }
        self.velocity.x *= HORIZONTAL_DAMPING;
        self.velocity.z *= HORIZONTAL_DAMPING;
        owner.set_pos(pos);
    }
}

/// Where a frame is seen from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    /// Entity whose eyes these are.
    pub owner: EntityId,
    /// Eye position.
    pub eye: Vec3,
    /// Unit view direction.
    pub front: Vec3,
    /// Unit right vector.
    pub right: Vec3,
    /// Interpolated pitch in degrees.
    pub pitch: f32,
    /// First person, or third person behind the owner.
    pub first_person: bool,
}

impl View {
    /// The view of `owner` at `tick_delta`.
    #[must_use]
    pub fn of(owner: &Entity, tick_delta: f32, first_person: bool, terrain: &dyn HeightFn) -> Self {
        let lerped = owner.lerped(tick_delta);
        let (front, right) = Camera::vectors(lerped.yaw, lerped.pitch);
        let eye = if first_person {
            Self::first_person_eye(owner, tick_delta)
        } else {
            let target = lerped.position() + Vec3::Y * TARGET_HEIGHT;
            let mut eye = target - front * THIRD_PERSON_DISTANCE;
            let ground = fall_procedural::height_at(terrain, eye.x, eye.z) + GROUND_CLEARANCE;
            eye.y = eye.y.max(ground);
            eye
        };
        Self {
            owner: owner.id(),
            eye,
            front,
            right,
            pitch: lerped.pitch,
            first_person,
        }
    }

    /// First-person eye position of `owner`, which is also where aiming starts.
    #[inline]
    #[must_use]
    pub fn first_person_eye(owner: &Entity, tick_delta: f32) -> Vec3 {
        owner.lerped_pos(tick_delta) + Vec3::Y * EYE_HEIGHT
    }
}
