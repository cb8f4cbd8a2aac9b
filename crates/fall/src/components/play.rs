//! Player avatar: punch timing and the head, hands and cape.

use fall_core::{DrawCommand, Entity, Hand, RenderPass};
use glam::Vec3;

use crate::context::FrameContext;

/// Length of a punch in milliseconds. A new punch waits for both hands.
pub const PUNCH_MS: f64 = 300.0;

const HEAD_OFFSET: Vec3 = Vec3::new(0.0, 4.5, 0.0);
const HEAD_SCALE: f32 = 0.66;

/// Where a hand sits relative to the body, per view mode.
struct HandPose {
    /// Offset at rest, scaled per axis by the hand's direction.
    base: Vec3,
    /// Extra offset at the peak of a punch.
    reach: Vec3,
    scale: f32,
    /// Degrees each hand is turned away from straight ahead.
    spread: f32,
}

const FIRST_PERSON_HANDS: HandPose = HandPose {
    base: Vec3::new(1.2, 4.75, 1.2),
    reach: Vec3::new(1.15, 0.0, 1.15),
    scale: 0.13,
    spread: 22.5,
};

const THIRD_PERSON_HANDS: HandPose = HandPose {
    base: Vec3::new(1.0, 3.0, 1.0),
    reach: Vec3::new(1.75, 0.0, 1.75),
    scale: 0.33,
    spread: 80.0,
};

/// Marks an entity as a player avatar.
#[derive(Clone, Debug)]
pub struct Play {
    left_punch: f64,
    right_punch: f64,
}

impl Default for Play {
    fn default() -> Self {
        Self::new()
    }
}

impl Play {
    /// An avatar that has never punched.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left_punch: f64::NEG_INFINITY,
            right_punch: f64::NEG_INFINITY,
        }
    }

    /// Whether neither hand is mid-punch at `now`.
    #[must_use]
    pub fn can_hit(&self, now: f64) -> bool {
        now - self.left_punch > PUNCH_MS && now - self.right_punch > PUNCH_MS
    }

    /// Starts a punch with `hand` at `now`.
    pub fn punch(&mut self, hand: Hand, now: f64) {
        match hand {
            Hand::Left => self.left_punch = now,
            Hand::Right => self.right_punch = now,
        }
    }

    /// Extension of `hand` at `now`: 0 at rest, rising to 1 halfway through a punch.
    #[must_use]
    pub fn swing(&self, hand: Hand, now: f64) -> f32 {
        let start = match hand {
            Hand::Left => self.left_punch,
            Hand::Right => self.right_punch,
        };
        let elapsed = now - start;
        if elapsed > 0.0 && elapsed < PUNCH_MS {
            let x = (elapsed / PUNCH_MS) as f32;
            1.0 - (2.0 * x - 1.0).powi(2)
        } else {
            0.0
        }
    }

    pub(crate) fn render(&self, owner: &Entity, ctx: &mut FrameContext<'_>) {
        let now = ctx.clock.now_ms;
        let pos = owner.lerped_pos(ctx.clock.tick_delta);
        let yaw = owner.lerped_yaw(ctx.clock.tick_delta) + 180.0;
        let left = self.swing(Hand::Left, now);
        let right = self.swing(Hand::Right, now);

        if ctx.view.first_person && ctx.view.owner == owner.id() {
            // Own hands only, tilted with the view.
            let pitch = ctx.view.pitch;
            for (swing, side) in [(left, 1.0), (right, -1.0)] {
                let draw = Self::hand(ctx, &FIRST_PERSON_HANDS, yaw, swing, side, pos)
                    .rotated(yaw, pitch);
                ctx.sink.submit(draw);
            }
            return;
        }

        let head = DrawCommand::at(ctx.models.head.clone(), pos + HEAD_OFFSET)
            .rotated(-yaw, 0.0)
            .scaled(HEAD_SCALE);
        ctx.sink.submit(head);

        for (swing, side) in [(left, 1.0), (right, -1.0)] {
            let draw = Self::hand(ctx, &THIRD_PERSON_HANDS, yaw, swing, side, pos);
            ctx.sink.submit(draw);
        }

        // The cape swings toward the punching hand.
        let cape_yaw = yaw + (left - right) * 20.0;
        let rad = cape_yaw.to_radians();
        let cape_pos = pos + Vec3::new(-0.15 * rad.cos(), -2.0, -0.15 * rad.sin());
        let cape = DrawCommand::at(ctx.models.cape.clone(), cape_pos)
            .in_pass(RenderPass::Cloth)
            .rotated(cape_yaw, 0.0);
        ctx.sink.submit(cape);
    }

    fn hand(
        ctx: &FrameContext<'_>,
        pose: &HandPose,
        yaw: f32,
        swing: f32,
        side: f32,
        pos: Vec3,
    ) -> DrawCommand {
        let rest = (yaw + 180.0 - pose.spread * side).to_radians();
        let thrust = (yaw + 180.0 + 20.0 * swing * side).to_radians();
        let rest_dir = Vec3::new(rest.cos(), 1.0, rest.sin());
        let thrust_dir = Vec3::new(thrust.cos(), 1.0, thrust.sin());
        let at = pos + pose.base * rest_dir + pose.reach * swing * thrust_dir;
        DrawCommand::at(ctx.models.hand.clone(), at).scaled(pose.scale)
    }
}
