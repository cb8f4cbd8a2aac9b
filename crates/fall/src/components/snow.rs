//! Falling snow flakes.

use fall_core::{DrawCommand, Entity};
use glam::Vec3;
use rand::Rng;

use crate::context::{FrameContext, SimContext};

/// Number of flake meshes in the model library.
pub const SNOW_MODELS: usize = 2;

/// A flake lies on the ground this long, shrinking, before it is removed.
const MELT_MS: f64 = 1000.0;

const SINK_PER_TICK: f32 = 0.1;

/// A flake drifting down until it lands, then melting away.
#[derive(Clone, Debug)]
pub struct Snow {
    dir: Vec3,
    spin: f32,
    phase: f64,
    model: usize,
    landed_at: Option<f64>,
}

impl Snow {
    /// A flake with a random drift, spin direction and flake mesh.
    #[must_use]
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            dir: Vec3::new(
                rng.gen_range(-0.7..0.7),
                rng.gen_range(-0.6..-0.2),
                rng.gen_range(-0.7..0.7),
            ),
            spin: if rng.gen_bool(0.5) { -1.0 } else { 1.0 },
            phase: f64::from(rng.gen_range(0..360_u32)),
            model: rng.gen_range(0..SNOW_MODELS),
            landed_at: None,
        }
    }

    /// When the flake touched the ground.
    #[inline]
    #[must_use]
    pub const fn landed_at(&self) -> Option<f64> {
        self.landed_at
    }

    /// Draw scale at `now`: 1 in the air, shrinking to 0 over the melt time.
    #[must_use]
    pub fn scale(&self, now: f64) -> f32 {
        self.landed_at
            .map_or(1.0, |landed| (1.0 - (now - landed) / MELT_MS).clamp(0.0, 1.0) as f32)
    }

    pub(crate) fn update(&mut self, owner: &mut Entity, ctx: &mut SimContext<'_>) {
        owner.set_prev();
        let now = ctx.now();

        if owner.current.y > ctx.height_at(owner.current.x, owner.current.z) - 0.5 {
            let x = (((now + self.phase) / 3.0) % 360.0).to_radians() as f32;
            owner.current.x += self.dir.x * ((x * 0.5).sin() / 4.0 + 1.5);
            owner.current.y +=
                self.dir.y * ((x * 1.6).sin() * (x * 1.3).sin() * (x * 0.7).sin()) - SINK_PER_TICK;
            owner.current.z += self.dir.z * ((x * 0.5).cos() / 4.0 + 1.5);
        } else if self.landed_at.is_none() {
            self.landed_at = Some(now);
        }

        if self.landed_at.is_some_and(|landed| now - landed > MELT_MS) {
            owner.removed = true;
        }
    }

    pub(crate) fn render(&self, owner: &Entity, ctx: &mut FrameContext<'_>) {
        let now = ctx.clock.now_ms;
        let spin = ((now / 2.0) % 360.0) as f32 * self.spin;
        let draw = DrawCommand::at(
            ctx.models.snow[self.model].clone(),
            owner.lerped_pos(ctx.clock.tick_delta),
        )
        .rotated(spin, spin * 0.5)
        .scaled(self.scale(now));
        ctx.sink.submit(draw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::AnyComponent;
    use crate::context::testbed::TestBed;
    use fall_core::Transform;

    #[test]
    fn test_drifts_down_then_melts() {
        let mut bed = TestBed::flat(0.0);
        let snow = Snow::new(&mut bed.rng);
        let mut flake = bed.place(Transform::at(0.0, 3.0, 0.0), [AnyComponent::Snow(snow)]);

        let mut ticks = 0;
        while bed.pool.component::<Snow>(flake.index()).unwrap().landed_at().is_none() {
            let before = flake.current.y;
            bed.clock.now_ms += 50.0;
            bed.update(&mut flake);
            assert!((flake.prev.y - before).abs() < f32::EPSILON);
            ticks += 1;
            assert!(ticks < 1000, "flake never landed");
        }
        assert!(flake.current.y <= -0.5 + 1e-4);
        let landed = bed.clock.now_ms;

        bed.clock.now_ms = landed + 1000.0;
        bed.update(&mut flake);
        assert!(!flake.removed);
        let half = bed.pool.component::<Snow>(flake.index()).unwrap().scale(landed + 500.0);
        assert!((half - 0.5).abs() < 1e-6);

        bed.clock.now_ms = landed + 1000.5;
        bed.update(&mut flake);
        assert!(flake.removed);
    }

    #[test]
    fn test_airborne_scale_is_one() {
        let mut bed = TestBed::flat(0.0);
        let snow = Snow::new(&mut bed.rng);
        assert!((snow.scale(1e9) - 1.0).abs() < f32::EPSILON);
    }
}
