//! # Fixed-Rate Game Loop
//!
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. ADVANCE                                                          │
//! │    └─ Add the frame's wall time to the tick accumulator             │
//! │                                                                     │
//! │ 2. CATCH UP (0..=max_ticks_per_frame ticks)                         │
//! │    ├─ World tick: activate, merge adds, reclaim, stream chunks      │
//! │    └─ Player actions: raycast, punch, pick up                       │
//! │                                                                     │
//! │ 3. RENDER                                                           │
//! │    ├─ tick_delta = accumulator / tick length                        │
//! │    └─ Chunks and entities drawn at interpolated positions           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lag beyond the per-frame cap is dropped, never queued, so a stall
//! cannot snowball into ever longer catch-up frames.

use std::time::Duration;

use tracing::{info, warn};

use crate::config::WorldConfig;
use crate::context::Clock;

/// Converts wall time into whole simulation ticks.
#[derive(Clone, Debug)]
pub struct FixedTicker {
    /// Milliseconds per tick.
    tick_ms: f64,
    /// Most ticks one frame may run.
    max_ticks: u32,
    /// Wall time not yet consumed by a tick.
    accumulator: f64,
    /// Simulated time at the last tick.
    sim_ms: f64,
    /// Ticks run so far.
    ticks: u64,
    /// Ticks dropped by the last `advance`.
    last_dropped: u32,
    /// Ticks dropped since creation.
    total_dropped: u64,
}

impl FixedTicker {
    /// Creates a ticker running at `tick_rate_hz`.
    ///
    /// # Panics
    ///
    /// Panics if either argument is zero.
    #[must_use]
    pub fn new(tick_rate_hz: u32, max_ticks: u32) -> Self {
        assert!(tick_rate_hz > 0, "tick rate must be at least 1 Hz");
        assert!(max_ticks > 0, "a frame must be allowed at least one tick");
        Self {
            tick_ms: 1000.0 / f64::from(tick_rate_hz),
            max_ticks,
            accumulator: 0.0,
            sim_ms: 0.0,
            ticks: 0,
            last_dropped: 0,
            total_dropped: 0,
        }
    }

    /// Creates a ticker from a validated config.
    #[must_use]
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.tick_rate_hz, config.max_ticks_per_frame)
    }

    /// Adds `elapsed` wall time and returns how many ticks to run now.
    ///
    /// At most `max_ticks` are returned. Anything beyond that is dropped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed.as_nanos() as f64 / 1_000_000.0;

        let due = (self.accumulator / self.tick_ms).floor();
        let cap = f64::from(self.max_ticks);
        if due > cap {
            let dropped = due - cap;
            self.accumulator -= dropped * self.tick_ms;
            self.sim_ms += dropped * self.tick_ms;
            self.last_dropped = dropped as u32;
            self.total_dropped += u64::from(self.last_dropped);
            warn!(
                dropped = self.last_dropped,
                total_dropped = self.total_dropped,
                "frame fell behind, dropping ticks"
            );
            self.max_ticks
        } else {
            self.last_dropped = 0;
            due as u32
        }
    }

    /// Consumes one tick of accumulated time and returns the tick's clock.
    pub fn tick(&mut self) -> Clock {
        self.accumulator = (self.accumulator - self.tick_ms).max(0.0);
        self.sim_ms += self.tick_ms;
        self.ticks += 1;
        Clock {
            now_ms: self.sim_ms,
            tick_delta: self.tick_delta(),
            ticks: self.ticks,
        }
    }

    /// The clock rendering should use: wall time, with the fraction of the
    /// next tick already elapsed.
    #[must_use]
    pub fn frame_clock(&self) -> Clock {
        Clock {
            now_ms: self.sim_ms + self.accumulator,
            tick_delta: self.tick_delta(),
            ticks: self.ticks,
        }
    }

    /// Fraction of the next tick already elapsed, in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn tick_delta(&self) -> f32 {
        (self.accumulator / self.tick_ms).clamp(0.0, 1.0) as f32
    }

    /// Ticks run so far.
    #[inline]
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks the last `advance` dropped.
    #[inline]
    #[must_use]
    pub const fn last_dropped(&self) -> u32 {
        self.last_dropped
    }
}

/// What one frame did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Ticks run this frame.
    pub ticks_run: u32,
    /// Ticks dropped by the catch-up cap.
    pub ticks_dropped: u32,
    /// Entities updated across this frame's ticks.
    pub activated: usize,
    /// Entities rendered.
    pub entities_rendered: usize,
    /// Chunks rendered.
    pub chunks_rendered: usize,
    /// Simulation time in microseconds.
    pub tick_us: u64,
    /// Render time in microseconds.
    pub render_us: u64,
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Ticks run across all frames.
    pub ticks_run: u64,
    /// Ticks dropped across all frames.
    pub ticks_dropped: u64,
    /// Frames that hit the catch-up cap.
    pub frames_capped: u64,
    /// Sum of simulation times.
    pub tick_us_sum: u64,
    /// Sum of render times.
    pub render_us_sum: u64,
    /// Most entities rendered in one frame.
    pub peak_entities_rendered: usize,
}

impl FrameStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames_recorded: 0,
            ticks_run: 0,
            ticks_dropped: 0,
            frames_capped: 0,
            tick_us_sum: 0,
            render_us_sum: 0,
            peak_entities_rendered: 0,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.ticks_run += u64::from(stats.ticks_run);
        self.ticks_dropped += u64::from(stats.ticks_dropped);
        self.tick_us_sum += stats.tick_us;
        self.render_us_sum += stats.render_us;
        self.peak_entities_rendered = self.peak_entities_rendered.max(stats.entities_rendered);

        if stats.ticks_dropped > 0 {
            self.frames_capped += 1;
        }
    }

    /// Average ticks per frame.
    #[must_use]
    pub fn avg_ticks_per_frame(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.ticks_run as f64 / self.frames_recorded as f64
    }

    /// Average simulation plus render time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        ((self.tick_us_sum + self.render_us_sum) as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Logs a summary of the statistics.
    pub fn log_summary(&self) {
        info!(
            frames = self.frames_recorded,
            ticks = self.ticks_run,
            ticks_per_frame = self.avg_ticks_per_frame(),
            dropped = self.ticks_dropped,
            capped_frames = self.frames_capped,
            avg_frame_ms = self.avg_frame_ms(),
            peak_entities = self.peak_entities_rendered,
            "frame statistics"
        );
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_ticks_only() {
        let mut ticker = FixedTicker::new(20, 10);
        assert_eq!(ticker.advance(Duration::from_millis(49)), 0);
        assert_eq!(ticker.advance(Duration::from_millis(1)), 1);
        ticker.tick();
        assert_eq!(ticker.advance(Duration::from_millis(125)), 2);
    }

    #[test]
    fn test_tick_delta_is_remainder() {
        let mut ticker = FixedTicker::new(20, 10);
        let due = ticker.advance(Duration::from_millis(75));
        for _ in 0..due {
            ticker.tick();
        }
        assert!((ticker.tick_delta() - 0.5).abs() < 1e-4);
        assert!((ticker.frame_clock().now_ms - 75.0).abs() < 1e-6);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut ticker = FixedTicker::new(20, 10);
        let due = ticker.advance(Duration::from_secs(2));
        assert_eq!(due, 10);
        assert_eq!(ticker.last_dropped(), 30);
        for _ in 0..due {
            ticker.tick();
        }
        assert_eq!(ticker.ticks(), 10);
        // Excess lag is gone rather than queued.
        assert_eq!(ticker.advance(Duration::ZERO), 0);
        assert!((ticker.frame_clock().now_ms - 2000.0).abs() < 1e-6);
    }

    #[test]
    fn test_accumulator_stats() {
        let mut acc = FrameStatsAccumulator::new();
        acc.record(FrameStats {
            ticks_run: 2,
            tick_us: 1000,
            render_us: 1000,
            entities_rendered: 5,
            ..FrameStats::default()
        });
        acc.record(FrameStats {
            ticks_run: 10,
            ticks_dropped: 4,
            entities_rendered: 3,
            ..FrameStats::default()
        });
        assert!((acc.avg_ticks_per_frame() - 6.0).abs() < f64::EPSILON);
        assert!((acc.avg_frame_ms() - 1.0).abs() < f64::EPSILON);
        assert_eq!(acc.frames_capped, 1);
        assert_eq!(acc.peak_entities_rendered, 5);
    }
}
