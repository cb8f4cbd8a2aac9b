//! # World Configuration
//!
//! Every radius, cap and rate the world uses. Radii that are compared
//! against squared distances are stored squared, so a config file says
//! `reach = 24.0` but `activation_radius_sq = 18432.0`.
//!
//! ```toml
//! seed = 7
//! chunk_quality = 16
//! activation_radius_sq = 4096.0
//! ```
//!
//! Missing keys keep their defaults.

use std::path::Path;

use serde::Deserialize;

use crate::error::{FallError, FallResult};

/// Tunables of one world.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Entities within this squared planar distance of the player are ticked.
    pub activation_radius_sq: f32,
    /// Entities within this squared planar distance may be rendered.
    pub render_radius_sq: f32,
    /// Inside this squared distance entities skip the view-angle test.
    pub entity_cull_near_sq: f32,
    /// Half-angle of the entity view cone, degrees.
    pub entity_cull_angle: f32,
    /// Chunks within this squared chunk distance may be rendered.
    pub chunk_render_radius_sq: i32,
    /// Inside this squared chunk distance chunks skip the view-angle test.
    pub chunk_cull_near_sq: i32,
    /// Half-angle of the chunk view cone, degrees.
    pub chunk_cull_angle: f32,
    /// Chunks generated on each side of the player's chunk.
    pub chunk_window: i32,
    /// Grid subdivisions per chunk side.
    pub chunk_quality: usize,
    /// Longest ray a raycast reports, in ray-direction units.
    pub reach: f32,
    /// Entities further than this squared planar distance from the eye are not ray-tested.
    pub broad_phase_radius_sq: f32,
    /// Simulation rate.
    pub tick_rate_hz: u32,
    /// Most ticks one frame may run while catching up.
    pub max_ticks_per_frame: u32,
    /// Entities the component pool holds before its first growth.
    pub pool_initial_capacity: usize,
    /// Seed for terrain and gameplay randomness.
    pub seed: u64,
    /// Trees stop snowing while more entities than this were in view.
    pub snow_budget: usize,
    /// Tree grid cells on each side of the origin, 50 units apart.
    pub tree_cells: i32,
    /// Bush cluster cells on each side of the origin, 100 units apart.
    pub bush_cells: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl WorldConfig {
    /// The values the game ships with.
    #[must_use]
    pub const fn production() -> Self {
        Self {
            activation_radius_sq: 18_432.0,
            render_radius_sq: 18_432.0,
            entity_cull_near_sq: 864.0,
            entity_cull_angle: 65.0,
            chunk_render_radius_sq: 81,
            chunk_cull_near_sq: 9,
            chunk_cull_angle: 75.0,
            chunk_window: 12,
            chunk_quality: 8,
            reach: 24.0,
            broad_phase_radius_sq: 676.0, // 26², a little past reach
            tick_rate_hz: 20,
            max_ticks_per_frame: 10,
            pool_initial_capacity: 1024,
            seed: 0x00FA_11ED,
            snow_budget: 800,
            tree_cells: 100,
            bush_cells: 50,
        }
    }

    /// Length of one tick in milliseconds.
    #[inline]
    #[must_use]
    pub fn tick_length_ms(&self) -> f32 {
        1000.0 / self.tick_rate_hz as f32
    }

    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`FallError::InvalidConfig`] naming the first bad field, or
    /// [`FallError::Chunk`] for an unusable chunk quality.
    pub fn validate(&self) -> FallResult<()> {
        let positive = [
            ("activation_radius_sq", self.activation_radius_sq),
            ("render_radius_sq", self.render_radius_sq),
            ("reach", self.reach),
            ("broad_phase_radius_sq", self.broad_phase_radius_sq),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(FallError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("entity_cull_angle", self.entity_cull_angle),
            ("chunk_cull_angle", self.chunk_cull_angle),
        ] {
            if !(0.0..=180.0).contains(&value) {
                return Err(FallError::InvalidConfig(format!(
                    "{name} must be between 0 and 180 degrees, got {value}"
                )));
            }
        }

        if self.entity_cull_near_sq < 0.0 || self.chunk_cull_near_sq < 0 {
            return Err(FallError::InvalidConfig(
                "cull near radii must not be negative".into(),
            ));
        }
        if self.chunk_render_radius_sq <= 0 {
            return Err(FallError::InvalidConfig(format!(
                "chunk_render_radius_sq must be positive, got {}",
                self.chunk_render_radius_sq
            )));
        }
        if self.chunk_window < 0 {
            return Err(FallError::InvalidConfig(format!(
                "chunk_window must not be negative, got {}",
                self.chunk_window
            )));
        }
        if self.tree_cells < 0 || self.bush_cells < 0 {
            return Err(FallError::InvalidConfig(
                "forest cell counts must not be negative".into(),
            ));
        }
        if self.tick_rate_hz == 0 {
            return Err(FallError::InvalidConfig("tick_rate_hz must be at least 1".into()));
        }
        if self.max_ticks_per_frame == 0 {
            return Err(FallError::InvalidConfig(
                "max_ticks_per_frame must be at least 1".into(),
            ));
        }
        if self.pool_initial_capacity == 0 {
            return Err(FallError::InvalidConfig(
                "pool_initial_capacity must be at least 1".into(),
            ));
        }

        let _ = fall_procedural::ChunkGenerator::new(self.chunk_quality)?;
        Ok(())
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`FallError::ConfigParse`] for malformed TOML or unknown keys,
    /// and whatever [`WorldConfig::validate`] rejects.
    pub fn from_toml_str(source: &str) -> FallResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`FallError::ConfigIo`] if the file cannot be read, otherwise
    /// as [`WorldConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> FallResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| FallError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WorldConfig::default();
        assert_eq!(config, WorldConfig::production());
        assert!(config.validate().is_ok());
        assert!((config.tick_length_ms() - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WorldConfig::from_toml_str("seed = 7\nchunk_quality = 16\n").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.chunk_quality, 16);
        assert_eq!(config.chunk_window, 12);
        assert!((config.reach - 24.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            WorldConfig::from_toml_str("tick_rate_hz = 0"),
            Err(FallError::InvalidConfig(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("reach = -1.0"),
            Err(FallError::InvalidConfig(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("bush_cells = -1"),
            Err(FallError::InvalidConfig(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("chunk_quality = 6"),
            Err(FallError::Chunk(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            WorldConfig::from_toml_str("raech = 24.0"),
            Err(FallError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = WorldConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, FallError::ConfigIo { .. }));
        assert!(err.to_string().contains("not/here.toml"));
    }
}
