//! Simulation configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `powder.ron` file (if exists)
//! 3. Environment variables prefixed with `POWDER_`
//!
//! Example environment variable: `POWDER_WORLD__SEED=7`

use std::path::Path;

use anyhow::{Context, Result, ensure};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use powder_simulation::MaterialTuning;
use serde::{Deserialize, Serialize};

use crate::world::WorldLayout;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimConfig {
    #[serde(default)]
    pub world: WorldConfig,

    /// What the world contains at creation and after every reset
    #[serde(default)]
    pub layout: WorldLayout,

    /// Per-material probabilities and lifetimes
    #[serde(default)]
    pub materials: MaterialTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    /// Seed of the world RNG; equal seeds and inputs replay identically
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Blank world of the given size with default material tuning
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            world: WorldConfig {
                width,
                height,
                ..Default::default()
            },
            layout: WorldLayout::empty(),
            materials: MaterialTuning::default(),
        }
    }

    /// Load from `powder.ron` in the working directory, then the environment
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?.add_source(
            File::with_name("powder")
                .format(FileFormat::Ron)
                .required(false),
        );
        Self::finish(builder)
    }

    /// Load from an explicit RON file, which must exist
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let builder = Self::defaults()?.add_source(File::from(path).format(FileFormat::Ron));
        Self::finish(builder)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    /// Parse RON text directly, without defaults layering or environment
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text).context("Failed to parse RON configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let defaults = WorldConfig::default();
        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("world.width", i64::from(defaults.width))?
            .set_default("world.height", i64::from(defaults.height))?
            .set_default("world.seed", defaults.seed as i64)?;
        Ok(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder
            // Layer 3: Environment variables (POWDER_WORLD__SEED, etc.)
            .add_source(
                Environment::with_prefix("POWDER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no world can be built from
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.world.width > 0 && self.world.height > 0,
            "World size {}x{} must be non-zero",
            self.world.width,
            self.world.height
        );
        self.materials
            .validate()
            .context("Invalid material tuning")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.world.width, 640);
        assert_eq!(config.world.height, 480);
        assert_eq!(config.layout, WorldLayout::default());
        assert_eq!(config.materials, MaterialTuning::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_with_defaults() {
        // No powder.ron next to the crate, so this is defaults plus environment
        let config = SimConfig::load().expect("Failed to load config");
        assert!(config.world.width > 0);
        assert_eq!(config.layout, WorldLayout::default());
    }

    #[test]
    fn test_from_ron_str_partial() {
        let config = SimConfig::from_ron_str(
            "(world: (width: 32, height: 16, seed: 9), materials: (fire: (lifetime: 12)))",
        )
        .unwrap();
        assert_eq!(config.world.width, 32);
        assert_eq!(config.world.seed, 9);
        assert_eq!(config.materials.fire.lifetime, 12);
        assert_eq!(
            config.materials.fire.spread_chance,
            MaterialTuning::default().fire.spread_chance
        );
        assert_eq!(config.layout, WorldLayout::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SimConfig::empty(0, 5).validate().is_err());

        let mut config = SimConfig::empty(5, 5);
        config.materials.acid.dissolve_chance = -0.5;
        assert!(config.validate().is_err());
        assert!(SimConfig::from_ron_str("(world: (width: 0, height: 4, seed: 1))").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("powder-config-{}.ron", std::process::id()));
        std::fs::write(&path, "(world: (width: 48, height: 24, seed: 5))").unwrap();

        let config = SimConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.world.width, 48);
        assert_eq!(config.world.height, 24);
        assert_eq!(config.layout, WorldLayout::default());
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let path = std::env::temp_dir().join("powder-config-does-not-exist.ron");
        assert!(SimConfig::load_from(path).is_err());
    }
}
