//! Per-material thresholds and lifetimes
//!
//! Every probability a rule checks lives here instead of at the call site,
//! so hosts can retune behavior from configuration.

use serde::{Deserialize, Serialize};

use crate::MaterialError;

/// Tunable constants for the built-in materials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialTuning {
    pub sand: SandTuning,
    pub wood: WoodTuning,
    pub fire: FireTuning,
    pub smoke: SmokeTuning,
    pub steam: SteamTuning,
    pub acid: AcidTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandTuning {
    /// Chance per tick that sand touching fire turns into glass
    pub vitrify_chance: f32,
}

impl Default for SandTuning {
    fn default() -> Self {
        Self {
            vitrify_chance: 0.005,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WoodTuning {
    /// Chance per tick that wood touching fire catches fire itself
    pub ignite_chance: f32,
}

impl Default for WoodTuning {
    fn default() -> Self {
        Self {
            ignite_chance: 0.02,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireTuning {
    /// Ticks before a flame burns out
    pub lifetime: u32,
    /// Chance per tick to ignite a flammable neighbour
    pub spread_chance: f32,
    /// Chance per tick to put smoke in the empty cell above
    pub smoke_chance: f32,
    /// Chance that touching water turns the flame into steam
    pub extinguish_chance: f32,
}

impl Default for FireTuning {
    fn default() -> Self {
        Self {
            lifetime: 40,
            spread_chance: 0.1,
            smoke_chance: 0.05,
            extinguish_chance: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeTuning {
    pub lifetime: u32,
}

impl Default for SmokeTuning {
    fn default() -> Self {
        Self { lifetime: 90 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteamTuning {
    pub lifetime: u32,
    /// Age in ticks before steam may condense
    pub condense_after: u32,
    /// Chance per tick, once old enough, to condense into water
    pub condense_chance: f32,
}

impl Default for SteamTuning {
    fn default() -> Self {
        Self {
            lifetime: 240,
            condense_after: 120,
            condense_chance: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcidTuning {
    /// Chance per tick to dissolve a neighbour (consuming the acid)
    pub dissolve_chance: f32,
}

impl Default for AcidTuning {
    fn default() -> Self {
        Self {
            dissolve_chance: 0.2,
        }
    }
}

impl MaterialTuning {
    /// Reject chances outside [0, 1] and zero lifetimes
    pub fn validate(&self) -> Result<(), MaterialError> {
        let chances = [
            ("sand.vitrify_chance", self.sand.vitrify_chance),
            ("wood.ignite_chance", self.wood.ignite_chance),
            ("fire.spread_chance", self.fire.spread_chance),
            ("fire.smoke_chance", self.fire.smoke_chance),
            ("fire.extinguish_chance", self.fire.extinguish_chance),
            ("steam.condense_chance", self.steam.condense_chance),
            ("acid.dissolve_chance", self.acid.dissolve_chance),
        ];
        for (field, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(MaterialError::InvalidTuning { field, value });
            }
        }

        let lifetimes = [
            ("fire.lifetime", self.fire.lifetime),
            ("smoke.lifetime", self.smoke.lifetime),
            ("steam.lifetime", self.steam.lifetime),
        ];
        for (field, ticks) in lifetimes {
            if ticks == 0 {
                return Err(MaterialError::InvalidTuning {
                    field,
                    value: ticks as f32,
                });
            }
        }

        Ok(())
    }
}
