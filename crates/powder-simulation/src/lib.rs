//! Material data and transition rules for the powder engine
//!
//! This crate provides the foundational data types for material simulation:
//! - Material definitions (MaterialId, MaterialDef, Materials)
//! - Behavior classes and lifetimes (BehaviorClass, Lifetime)
//! - Transition rules (Reaction, AgeTransition, Emission)
//! - Per-material thresholds (MaterialTuning)

mod error;
mod materials;
mod reactions;
mod tuning;

pub use error::MaterialError;
pub use materials::{BehaviorClass, Lifetime, MaterialDef, MaterialId, Materials};
pub use reactions::{AgeTransition, Emission, Outcome, Reaction, ReactsWith};
pub use tuning::{
    AcidTuning, FireTuning, MaterialTuning, SandTuning, SmokeTuning, SteamTuning, WoodTuning,
};
