//! Grid, particles and the per-tick rule engine

pub mod behaviors;
mod bounds;
mod chemistry_system;
mod error;
mod gateway;
mod grid;
mod layout;
mod occupancy;
mod particle;
mod particle_store;
pub mod rng_trait;
pub mod rule_context;
mod rule_engine;
pub mod stats;
#[allow(clippy::module_inception)]
mod world;

pub use behaviors::{Behavior, BehaviorSet};
pub use bounds::GridBounds;
pub use chemistry_system::ChemistrySystem;
pub use error::{SimError, SimResult};
pub use gateway::{Request, SpawnGateway};
pub use grid::Grid;
pub use layout::{LayoutFeature, WorldLayout};
pub use occupancy::OccupancyIndex;
pub use particle::{AuxState, Particle, ParticleHandle};
pub use particle_store::ParticleStore;
pub use rng_trait::{SimRng, WorldRng};
pub use rule_context::RuleContext;
pub use rule_engine::RuleEngine;
pub use stats::{NoopStats, SimStats, TickCounters};
pub use world::{CellSnapshot, World};
