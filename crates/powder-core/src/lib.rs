//! Falling-sand simulation core
//!
//! [`world::World`] owns a fixed-size grid of particles and advances it one
//! tick at a time. Material data lives in the `powder-simulation` crate,
//! re-exported here as [`simulation`].

pub mod config;
pub mod world;

pub mod simulation {
    pub use powder_simulation::*;
}

pub use config::SimConfig;
pub use world::{CellSnapshot, World};
