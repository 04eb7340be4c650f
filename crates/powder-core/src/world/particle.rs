//! Particle state and handles

use glam::IVec2;
use powder_simulation::{Lifetime, MaterialId};

/// Stable identity of a particle in the [`ParticleStore`](super::ParticleStore)
///
/// The generation changes whenever a slot is freed, so a handle to a
/// destroyed particle never resolves to whatever reuses its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ParticleHandle {
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Per-particle scratch state used by the rules
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AuxState {
    /// Ticks survived since creation or the last transformation
    pub age: u32,
    /// Liquids try to flow left first when set
    pub flow_left: bool,
    /// Tick in which a rule created or transformed this particle (0 = never)
    pub changed_tick: u64,
}

/// A single occupied cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Particle {
    pub material: MaterialId,
    pub coord: IVec2,
    pub lifetime: Lifetime,
    pub aux: AuxState,
}

impl Particle {
    pub fn new(material: MaterialId, coord: IVec2, lifetime: Lifetime) -> Self {
        Self {
            material,
            coord,
            lifetime,
            aux: AuxState::default(),
        }
    }

    /// True if a rule changed this particle during `tick`
    pub fn changed_in(&self, tick: u64) -> bool {
        tick != 0 && self.aux.changed_tick == tick
    }
}
