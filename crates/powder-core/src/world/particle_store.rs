//! Arena that owns every live particle

use glam::IVec2;
use powder_simulation::{Lifetime, MaterialId};

use super::{Particle, ParticleHandle};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    particle: Option<Particle>,
}

/// Particle arena indexed by generational handles
///
/// Iteration follows slot order, which only changes when particles are
/// created or destroyed, never when they move.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        material: MaterialId,
        coord: IVec2,
        lifetime: Lifetime,
    ) -> ParticleHandle {
        let particle = Particle::new(material, coord, lifetime);
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.particle = Some(particle);
            return ParticleHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            particle: Some(particle),
        });
        ParticleHandle {
            index,
            generation: 0,
        }
    }

    /// Remove a particle. Returns None if the handle is stale.
    pub fn destroy(&mut self, handle: ParticleHandle) -> Option<Particle> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let particle = slot.particle.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Some(particle)
    }

    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.particle.as_ref())
    }

    pub(crate) fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.particle.as_mut())
    }

    pub fn contains(&self, handle: ParticleHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live particles in slot order
    pub fn iter(&self) -> impl Iterator<Item = (ParticleHandle, &Particle)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.particle.as_ref().map(|particle| {
                (
                    ParticleHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    particle,
                )
            })
        })
    }

    /// Handles of every particle alive right now
    pub fn snapshot_handles(&self) -> Vec<ParticleHandle> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    /// Destroy everything, invalidating all outstanding handles
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.particle.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.live = 0;
    }
}
