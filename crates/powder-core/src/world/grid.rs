//! Particle store and occupancy index kept in lockstep

use glam::IVec2;
use powder_simulation::{MaterialDef, MaterialId};

use super::{
    AuxState, GridBounds, OccupancyIndex, Particle, ParticleHandle, ParticleStore, SimError,
    SimResult,
};

/// The only place that mutates particles and occupancy together
///
/// Every operation validates before it mutates, so a rejected call leaves
/// both halves untouched.
#[derive(Debug, Clone)]
pub struct Grid {
    bounds: GridBounds,
    store: ParticleStore,
    index: OccupancyIndex,
}

impl Grid {
    pub fn new(bounds: GridBounds) -> SimResult<Self> {
        if bounds.width == 0 || bounds.height == 0 {
            return Err(SimError::InvalidBounds {
                width: bounds.width,
                height: bounds.height,
            });
        }
        Ok(Self {
            bounds,
            store: ParticleStore::new(),
            index: OccupancyIndex::new(bounds),
        })
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn index(&self) -> &OccupancyIndex {
        &self.index
    }

    /// Create a particle of `material` with its default lifetime
    pub fn spawn(&mut self, coord: IVec2, material: &MaterialDef) -> SimResult<ParticleHandle> {
        if !self.bounds.contains(coord) {
            return Err(SimError::OutOfBounds(coord));
        }
        if !self.index.is_empty(coord) {
            return Err(SimError::CellOccupied(coord));
        }

        let handle = self.store.create(material.id, coord, material.lifetime);
        if let Err(err) = self.index.place(coord, handle) {
            self.store.destroy(handle);
            return Err(err);
        }
        Ok(handle)
    }

    /// Destroy a particle and free its cell
    pub fn despawn(&mut self, handle: ParticleHandle) -> SimResult<Particle> {
        let particle = self
            .store
            .destroy(handle)
            .ok_or(SimError::StaleHandle(handle))?;
        self.index.remove(particle.coord);
        Ok(particle)
    }

    /// Destroy whatever occupies `coord`. Empty cells are a no-op.
    pub fn despawn_at(&mut self, coord: IVec2) -> Option<Particle> {
        let handle = self.index.get(coord)?;
        self.despawn(handle).ok()
    }

    /// Move a particle into an empty cell
    pub fn move_particle(&mut self, handle: ParticleHandle, to: IVec2) -> SimResult<()> {
        let from = self.coord_of(handle)?;
        self.index.move_entry(from, to)?;
        if let Some(particle) = self.store.get_mut(handle) {
            particle.coord = to;
        }
        Ok(())
    }

    /// Exchange the cells of two particles
    pub fn swap_particles(&mut self, a: ParticleHandle, b: ParticleHandle) -> SimResult<()> {
        let a_coord = self.coord_of(a)?;
        let b_coord = self.coord_of(b)?;
        self.index.swap(a_coord, b_coord)?;
        if let Some(particle) = self.store.get_mut(a) {
            particle.coord = b_coord;
        }
        if let Some(particle) = self.store.get_mut(b) {
            particle.coord = a_coord;
        }
        Ok(())
    }

    /// Turn a particle into another material in place
    ///
    /// The particle keeps its handle and cell, takes the new material's
    /// default lifetime, and is stamped as changed in `tick`.
    pub fn transform(
        &mut self,
        handle: ParticleHandle,
        material: &MaterialDef,
        tick: u64,
    ) -> SimResult<()> {
        let particle = self
            .store
            .get_mut(handle)
            .ok_or(SimError::StaleHandle(handle))?;
        particle.material = material.id;
        particle.lifetime = material.lifetime;
        particle.aux = AuxState {
            changed_tick: tick,
            ..AuxState::default()
        };
        Ok(())
    }

    fn coord_of(&self, handle: ParticleHandle) -> SimResult<IVec2> {
        self.store
            .get(handle)
            .map(|particle| particle.coord)
            .ok_or(SimError::StaleHandle(handle))
    }

    pub fn particle(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.store.get(handle)
    }

    pub(crate) fn particle_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        self.store.get_mut(handle)
    }

    pub fn handle_at(&self, coord: IVec2) -> Option<ParticleHandle> {
        self.index.get(coord)
    }

    pub fn particle_at(&self, coord: IVec2) -> Option<&Particle> {
        self.handle_at(coord).and_then(|handle| self.store.get(handle))
    }

    pub fn material_at(&self, coord: IVec2) -> Option<MaterialId> {
        self.particle_at(coord).map(|particle| particle.material)
    }

    /// False for occupied and out-of-bounds cells
    pub fn is_empty(&self, coord: IVec2) -> bool {
        self.index.is_empty(coord)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty_grid(&self) -> bool {
        self.store.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParticleHandle, &Particle)> {
        self.store.iter()
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.index.clear();
    }

    /// Live handles in ascending coordinate key order
    pub fn tick_order(&self) -> Vec<ParticleHandle> {
        self.index
            .iter_occupied()
            .map(|(_, handle)| handle)
            .collect()
    }

    /// Occupancy matches the store exactly, in both directions
    pub fn is_consistent(&self) -> bool {
        self.index.occupied_count() == self.store.len()
            && self
                .store
                .iter()
                .all(|(handle, particle)| self.index.get(particle.coord) == Some(handle))
    }
}
