//! Coordinate -> particle lookup enforcing one particle per cell

use glam::IVec2;

use super::{GridBounds, ParticleHandle, SimError, SimResult};

/// Dense index from packed coordinate key to particle handle
///
/// The index never touches particle state; [`Grid`](super::Grid) keeps it
/// in step with the [`ParticleStore`](super::ParticleStore).
#[derive(Debug, Clone)]
pub struct OccupancyIndex {
    bounds: GridBounds,
    cells: Vec<Option<ParticleHandle>>,
    occupied: usize,
}

impl OccupancyIndex {
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            cells: vec![None; bounds.area()],
            occupied: 0,
        }
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    fn key(&self, coord: IVec2) -> SimResult<usize> {
        self.bounds.key(coord).ok_or(SimError::OutOfBounds(coord))
    }

    /// Out-of-bounds cells count as blocked, never empty
    pub fn is_empty(&self, coord: IVec2) -> bool {
        match self.bounds.key(coord) {
            Some(key) => self.cells[key].is_none(),
            None => false,
        }
    }

    pub fn get(&self, coord: IVec2) -> Option<ParticleHandle> {
        self.bounds.key(coord).and_then(|key| self.cells[key])
    }

    pub fn place(&mut self, coord: IVec2, handle: ParticleHandle) -> SimResult<()> {
        let key = self.key(coord)?;
        if self.cells[key].is_some() {
            return Err(SimError::CellOccupied(coord));
        }
        self.cells[key] = Some(handle);
        self.occupied += 1;
        Ok(())
    }

    /// Clear a cell, returning what was there. Empty or out-of-bounds is a no-op.
    pub fn remove(&mut self, coord: IVec2) -> Option<ParticleHandle> {
        let key = self.bounds.key(coord)?;
        let removed = self.cells[key].take();
        if removed.is_some() {
            self.occupied -= 1;
        }
        removed
    }

    /// Move the entry at `from` to `to`. On error nothing changes.
    pub fn move_entry(&mut self, from: IVec2, to: IVec2) -> SimResult<()> {
        let from_key = self.key(from)?;
        let to_key = self.key(to)?;
        if self.cells[to_key].is_some() {
            return Err(SimError::CellOccupied(to));
        }
        let handle = self.cells[from_key]
            .take()
            .ok_or(SimError::EmptyCell(from))?;
        self.cells[to_key] = Some(handle);
        Ok(())
    }

    /// Exchange the entries of two occupied cells
    pub fn swap(&mut self, a: IVec2, b: IVec2) -> SimResult<()> {
        let a_key = self.key(a)?;
        let b_key = self.key(b)?;
        if self.cells[a_key].is_none() {
            return Err(SimError::EmptyCell(a));
        }
        if self.cells[b_key].is_none() {
            return Err(SimError::EmptyCell(b));
        }
        self.cells.swap(a_key, b_key);
        Ok(())
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    pub fn iter_occupied(&self) -> impl Iterator<Item = (IVec2, ParticleHandle)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(key, cell)| {
            let handle = (*cell)?;
            self.bounds.coord(key).map(|coord| (coord, handle))
        })
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
        self.occupied = 0;
    }
}
