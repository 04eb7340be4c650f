//! External placement and removal requests

use std::collections::VecDeque;

use glam::IVec2;
use powder_simulation::{MaterialId, Materials};

use super::{Grid, SimStats};

/// A pending edit from the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    Spawn { coord: IVec2, material: MaterialId },
    Despawn { coord: IVec2 },
}

/// FIFO of host requests, applied at the start of the next tick
///
/// Conflicts are not errors: a spawn into an occupied or out-of-bounds
/// cell and a despawn of an empty cell are dropped.
#[derive(Debug, Clone, Default)]
pub struct SpawnGateway {
    pending: VecDeque<Request>,
}

impl SpawnGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_spawn(&mut self, coord: IVec2, material: MaterialId) {
        self.pending.push_back(Request::Spawn { coord, material });
    }

    pub fn request_despawn(&mut self, coord: IVec2) {
        self.pending.push_back(Request::Despawn { coord });
    }

    /// Queue a filled disc of `material` around `center`
    pub fn paint(&mut self, center: IVec2, radius: u32, material: MaterialId) {
        for coord in disc(center, radius) {
            self.request_spawn(coord, material);
        }
    }

    /// Queue removal of every particle in a filled disc
    pub fn erase(&mut self, center: IVec2, radius: u32) {
        for coord in disc(center, radius) {
            self.request_despawn(coord);
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn requests(&self) -> impl Iterator<Item = &Request> {
        self.pending.iter()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Apply every queued request in arrival order. Returns how many took effect.
    pub fn drain_into(
        &mut self,
        grid: &mut Grid,
        materials: &Materials,
        stats: &mut dyn SimStats,
    ) -> usize {
        let mut applied = 0;
        while let Some(request) = self.pending.pop_front() {
            if Self::apply(grid, materials, stats, request) {
                applied += 1;
            }
        }
        applied
    }

    fn apply(
        grid: &mut Grid,
        materials: &Materials,
        stats: &mut dyn SimStats,
        request: Request,
    ) -> bool {
        match request {
            Request::Spawn { coord, material } => {
                let def = match materials.get(material) {
                    Ok(def) => def,
                    Err(err) => {
                        log::warn!("Dropping spawn at {coord}: {err}");
                        return false;
                    }
                };
                match grid.spawn(coord, def) {
                    Ok(_) => {
                        stats.record_spawned();
                        true
                    }
                    Err(err) => {
                        log::trace!("Dropping spawn of {}: {err}", def.name);
                        false
                    }
                }
            }
            Request::Despawn { coord } => {
                if grid.despawn_at(coord).is_some() {
                    stats.record_despawned();
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// Cells within `radius` of `center`, row by row
///
/// Cells past the edge of `i32` are left out rather than wrapped.
fn disc(center: IVec2, radius: u32) -> impl Iterator<Item = IVec2> {
    let r = radius.min(i32::MAX as u32) as i32;
    let r_sq = i64::from(r).pow(2);
    (-r..=r).flat_map(move |dy| {
        (-r..=r)
            .filter(move |dx| i64::from(*dx).pow(2) + i64::from(dy).pow(2) <= r_sq)
            .filter_map(move |dx| {
                Some(IVec2::new(
                    center.x.checked_add(dx)?,
                    center.y.checked_add(dy)?,
                ))
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{GridBounds, NoopStats, TickCounters};

    fn grid() -> Grid {
        Grid::new(GridBounds::new(10, 10)).unwrap()
    }

    #[test]
    fn test_requests_wait_for_drain() {
        let materials = Materials::new();
        let mut grid = grid();
        let mut gateway = SpawnGateway::new();

        gateway.request_spawn(IVec2::new(1, 1), MaterialId::SAND);
        assert_eq!(gateway.pending(), 1);
        assert!(grid.is_empty(IVec2::new(1, 1)));

        let applied = gateway.drain_into(&mut grid, &materials, &mut NoopStats);
        assert_eq!(applied, 1);
        assert_eq!(gateway.pending(), 0);
        assert_eq!(grid.material_at(IVec2::new(1, 1)), Some(MaterialId::SAND));
    }

    #[test]
    fn test_duplicate_spawn_yields_one_particle() {
        let materials = Materials::new();
        let mut grid = grid();
        let mut gateway = SpawnGateway::new();
        let coord = IVec2::new(4, 4);

        gateway.request_spawn(coord, MaterialId::SAND);
        gateway.request_spawn(coord, MaterialId::WATER);
        let mut counters = TickCounters::default();
        gateway.drain_into(&mut grid, &materials, &mut counters);

        assert_eq!(grid.len(), 1);
        assert_eq!(grid.material_at(coord), Some(MaterialId::SAND));
        assert_eq!(counters.spawned, 1);
    }

    #[test]
    fn test_invalid_requests_are_dropped() {
        let materials = Materials::new();
        let mut grid = grid();
        let mut gateway = SpawnGateway::new();

        gateway.request_spawn(IVec2::new(-1, 0), MaterialId::SAND);
        gateway.request_spawn(IVec2::new(0, 0), MaterialId(500));
        gateway.request_despawn(IVec2::new(3, 3));

        assert_eq!(gateway.drain_into(&mut grid, &materials, &mut NoopStats), 0);
        assert!(grid.is_empty_grid());
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_arrival_order() {
        let materials = Materials::new();
        let mut grid = grid();
        let mut gateway = SpawnGateway::new();
        let coord = IVec2::new(2, 2);

        gateway.request_spawn(coord, MaterialId::STONE);
        gateway.request_despawn(coord);
        gateway.request_spawn(coord, MaterialId::WOOD);
        gateway.drain_into(&mut grid, &materials, &mut NoopStats);

        assert_eq!(grid.material_at(coord), Some(MaterialId::WOOD));
    }

    #[test]
    fn test_paint_and_erase_disc() {
        let materials = Materials::new();
        let mut grid = grid();
        let mut gateway = SpawnGateway::new();

        gateway.paint(IVec2::new(5, 5), 1, MaterialId::STONE);
        assert_eq!(gateway.pending(), 5);
        gateway.drain_into(&mut grid, &materials, &mut NoopStats);
        assert_eq!(grid.len(), 5);
        assert!(grid.is_empty(IVec2::new(4, 4)));

        gateway.erase(IVec2::new(5, 5), 0);
        gateway.drain_into(&mut grid, &materials, &mut NoopStats);
        assert_eq!(grid.len(), 4);
        assert!(grid.is_empty(IVec2::new(5, 5)));
    }

    #[test]
    fn test_paint_clips_at_edges() {
        let materials = Materials::new();
        let mut grid = grid();
        let mut gateway = SpawnGateway::new();

        gateway.paint(IVec2::new(0, 0), 2, MaterialId::SAND);
        gateway.drain_into(&mut grid, &materials, &mut NoopStats);

        // Quarter disc of radius 2 inside the grid
        assert_eq!(grid.len(), 6);
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_brush_at_integer_extremes() {
        let materials = Materials::new();
        let mut grid = grid();
        let mut gateway = SpawnGateway::new();

        gateway.paint(IVec2::new(i32::MAX, 0), 1, MaterialId::SAND);
        assert_eq!(gateway.pending(), 4);
        gateway.erase(IVec2::new(i32::MIN, i32::MIN), 1);
        assert_eq!(gateway.pending(), 7);

        assert_eq!(gateway.drain_into(&mut grid, &materials, &mut NoopStats), 0);
        assert!(grid.is_empty_grid());
    }

    #[test]
    fn test_clear_discards_pending() {
        let mut gateway = SpawnGateway::new();
        gateway.paint(IVec2::new(3, 3), 2, MaterialId::SAND);
        gateway.clear();
        assert_eq!(gateway.pending(), 0);
        assert_eq!(gateway.requests().count(), 0);
    }
}
