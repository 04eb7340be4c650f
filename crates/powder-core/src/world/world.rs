//! World: owns the grid and drives the simulation one tick at a time

use glam::IVec2;
use powder_simulation::{MaterialId, Materials};
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

use super::{
    Grid, GridBounds, NoopStats, Particle, ParticleHandle, RuleEngine, SimResult, SimRng,
    SimStats, SpawnGateway, TickCounters, WorldLayout, rng_trait,
};

/// One occupied cell as the host sees it after a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub coord: IVec2,
    pub material: MaterialId,
}

/// The simulation world
///
/// Hosts queue edits with [`World::request_spawn`] and friends, advance
/// with [`World::tick`], and read the result with [`World::snapshot`].
/// Queued edits land at the start of the next tick.
pub struct World {
    grid: Grid,
    materials: Materials,
    layout: WorldLayout,
    gateway: SpawnGateway,
    engine: RuleEngine,
    rng: SimRng,

    /// Ticks run since creation (not reset by [`World::reset`])
    frame: u64,
    last_tick: TickCounters,
}

/// Forwards every record to the per-tick counters and to the host's sink
struct StatsFanout<'a> {
    counters: &'a mut TickCounters,
    host: &'a mut dyn SimStats,
}

impl SimStats for StatsFanout<'_> {
    fn record_particle_moved(&mut self) {
        self.counters.record_particle_moved();
        self.host.record_particle_moved();
    }

    fn record_displacement(&mut self) {
        self.counters.record_displacement();
        self.host.record_displacement();
    }

    fn record_transformation(&mut self) {
        self.counters.record_transformation();
        self.host.record_transformation();
    }

    fn record_reaction(&mut self) {
        self.counters.record_reaction();
        self.host.record_reaction();
    }

    fn record_expired(&mut self) {
        self.counters.record_expired();
        self.host.record_expired();
    }

    fn record_spawned(&mut self) {
        self.counters.record_spawned();
        self.host.record_spawned();
    }

    fn record_despawned(&mut self) {
        self.counters.record_despawned();
        self.host.record_despawned();
    }
}

impl World {
    /// Build the world described by `config`, with the built-in materials
    pub fn new(config: &SimConfig) -> SimResult<Self> {
        config.materials.validate()?;
        Self::with_materials(config, Materials::with_tuning(&config.materials))
    }

    /// Build a world around a caller-supplied material registry
    pub fn with_materials(config: &SimConfig, materials: Materials) -> SimResult<Self> {
        let bounds = GridBounds::new(config.world.width, config.world.height);
        let mut grid = Grid::new(bounds)?;
        config.layout.validate(&materials)?;
        let placed = config.layout.apply(&mut grid, &materials);

        log::info!(
            "Created {}x{} world: {} materials, {} particles from layout, seed {}",
            bounds.width,
            bounds.height,
            materials.len(),
            placed,
            config.world.seed
        );

        Ok(Self {
            grid,
            materials,
            layout: config.layout.clone(),
            gateway: SpawnGateway::new(),
            engine: RuleEngine::new(),
            rng: rng_trait::seeded(config.world.seed),
            frame: 0,
            last_tick: TickCounters::default(),
        })
    }

    pub fn request_spawn(&mut self, coord: IVec2, material: MaterialId) {
        self.gateway.request_spawn(coord, material);
    }

    pub fn request_despawn(&mut self, coord: IVec2) {
        self.gateway.request_despawn(coord);
    }

    /// Queue a filled disc of `material`
    pub fn paint(&mut self, center: IVec2, radius: u32, material: MaterialId) {
        self.gateway.paint(center, radius, material);
    }

    /// Queue removal of everything in a filled disc
    pub fn erase(&mut self, center: IVec2, radius: u32) {
        self.gateway.erase(center, radius);
    }

    /// Drop pending requests, remove every particle and re-apply the layout
    ///
    /// Takes effect immediately. The frame counter and RNG keep running.
    pub fn reset(&mut self) {
        let dropped = self.gateway.pending();
        self.gateway.clear();
        self.grid.clear();
        let placed = self.layout.apply(&mut self.grid, &self.materials);
        self.last_tick = TickCounters::default();

        log::info!(
            "World reset at frame {}: {} particles from layout, {} pending requests dropped",
            self.frame,
            placed,
            dropped
        );
    }

    /// Apply queued requests, then run every particle's rules once
    pub fn tick(&mut self) -> TickCounters {
        self.tick_with_stats(&mut NoopStats)
    }

    /// Like [`World::tick`], also reporting every change to `stats`
    pub fn tick_with_stats(&mut self, stats: &mut dyn SimStats) -> TickCounters {
        self.frame += 1;
        let tick = self.frame;

        let mut counters = TickCounters::default();
        let mut sink = StatsFanout {
            counters: &mut counters,
            host: stats,
        };

        self.gateway
            .drain_into(&mut self.grid, &self.materials, &mut sink);
        self.engine.run_tick(
            &mut self.grid,
            &self.materials,
            &mut self.rng,
            &mut sink,
            tick,
        );

        log::debug!(
            "Tick {tick}: {} particles, moved {}, displaced {}, transformed {}, reactions {}, expired {}, spawned {}, despawned {}",
            self.grid.len(),
            counters.moved,
            counters.displaced,
            counters.transformed,
            counters.reactions,
            counters.expired,
            counters.spawned,
            counters.despawned
        );

        self.last_tick = counters;
        counters
    }

    /// Every live particle as (coordinate, material), in identity order
    pub fn snapshot(&self) -> Vec<CellSnapshot> {
        self.grid
            .iter()
            .map(|(_, particle)| CellSnapshot {
                coord: particle.coord,
                material: particle.material,
            })
            .collect()
    }

    pub fn particles(&self) -> impl Iterator<Item = (ParticleHandle, &Particle)> {
        self.grid.iter()
    }

    pub fn particle(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.grid.particle(handle)
    }

    pub fn particle_at(&self, coord: IVec2) -> Option<&Particle> {
        self.grid.particle_at(coord)
    }

    pub fn material_at(&self, coord: IVec2) -> Option<MaterialId> {
        self.grid.material_at(coord)
    }

    /// Display color of the cell, if occupied
    pub fn color_at(&self, coord: IVec2) -> Option<[u8; 4]> {
        let material = self.material_at(coord)?;
        self.materials.color(material).ok()
    }

    pub fn is_empty(&self, coord: IVec2) -> bool {
        self.grid.is_empty(coord)
    }

    pub fn particle_count(&self) -> usize {
        self.grid.len()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn bounds(&self) -> GridBounds {
        self.grid.bounds()
    }

    pub fn materials(&self) -> &Materials {
        &self.materials
    }

    pub fn layout(&self) -> &WorldLayout {
        &self.layout
    }

    /// Counters from the most recent tick
    pub fn last_tick(&self) -> TickCounters {
        self.last_tick
    }

    pub fn pending_requests(&self) -> usize {
        self.gateway.pending()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Occupancy and particle store agree
    pub fn is_consistent(&self) -> bool {
        self.grid.is_consistent()
    }
}
