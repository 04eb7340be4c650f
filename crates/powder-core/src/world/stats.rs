//! Simulation statistics collection trait

use serde::Serialize;

/// Trait for collecting simulation statistics
///
/// The rule engine reports every change through this trait so hosts can
/// plug in their own metrics without the core depending on them.
pub trait SimStats {
    /// A particle moved into an empty cell
    fn record_particle_moved(&mut self);

    /// A particle sank through a lighter fluid, swapping with it
    fn record_displacement(&mut self);

    /// A particle turned into another material
    fn record_transformation(&mut self);

    /// A neighbour reaction fired
    fn record_reaction(&mut self);

    /// A particle ran out of lifetime
    fn record_expired(&mut self);

    /// A particle was created, by a request or by a rule
    fn record_spawned(&mut self);

    /// A particle was removed by a request or a rule
    fn record_despawned(&mut self);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_particle_moved(&mut self) {}
    fn record_displacement(&mut self) {}
    fn record_transformation(&mut self) {}
    fn record_reaction(&mut self) {}
    fn record_expired(&mut self) {}
    fn record_spawned(&mut self) {}
    fn record_despawned(&mut self) {}
}

/// Per-tick totals returned by [`World::tick`](super::World::tick)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TickCounters {
    pub moved: u32,
    pub displaced: u32,
    pub transformed: u32,
    pub reactions: u32,
    pub expired: u32,
    pub spawned: u32,
    pub despawned: u32,
}

impl TickCounters {
    /// True when nothing at all happened during the tick
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

impl SimStats for TickCounters {
    fn record_particle_moved(&mut self) {
        self.moved += 1;
    }

    fn record_displacement(&mut self) {
        self.displaced += 1;
    }

    fn record_transformation(&mut self) {
        self.transformed += 1;
    }

    fn record_reaction(&mut self) {
        self.reactions += 1;
    }

    fn record_expired(&mut self) {
        self.expired += 1;
    }

    fn record_spawned(&mut self) {
        self.spawned += 1;
    }

    fn record_despawned(&mut self) {
        self.despawned += 1;
    }
}
