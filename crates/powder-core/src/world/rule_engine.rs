//! Tick scheduler: visits every live particle exactly once per tick

use powder_simulation::Materials;

use super::behaviors::BehaviorSet;
use super::{ChemistrySystem, Grid, ParticleHandle, RuleContext, SimStats, WorldRng};

/// Runs movement and chemistry over a handle snapshot taken at tick start
///
/// Visiting order is ascending coordinate key. Particles created during
/// the tick wait for the next one; particles destroyed before their turn
/// are skipped.
#[derive(Debug, Default)]
pub struct RuleEngine {
    behaviors: BehaviorSet,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_tick(
        &self,
        grid: &mut Grid,
        materials: &Materials,
        rng: &mut dyn WorldRng,
        stats: &mut dyn SimStats,
        tick: u64,
    ) {
        for handle in grid.tick_order() {
            self.update_particle(grid, materials, rng, stats, handle, tick);
        }
    }

    fn update_particle(
        &self,
        grid: &mut Grid,
        materials: &Materials,
        rng: &mut dyn WorldRng,
        stats: &mut dyn SimStats,
        handle: ParticleHandle,
        tick: u64,
    ) {
        let Some(particle) = grid.particle_mut(handle) else {
            return;
        };

        // No rule runs on the tick a particle expires
        if particle.lifetime.tick() {
            let coord = particle.coord;
            if grid.despawn(handle).is_ok() {
                stats.record_expired();
                log::trace!("Particle at {coord} expired");
            }
            return;
        }

        particle.aux.age = particle.aux.age.saturating_add(1);
        if particle.changed_in(tick) {
            return;
        }

        let class = match materials.get(particle.material) {
            Ok(def) => def.behavior,
            Err(err) => {
                log::error!("Skipping particle at {}: {err}", particle.coord);
                return;
            }
        };

        let mut ctx = RuleContext::new(grid, materials, rng, stats, handle, tick);
        self.behaviors.for_class(class).update(&mut ctx);
        ChemistrySystem::apply(&mut ctx);
    }
}
