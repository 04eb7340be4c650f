//! Per-particle view handed to behaviors and chemistry

use glam::IVec2;
use powder_simulation::{BehaviorClass, MaterialDef, MaterialId, Materials};

use super::{Grid, Particle, ParticleHandle, SimStats, WorldRng};

pub const UP: IVec2 = IVec2::new(0, 1);
pub const DOWN: IVec2 = IVec2::new(0, -1);
pub const LEFT: IVec2 = IVec2::new(-1, 0);
pub const RIGHT: IVec2 = IVec2::new(1, 0);
pub const DOWN_LEFT: IVec2 = IVec2::new(-1, -1);
pub const DOWN_RIGHT: IVec2 = IVec2::new(1, -1);
pub const UP_LEFT: IVec2 = IVec2::new(-1, 1);
pub const UP_RIGHT: IVec2 = IVec2::new(1, 1);

/// Orthogonal neighbours in reaction order
pub const ORTHOGONAL: [IVec2; 4] = [UP, RIGHT, DOWN, LEFT];

/// Everything a rule may touch while updating one particle
///
/// All writes go through the [`Grid`], so occupancy stays consistent no
/// matter which rule runs. Every change is reported to the stats sink.
pub struct RuleContext<'a> {
    grid: &'a mut Grid,
    materials: &'a Materials,
    rng: &'a mut dyn WorldRng,
    stats: &'a mut dyn SimStats,
    handle: ParticleHandle,
    tick: u64,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        grid: &'a mut Grid,
        materials: &'a Materials,
        rng: &'a mut dyn WorldRng,
        stats: &'a mut dyn SimStats,
        handle: ParticleHandle,
        tick: u64,
    ) -> Self {
        Self {
            grid,
            materials,
            rng,
            stats,
            handle,
            tick,
        }
    }

    pub fn handle(&self) -> ParticleHandle {
        self.handle
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_alive(&self) -> bool {
        self.grid.particle(self.handle).is_some()
    }

    pub fn particle(&self) -> Option<&Particle> {
        self.grid.particle(self.handle)
    }

    pub fn coord(&self) -> Option<IVec2> {
        self.particle().map(|particle| particle.coord)
    }

    fn lookup(&self, id: MaterialId) -> Option<&'a MaterialDef> {
        let materials: &'a Materials = self.materials;
        match materials.get(id) {
            Ok(def) => Some(def),
            Err(err) => {
                log::error!("Particle references unregistered material: {err}");
                None
            }
        }
    }

    /// Definition of the acting particle's current material
    pub fn material(&self) -> Option<&'a MaterialDef> {
        let id = self.particle()?.material;
        self.lookup(id)
    }

    /// Definition of whatever occupies `coord`
    pub fn material_of(&self, coord: IVec2) -> Option<&'a MaterialDef> {
        let id = self.grid.material_at(coord)?;
        self.lookup(id)
    }

    pub fn handle_at(&self, coord: IVec2) -> Option<ParticleHandle> {
        self.grid.handle_at(coord)
    }

    pub fn is_empty(&self, coord: IVec2) -> bool {
        self.grid.is_empty(coord)
    }

    /// True if a rule already created or transformed the particle at `coord` this tick
    pub fn is_inert(&self, coord: IVec2) -> bool {
        self.grid
            .particle_at(coord)
            .is_some_and(|particle| particle.changed_in(self.tick))
    }

    pub fn chance(&mut self, probability: f32) -> bool {
        self.rng.check_probability(probability)
    }

    /// Move into the empty cell at `offset`
    pub fn try_move(&mut self, offset: IVec2) -> bool {
        let Some(from) = self.coord() else {
            return false;
        };
        if self.grid.move_particle(self.handle, from + offset).is_err() {
            return false;
        }
        self.stats.record_particle_moved();
        true
    }

    /// Move into the cell at `offset`, sinking through a lighter fluid if needed
    ///
    /// Only granular and liquid particles displace, only downward or
    /// diagonally downward, and only into liquid or gas of strictly lower
    /// density.
    pub fn try_move_or_displace(&mut self, offset: IVec2) -> bool {
        if self.try_move(offset) {
            return true;
        }
        if offset.y >= 0 {
            return false;
        }

        let (Some(coord), Some(mover)) = (self.coord(), self.material()) else {
            return false;
        };
        if !matches!(
            mover.behavior,
            BehaviorClass::SolidGranular | BehaviorClass::Liquid
        ) {
            return false;
        }

        let target = coord + offset;
        let (Some(other), Some(other_def)) = (self.handle_at(target), self.material_of(target))
        else {
            return false;
        };
        if !matches!(other_def.behavior, BehaviorClass::Liquid | BehaviorClass::Gas)
            || other_def.density >= mover.density
        {
            return false;
        }

        if self.grid.swap_particles(self.handle, other).is_err() {
            return false;
        }
        self.stats.record_displacement();
        true
    }

    /// Try each offset in order, stopping at the first that succeeds
    pub fn try_first(&mut self, offsets: &[IVec2], displace: bool) -> Option<IVec2> {
        offsets.iter().copied().find(|offset| {
            if displace {
                self.try_move_or_displace(*offset)
            } else {
                self.try_move(*offset)
            }
        })
    }

    pub fn flow_left(&self) -> bool {
        self.particle().is_some_and(|particle| particle.aux.flow_left)
    }

    pub fn set_flow_left(&mut self, flow_left: bool) {
        if let Some(particle) = self.grid.particle_mut(self.handle) {
            particle.aux.flow_left = flow_left;
        }
    }

    /// Turn any particle into `into`, marking it inert for this tick
    pub fn transform(&mut self, handle: ParticleHandle, into: MaterialId) -> bool {
        let Some(def) = self.lookup(into) else {
            return false;
        };
        if self.grid.transform(handle, def, self.tick).is_err() {
            return false;
        }
        self.stats.record_transformation();
        true
    }

    pub fn transform_self(&mut self, into: MaterialId) -> bool {
        self.transform(self.handle, into)
    }

    pub fn destroy(&mut self, handle: ParticleHandle) -> bool {
        if self.grid.despawn(handle).is_err() {
            return false;
        }
        self.stats.record_despawned();
        true
    }

    pub fn destroy_self(&mut self) -> bool {
        self.destroy(self.handle)
    }

    /// Create a particle from a rule. It sits out the rest of the tick.
    pub fn spawn(&mut self, coord: IVec2, material: MaterialId) -> bool {
        let Some(def) = self.lookup(material) else {
            return false;
        };
        let Ok(handle) = self.grid.spawn(coord, def) else {
            return false;
        };
        if let Some(particle) = self.grid.particle_mut(handle) {
            particle.aux.changed_tick = self.tick;
        }
        self.stats.record_spawned();
        true
    }

    pub fn record_reaction(&mut self) {
        self.stats.record_reaction();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{GridBounds, TickCounters, rng_trait};

    struct Fixture {
        grid: Grid,
        materials: Materials,
        counters: TickCounters,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                grid: Grid::new(GridBounds::new(8, 8)).unwrap(),
                materials: Materials::new(),
                counters: TickCounters::default(),
            }
        }

        fn spawn(&mut self, x: i32, y: i32, id: MaterialId) -> ParticleHandle {
            let def = self.materials.get(id).unwrap();
            self.grid.spawn(IVec2::new(x, y), def).unwrap()
        }

        fn run<T>(
            &mut self,
            handle: ParticleHandle,
            f: impl FnOnce(&mut RuleContext<'_>) -> T,
        ) -> T {
            let mut rng = rng_trait::seeded(1);
            let mut ctx = RuleContext::new(
                &mut self.grid,
                &self.materials,
                &mut rng,
                &mut self.counters,
                handle,
                3,
            );
            f(&mut ctx)
        }
    }

    #[test]
    fn test_try_move_into_empty() {
        let mut fx = Fixture::new();
        let sand = fx.spawn(4, 4, MaterialId::SAND);

        assert!(fx.run(sand, |ctx| ctx.try_move(DOWN)));
        assert_eq!(fx.grid.particle(sand).unwrap().coord, IVec2::new(4, 3));
        assert_eq!(fx.counters.moved, 1);
    }

    #[test]
    fn test_try_move_out_of_bounds() {
        let mut fx = Fixture::new();
        let sand = fx.spawn(0, 0, MaterialId::SAND);

        assert!(!fx.run(sand, |ctx| ctx.try_move(DOWN_LEFT)));
        assert_eq!(fx.grid.particle(sand).unwrap().coord, IVec2::new(0, 0));
        assert_eq!(fx.counters.moved, 0);
    }

    #[test]
    fn test_sand_displaces_water() {
        let mut fx = Fixture::new();
        let sand = fx.spawn(4, 4, MaterialId::SAND);
        let water = fx.spawn(4, 3, MaterialId::WATER);

        assert!(fx.run(sand, |ctx| ctx.try_move_or_displace(DOWN)));
        assert_eq!(fx.grid.particle(sand).unwrap().coord, IVec2::new(4, 3));
        assert_eq!(fx.grid.particle(water).unwrap().coord, IVec2::new(4, 4));
        assert_eq!(fx.counters.displaced, 1);
        assert!(fx.grid.is_consistent());
    }

    #[test]
    fn test_no_displacement_of_solids_or_upwards() {
        let mut fx = Fixture::new();
        let sand = fx.spawn(4, 4, MaterialId::SAND);
        fx.spawn(4, 3, MaterialId::WOOD);
        fx.spawn(3, 4, MaterialId::WATER);

        assert!(!fx.run(sand, |ctx| ctx.try_move_or_displace(DOWN)));
        assert!(!fx.run(sand, |ctx| ctx.try_move_or_displace(LEFT)));
        assert_eq!(fx.grid.particle(sand).unwrap().coord, IVec2::new(4, 4));
    }

    #[test]
    fn test_water_does_not_displace_heavier_acid() {
        let mut fx = Fixture::new();
        let water = fx.spawn(4, 4, MaterialId::WATER);
        fx.spawn(4, 3, MaterialId::ACID);

        assert!(!fx.run(water, |ctx| ctx.try_move_or_displace(DOWN)));
    }

    #[test]
    fn test_try_first_reports_offset() {
        let mut fx = Fixture::new();
        let sand = fx.spawn(4, 4, MaterialId::SAND);
        fx.spawn(4, 3, MaterialId::STONE);

        let moved = fx.run(sand, |ctx| {
            ctx.try_first(&[DOWN, DOWN_LEFT, DOWN_RIGHT], true)
        });
        assert_eq!(moved, Some(DOWN_LEFT));
    }

    #[test]
    fn test_rule_spawn_is_inert() {
        let mut fx = Fixture::new();
        let fire = fx.spawn(2, 2, MaterialId::FIRE);

        let inert = fx.run(fire, |ctx| {
            assert!(ctx.spawn(IVec2::new(2, 3), MaterialId::SMOKE));
            ctx.is_inert(IVec2::new(2, 3))
        });
        assert!(inert);
        assert_eq!(fx.counters.spawned, 1);
    }

    #[test]
    fn test_transform_and_destroy() {
        let mut fx = Fixture::new();
        let wood = fx.spawn(1, 1, MaterialId::WOOD);
        let water = fx.spawn(1, 2, MaterialId::WATER);

        fx.run(wood, |ctx| {
            assert!(ctx.transform_self(MaterialId::FIRE));
            assert!(ctx.destroy(water));
            assert!(!ctx.destroy(water));
        });
        assert_eq!(fx.grid.material_at(IVec2::new(1, 1)), Some(MaterialId::FIRE));
        assert!(fx.grid.is_empty(IVec2::new(1, 2)));
        assert_eq!(fx.counters.transformed, 1);
        assert_eq!(fx.counters.despawned, 1);
    }

    #[test]
    fn test_unknown_material_rejected() {
        let mut fx = Fixture::new();
        let sand = fx.spawn(1, 1, MaterialId::SAND);

        let changed = fx.run(sand, |ctx| ctx.transform_self(MaterialId(999)));
        assert!(!changed);
        assert_eq!(fx.grid.material_at(IVec2::new(1, 1)), Some(MaterialId::SAND));
    }
}
