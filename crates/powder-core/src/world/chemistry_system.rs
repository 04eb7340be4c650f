//! Chemistry system for reactions, ageing and emission

use glam::IVec2;
use powder_simulation::{Outcome, Reaction};

use super::ParticleHandle;
use super::RuleContext;
use super::rule_context::ORTHOGONAL;

/// Applies a material's data-driven transition rules to one particle
///
/// Runs after movement. Each step only fires while the particle is still
/// alive and untouched by another rule this tick.
pub struct ChemistrySystem;

impl ChemistrySystem {
    /// Reactions, then ageing, then emission
    pub fn apply(ctx: &mut RuleContext<'_>) {
        if Self::settled(ctx) {
            return;
        }
        Self::react(ctx);

        if Self::settled(ctx) {
            return;
        }
        Self::decay(ctx);

        if Self::settled(ctx) {
            return;
        }
        Self::emit(ctx);
    }

    fn settled(ctx: &RuleContext<'_>) -> bool {
        ctx.particle()
            .is_none_or(|particle| particle.changed_in(ctx.tick()))
    }

    /// Try the material's reactions in table order against its orthogonal
    /// neighbours
    ///
    /// An earlier reaction outranks a later one whatever side its partner is
    /// on. Neighbours a rule already changed this tick are skipped. At most
    /// one reaction fires per particle per tick.
    pub fn react(ctx: &mut RuleContext<'_>) -> bool {
        let (Some(def), Some(coord)) = (ctx.material(), ctx.coord()) else {
            return false;
        };

        for reaction in &def.reactions {
            for offset in ORTHOGONAL {
                let target = coord + offset;
                let Some(other) = ctx.handle_at(target) else {
                    continue;
                };
                if ctx.is_inert(target) {
                    continue;
                }
                let Some(other_def) = ctx.material_of(target) else {
                    continue;
                };
                if !reaction.with.matches(other_def) || !ctx.chance(reaction.chance) {
                    continue;
                }
                Self::resolve(ctx, other, reaction);
                return true;
            }
        }

        false
    }

    fn resolve(ctx: &mut RuleContext<'_>, other: ParticleHandle, reaction: &Reaction) {
        let this = ctx.handle();
        Self::apply_outcome(ctx, other, reaction.other);
        Self::apply_outcome(ctx, this, reaction.this);
        ctx.record_reaction();
    }

    fn apply_outcome(ctx: &mut RuleContext<'_>, handle: ParticleHandle, outcome: Outcome) {
        match outcome {
            Outcome::Keep => {}
            Outcome::Become(into) => {
                ctx.transform(handle, into);
            }
            Outcome::Destroy => {
                ctx.destroy(handle);
            }
        }
    }

    /// Turn into the material's age transition target once old enough
    pub fn decay(ctx: &mut RuleContext<'_>) -> bool {
        let (Some(def), Some(age)) = (ctx.material(), ctx.particle().map(|p| p.aux.age)) else {
            return false;
        };
        let Some(decay) = def.decay else {
            return false;
        };
        if age < decay.after_ticks || !ctx.chance(decay.chance) {
            return false;
        }
        ctx.transform_self(decay.into)
    }

    /// Create the material's emission in the empty cell at its offset
    pub fn emit(ctx: &mut RuleContext<'_>) -> bool {
        let (Some(def), Some(coord)) = (ctx.material(), ctx.coord()) else {
            return false;
        };
        let Some(emission) = def.emission else {
            return false;
        };
        let target = coord + IVec2::new(emission.dx, emission.dy);
        if !ctx.is_empty(target) || !ctx.chance(emission.chance) {
            return false;
        }
        ctx.spawn(target, emission.material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Grid, GridBounds, SimStats, TickCounters, WorldRng};
    use powder_simulation::{MaterialId, MaterialTuning, Materials};

    /// Test RNG where every probability check gives the same answer
    struct TestRng {
        pass: bool,
    }

    impl WorldRng for TestRng {
        fn gen_f32(&mut self) -> f32 {
            0.5
        }

        fn check_probability(&mut self, _probability: f32) -> bool {
            self.pass
        }
    }

    struct Lab {
        grid: Grid,
        materials: Materials,
        counters: TickCounters,
    }

    impl Lab {
        fn new() -> Self {
            Self {
                grid: Grid::new(GridBounds::new(8, 8)).unwrap(),
                materials: Materials::with_tuning(&MaterialTuning::default()),
                counters: TickCounters::default(),
            }
        }

        fn spawn(&mut self, x: i32, y: i32, id: MaterialId) -> ParticleHandle {
            let def = self.materials.get(id).unwrap();
            self.grid.spawn(IVec2::new(x, y), def).unwrap()
        }

        fn apply(&mut self, handle: ParticleHandle, pass: bool) {
            let mut rng = TestRng { pass };
            let stats: &mut dyn SimStats = &mut self.counters;
            let mut ctx =
                RuleContext::new(&mut self.grid, &self.materials, &mut rng, stats, handle, 1);
            ChemistrySystem::apply(&mut ctx);
        }

        fn at(&self, x: i32, y: i32) -> Option<MaterialId> {
            self.grid.material_at(IVec2::new(x, y))
        }
    }

    #[test]
    fn test_fire_extinguished_by_water() {
        let mut lab = Lab::new();
        let fire = lab.spawn(3, 3, MaterialId::FIRE);
        lab.spawn(3, 2, MaterialId::WATER);

        lab.apply(fire, true);
        assert_eq!(lab.at(3, 3), Some(MaterialId::STEAM));
        assert_eq!(lab.at(3, 2), None);
        assert_eq!(lab.counters.reactions, 1);
        // Changed this tick, so no smoke on top
        assert_eq!(lab.at(3, 4), None);
    }

    #[test]
    fn test_fire_ignites_wood_and_keeps_burning() {
        let mut lab = Lab::new();
        let fire = lab.spawn(3, 3, MaterialId::FIRE);
        lab.spawn(4, 3, MaterialId::WOOD);

        lab.apply(fire, true);
        assert_eq!(lab.at(4, 3), Some(MaterialId::FIRE));
        assert_eq!(lab.at(3, 3), Some(MaterialId::FIRE));
        assert!(lab.grid.particle_at(IVec2::new(4, 3)).unwrap().changed_in(1));
        assert_eq!(lab.at(3, 4), Some(MaterialId::SMOKE));
    }

    #[test]
    fn test_water_outranks_fuel_on_any_side() {
        let mut lab = Lab::new();
        let fire = lab.spawn(3, 3, MaterialId::FIRE);
        lab.spawn(3, 4, MaterialId::WOOD);
        lab.spawn(3, 2, MaterialId::WATER);

        lab.apply(fire, true);
        assert_eq!(lab.at(3, 3), Some(MaterialId::STEAM));
        assert_eq!(lab.at(3, 2), None);
        assert_eq!(lab.at(3, 4), Some(MaterialId::WOOD));
        assert_eq!(lab.counters.reactions, 1);
    }

    #[test]
    fn test_at_most_one_reaction_per_tick() {
        let mut lab = Lab::new();
        let fire = lab.spawn(3, 3, MaterialId::FIRE);
        lab.spawn(4, 3, MaterialId::WOOD);
        lab.spawn(2, 3, MaterialId::WOOD);

        lab.apply(fire, true);
        assert_eq!(lab.at(4, 3), Some(MaterialId::FIRE));
        assert_eq!(lab.at(2, 3), Some(MaterialId::WOOD));
        assert_eq!(lab.counters.reactions, 1);
    }

    #[test]
    fn test_inert_neighbours_are_skipped() {
        let mut lab = Lab::new();
        let wood = lab.spawn(3, 3, MaterialId::WOOD);
        let fire = lab.spawn(3, 4, MaterialId::FIRE);
        lab.grid.particle_mut(fire).unwrap().aux.changed_tick = 1;

        lab.apply(wood, true);
        assert_eq!(lab.at(3, 3), Some(MaterialId::WOOD));
        assert_eq!(lab.counters.reactions, 0);
    }

    #[test]
    fn test_failed_draw_changes_nothing() {
        let mut lab = Lab::new();
        let sand = lab.spawn(3, 3, MaterialId::SAND);
        lab.spawn(3, 4, MaterialId::FIRE);

        lab.apply(sand, false);
        assert_eq!(lab.at(3, 3), Some(MaterialId::SAND));

        lab.apply(sand, true);
        assert_eq!(lab.at(3, 3), Some(MaterialId::GLASS));
    }

    #[test]
    fn test_acid_dissolves_wood_not_glass() {
        let mut lab = Lab::new();
        let acid = lab.spawn(3, 3, MaterialId::ACID);
        lab.spawn(3, 4, MaterialId::GLASS);
        lab.spawn(4, 3, MaterialId::STONE);
        lab.spawn(3, 2, MaterialId::WOOD);

        lab.apply(acid, true);
        assert_eq!(lab.at(3, 2), None);
        assert_eq!(lab.at(3, 3), None);
        assert_eq!(lab.at(3, 4), Some(MaterialId::GLASS));
        assert_eq!(lab.at(4, 3), Some(MaterialId::STONE));
        assert_eq!(lab.counters.despawned, 2);
        assert!(lab.grid.is_consistent());
    }

    #[test]
    fn test_steam_condenses_only_when_old() {
        let mut lab = Lab::new();
        let steam = lab.spawn(3, 3, MaterialId::STEAM);
        let after = MaterialTuning::default().steam.condense_after;

        lab.grid.particle_mut(steam).unwrap().aux.age = after - 1;
        lab.apply(steam, true);
        assert_eq!(lab.at(3, 3), Some(MaterialId::STEAM));

        lab.grid.particle_mut(steam).unwrap().aux.age = after;
        lab.apply(steam, true);
        assert_eq!(lab.at(3, 3), Some(MaterialId::WATER));
        assert_eq!(lab.counters.transformed, 1);
    }

    #[test]
    fn test_emission_needs_empty_cell() {
        let mut lab = Lab::new();
        let fire = lab.spawn(3, 3, MaterialId::FIRE);
        lab.spawn(3, 4, MaterialId::STONE);

        lab.apply(fire, true);
        assert_eq!(lab.at(3, 4), Some(MaterialId::STONE));
        assert_eq!(lab.counters.spawned, 0);
    }
}
