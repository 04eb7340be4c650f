//! Movement behaviors, one per material class

mod gas;
mod granular;
mod liquid;
mod reactive;
mod static_solid;

pub use gas::GasBehavior;
pub use granular::GranularBehavior;
pub use liquid::LiquidBehavior;
pub use reactive::ReactiveBehavior;
pub use static_solid::StaticBehavior;

use powder_simulation::BehaviorClass;

use super::RuleContext;

/// Movement step of a particle's per-tick update
///
/// Chemistry runs separately afterwards, so implementations only decide
/// where the particle goes.
pub trait Behavior {
    fn update(&self, ctx: &mut RuleContext<'_>);
}

/// Dispatch table from behavior class to implementation
#[derive(Debug, Default)]
pub struct BehaviorSet {
    static_solid: StaticBehavior,
    granular: GranularBehavior,
    liquid: LiquidBehavior,
    gas: GasBehavior,
    reactive: ReactiveBehavior,
}

impl BehaviorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_class(&self, class: BehaviorClass) -> &dyn Behavior {
        match class {
            BehaviorClass::SolidStatic => &self.static_solid,
            BehaviorClass::SolidGranular => &self.granular,
            BehaviorClass::Liquid => &self.liquid,
            BehaviorClass::Gas => &self.gas,
            BehaviorClass::Reactive => &self.reactive,
        }
    }
}
