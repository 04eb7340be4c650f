use super::Behavior;
use crate::world::RuleContext;

/// Fire burns where it stands; everything it does comes from its reaction table
#[derive(Debug, Default)]
pub struct ReactiveBehavior;

impl Behavior for ReactiveBehavior {
    fn update(&self, _ctx: &mut RuleContext<'_>) {}
}
