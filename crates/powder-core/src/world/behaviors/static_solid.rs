use super::Behavior;
use crate::world::RuleContext;

/// Stone, wood and glass hold their cell forever
#[derive(Debug, Default)]
pub struct StaticBehavior;

impl Behavior for StaticBehavior {
    fn update(&self, _ctx: &mut RuleContext<'_>) {}
}
