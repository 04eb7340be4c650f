use super::Behavior;
use crate::world::RuleContext;
use crate::world::rule_context::{DOWN, DOWN_LEFT, DOWN_RIGHT};

/// Sand: falls straight down, then slides down-left, then down-right
#[derive(Debug, Default)]
pub struct GranularBehavior;

impl Behavior for GranularBehavior {
    fn update(&self, ctx: &mut RuleContext<'_>) {
        ctx.try_first(&[DOWN, DOWN_LEFT, DOWN_RIGHT], true);
    }
}
