use super::Behavior;
use crate::world::RuleContext;
use crate::world::rule_context::{UP, UP_LEFT, UP_RIGHT};

/// Smoke and steam: rise, or drift diagonally upward
#[derive(Debug, Default)]
pub struct GasBehavior;

impl Behavior for GasBehavior {
    fn update(&self, ctx: &mut RuleContext<'_>) {
        ctx.try_first(&[UP, UP_LEFT, UP_RIGHT], false);
    }
}
