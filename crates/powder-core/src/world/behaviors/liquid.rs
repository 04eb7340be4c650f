use super::Behavior;
use crate::world::RuleContext;
use crate::world::rule_context::{DOWN, DOWN_LEFT, DOWN_RIGHT, LEFT, RIGHT};

/// Water and acid: fall like sand, otherwise spread sideways
///
/// Each particle remembers which side it flowed to last and keeps going
/// that way until blocked, so a pool levels out instead of jittering.
#[derive(Debug, Default)]
pub struct LiquidBehavior;

impl Behavior for LiquidBehavior {
    fn update(&self, ctx: &mut RuleContext<'_>) {
        if ctx.try_first(&[DOWN, DOWN_LEFT, DOWN_RIGHT], true).is_some() {
            return;
        }

        let flow_left = ctx.flow_left();
        let (preferred, other) = if flow_left {
            (LEFT, RIGHT)
        } else {
            (RIGHT, LEFT)
        };
        if ctx.try_move(preferred) {
            return;
        }
        if ctx.try_move(other) {
            ctx.set_flow_left(!flow_left);
        }
    }
}
