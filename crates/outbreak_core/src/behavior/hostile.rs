//! Zombies: wander, chase the nearest survivor, feed on the downed.

use super::{Ctx, Mode, SurvivorMode};
use crate::fsm::{State, StateMachine};
use crate::lifecycle::{Body, Entity};
use outbreak_data::{EntityId, Kind};

const DOWNED: [Mode; 1] = [Mode::Survivor(SurvivorMode::Dead)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostileMode {
    Wandering,
    Seeking,
    Feeding,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostileState {
    Wandering,
    Seeking,
    Feeding,
}

fn set_prey(ctx: &mut Ctx<'_>, prey: Option<EntityId>) {
    if let Some(Entity {
        body: Body::Hostile { prey: slot },
        ..
    }) = ctx.me_mut()
    {
        *slot = prey;
    }
}

fn prey(ctx: &Ctx<'_>) -> Option<EntityId> {
    match ctx.me()?.body {
        Body::Hostile { prey } => prey,
        _ => None,
    }
}

/// Downed survivor close enough to feed on.
fn downed_nearby(ctx: &Ctx<'_>) -> Option<EntityId> {
    let position = ctx.position()?;
    ctx.registry
        .first_of_kind_in_states(Kind::Protected, &DOWNED, position, ctx.config.hostile.feed_radius)
}

impl State for HostileState {
    type Tag = HostileMode;
    type Context<'a> = Ctx<'a>;

    fn tag(&self) -> HostileMode {
        match self {
            HostileState::Wandering => HostileMode::Wandering,
            HostileState::Seeking => HostileMode::Seeking,
            HostileState::Feeding => HostileMode::Feeding,
        }
    }

    fn enter(&mut self, ctx: &mut Ctx<'_>) {
        match self {
            HostileState::Wandering => {
                let speed = ctx.speed(ctx.config.hostile.wander_speed);
                let destination = ctx.random_point();
                set_prey(ctx, None);
                if let Some(me) = ctx.me_mut() {
                    me.speed = speed;
                    me.destination = destination;
                }
            }
            HostileState::Seeking => {
                let speed = ctx.speed(ctx.config.hostile.seek_speed);
                if let Some(me) = ctx.me_mut() {
                    me.speed = speed;
                }
            }
            HostileState::Feeding => {
                if let Some(me) = ctx.me_mut() {
                    me.speed = 0.0;
                    me.destination = me.position;
                }
            }
        }
    }

    fn act(&mut self, ctx: &mut Ctx<'_>) {
        let Some(position) = ctx.position() else {
            return;
        };
        match self {
            HostileState::Wandering => {
                let arrived = ctx.me().is_some_and(|me| me.position == me.destination);
                if ctx.chance(ctx.config.hostile.redirect_chance) || arrived {
                    let destination = ctx.random_point();
                    if let Some(me) = ctx.me_mut() {
                        me.destination = destination;
                    }
                }
            }
            HostileState::Seeking => {
                let target = ctx.registry.nearest_of_kind(
                    Kind::Protected,
                    position,
                    ctx.config.hostile.lose_radius,
                );
                set_prey(ctx, target);
                let Some(target) = target else {
                    return;
                };
                let Some(target_position) = ctx.registry.position_of(target) else {
                    return;
                };
                if let Some(me) = ctx.me_mut() {
                    me.destination = target_position;
                }
                if position.distance(target_position) < ctx.config.hostile.strike_range
                    && ctx.chance(ctx.config.hostile.bite_chance)
                {
                    ctx.bite(target);
                }
            }
            HostileState::Feeding => {
                let target = downed_nearby(ctx);
                set_prey(ctx, target);
                if let Some(target) = target {
                    ctx.damage(target, 1);
                }
            }
        }
    }

    fn check(&mut self, ctx: &mut Ctx<'_>) -> Option<HostileMode> {
        let position = ctx.position()?;
        match self {
            HostileState::Wandering => {
                if let Some(target) = downed_nearby(ctx) {
                    set_prey(ctx, Some(target));
                    return Some(HostileMode::Feeding);
                }
                let target = ctx.registry.nearest_of_kind(
                    Kind::Protected,
                    position,
                    ctx.config.hostile.sense_radius,
                )?;
                set_prey(ctx, Some(target));
                Some(HostileMode::Seeking)
            }
            HostileState::Seeking => {
                let Some(target) = prey(ctx).and_then(|id| ctx.registry.get(id)) else {
                    return Some(HostileMode::Wandering);
                };
                (target.health <= 0).then_some(HostileMode::Feeding)
            }
            HostileState::Feeding => match downed_nearby(ctx) {
                Some(_) => None,
                None => Some(HostileMode::Wandering),
            },
        }
    }
}

#[must_use]
pub fn machine() -> StateMachine<HostileState> {
    StateMachine::new()
        .with_state(HostileState::Wandering)
        .with_state(HostileState::Seeking)
        .with_state(HostileState::Feeding)
}
