//! Bullets: pure pursuit of one target, one point of damage.

use super::Ctx;
use crate::fsm::{State, StateMachine};
use crate::lifecycle::{create_decay, Body};
use outbreak_data::{EntityId, RemovalCause};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileMode {
    Seeking,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectileState {
    Seeking,
}

fn target(ctx: &Ctx<'_>) -> Option<EntityId> {
    match ctx.me()?.body {
        Body::Projectile { target } => Some(target),
        _ => None,
    }
}

impl State for ProjectileState {
    type Tag = ProjectileMode;
    type Context<'a> = Ctx<'a>;

    fn tag(&self) -> ProjectileMode {
        ProjectileMode::Seeking
    }

    fn enter(&mut self, ctx: &mut Ctx<'_>) {
        let speed = ctx.config.projectile.speed;
        let aim = target(ctx).and_then(|id| ctx.registry.position_of(id));
        if let Some(me) = ctx.me_mut() {
            me.speed = speed;
            if let Some(aim) = aim {
                me.destination = aim;
            }
        }
    }

    fn act(&mut self, ctx: &mut Ctx<'_>) {
        let (Some(position), Some(target)) = (ctx.position(), target(ctx)) else {
            return;
        };
        let Some(target_position) = ctx.registry.position_of(target) else {
            ctx.remove(ctx.me, RemovalCause::Spent);
            return;
        };

        if position.distance(target_position) > ctx.config.projectile.hit_radius {
            if let Some(me) = ctx.me_mut() {
                me.destination = target_position;
            }
            return;
        }

        if ctx.damage(target, 1).is_some_and(|health| health <= 0) {
            ctx.remove(target, RemovalCause::Shot);
            ctx.spawn(create_decay(target_position, ctx.config));
        }
        ctx.remove(ctx.me, RemovalCause::Spent);
    }
}

#[must_use]
pub fn machine() -> StateMachine<ProjectileState> {
    StateMachine::new().with_state(ProjectileState::Seeking)
}
