//! Survivors: explore, shoot, run, scavenge, and sometimes get back up.

use super::{Ctx, HostileMode, Mode};
use crate::fsm::{State, StateMachine};
use crate::lifecycle::{create_projectile, SurvivorBody};
use outbreak_data::{EntityId, Kind, Point, RemovalCause, SimEvent, VisualHandle};
use tracing::debug;

/// Hostiles that are an immediate danger, preferred when picking what to
/// run from.
const ACTIVE_HOSTILES: [Mode; 2] = [
    Mode::Hostile(HostileMode::Wandering),
    Mode::Hostile(HostileMode::Seeking),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurvivorMode {
    Exploring,
    Attacking,
    Evading,
    Seeking,
    Dead,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurvivorState {
    Exploring,
    Attacking,
    Evading,
    Seeking,
    Dead,
}

fn body<'c>(ctx: &'c Ctx<'_>) -> Option<&'c SurvivorBody> {
    ctx.me()?.survivor()
}

fn body_mut<'c>(ctx: &'c mut Ctx<'_>) -> Option<&'c mut SurvivorBody> {
    ctx.me_mut()?.survivor_mut()
}

fn set_destination(ctx: &mut Ctx<'_>, destination: Point) {
    if let Some(me) = ctx.me_mut() {
        me.destination = destination;
    }
}

fn nearest_hostile(ctx: &Ctx<'_>, radius: f64) -> Option<EntityId> {
    let position = ctx.position()?;
    ctx.registry.nearest_of_kind(Kind::Hostile, position, radius)
}

/// True while health or ammunition is below maximum.
fn needs_supplies(ctx: &Ctx<'_>) -> bool {
    let Some(me) = ctx.me() else {
        return false;
    };
    let ammo = me.survivor().map_or(0, |s| s.ammo);
    me.health < ctx.config.survivor.max_health || ammo < ctx.config.survivor.max_ammo
}

/// Point mirrored through the survivor away from `threat`, jittered and
/// kept off the far edges.
fn flee_point(ctx: &mut Ctx<'_>, threat: Point) -> Option<Point> {
    let position = ctx.position()?;
    let away = position - (threat - position);
    let jitter = ctx.config.survivor.evade_jitter;
    let margin = ctx.config.world.edge_margin;
    let dx = ctx.rng.between(-jitter, jitter);
    let dy = ctx.rng.between(-jitter, jitter);
    let max_x = (ctx.bounds.width - margin).max(0.0);
    let max_y = (ctx.bounds.height - margin).max(0.0);
    Some(Point::new(
        (away.x + dx).clamp(0.0, max_x),
        (away.y + dy).clamp(0.0, max_y),
    ))
}

/// Picks a hostile to run from, preferring ones that are not feeding, and
/// heads away from it.
fn reacquire_threat(ctx: &mut Ctx<'_>) {
    let Some(position) = ctx.position() else {
        return;
    };
    let radius = ctx.config.survivor.evade_radius;
    let threat = ctx
        .registry
        .first_of_kind_in_states(Kind::Hostile, &ACTIVE_HOSTILES, position, radius)
        .or_else(|| ctx.registry.first_of_kind(Some(Kind::Hostile), position, radius, None));
    let Some(threat) = threat else {
        return;
    };
    let Some(threat_position) = ctx.registry.position_of(threat) else {
        return;
    };
    if let Some(body) = body_mut(ctx) {
        body.threat = Some(threat);
    }
    if let Some(destination) = flee_point(ctx, threat_position) {
        set_destination(ctx, destination);
    }
}

fn fire(ctx: &mut Ctx<'_>) {
    let Some(position) = ctx.position() else {
        return;
    };
    let Some(target) = body(ctx).and_then(|s| s.threat) else {
        return;
    };
    if !ctx.registry.contains(target) {
        return;
    }

    let shooter = ctx.me;
    let projectile = ctx.spawn(create_projectile(position, target));
    if let Some(body) = body_mut(ctx) {
        body.ammo = body.ammo.saturating_sub(1);
    }
    debug!(shooter = %shooter, target = %target, "Shot fired");
    ctx.events.push(SimEvent::Fired {
        shooter,
        target,
        projectile,
        tick: ctx.tick,
    });
}

fn collect(ctx: &mut Ctx<'_>, pickup: EntityId) {
    ctx.remove(pickup, RemovalCause::Collected);
    let (max_health, max_ammo) = (ctx.config.survivor.max_health, ctx.config.survivor.max_ammo);
    if let Some(me) = ctx.me_mut() {
        me.health = max_health;
        if let Some(body) = me.survivor_mut() {
            body.ammo = max_ammo;
            body.pickup = None;
        }
    }
    ctx.events.push(SimEvent::Resupplied {
        id: ctx.me,
        pickup,
        tick: ctx.tick,
    });
}

impl State for SurvivorState {
    type Tag = SurvivorMode;
    type Context<'a> = Ctx<'a>;

    fn tag(&self) -> SurvivorMode {
        match self {
            SurvivorState::Exploring => SurvivorMode::Exploring,
            SurvivorState::Attacking => SurvivorMode::Attacking,
            SurvivorState::Evading => SurvivorMode::Evading,
            SurvivorState::Seeking => SurvivorMode::Seeking,
            SurvivorState::Dead => SurvivorMode::Dead,
        }
    }

    fn enter(&mut self, ctx: &mut Ctx<'_>) {
        match self {
            SurvivorState::Exploring => {
                let speed = ctx.speed(ctx.config.survivor.explore_speed);
                let destination = ctx.random_point();
                if let Some(me) = ctx.me_mut() {
                    me.speed = speed;
                    me.destination = destination;
                }
            }
            SurvivorState::Attacking => {
                if let Some(me) = ctx.me_mut() {
                    me.destination = me.position;
                }
            }
            SurvivorState::Evading => {
                let speed = ctx.speed(ctx.config.survivor.evade_speed);
                if let Some(me) = ctx.me_mut() {
                    me.speed = speed;
                }
                let threat = body(ctx)
                    .and_then(|s| s.threat)
                    .and_then(|id| ctx.registry.position_of(id));
                if let Some(destination) = threat.and_then(|t| flee_point(ctx, t)) {
                    set_destination(ctx, destination);
                }
            }
            SurvivorState::Seeking => {
                let speed = ctx.speed(ctx.config.survivor.explore_speed);
                let pickup = body(ctx)
                    .and_then(|s| s.pickup)
                    .and_then(|id| ctx.registry.position_of(id));
                if let Some(me) = ctx.me_mut() {
                    me.speed = speed;
                    if let Some(pickup) = pickup {
                        me.destination = pickup;
                    }
                }
            }
            SurvivorState::Dead => {
                if let Some(me) = ctx.me_mut() {
                    me.speed = 0.0;
                    me.destination = me.position;
                    me.visual = VisualHandle::SURVIVOR_DEAD;
                }
            }
        }
    }

    fn act(&mut self, ctx: &mut Ctx<'_>) {
        if *self != SurvivorState::Dead {
            if let Some(me) = ctx.me_mut() {
                me.visual = VisualHandle::SURVIVOR;
            }
        }

        match self {
            SurvivorState::Exploring => {
                let arrived = ctx.me().is_some_and(|me| me.position == me.destination);
                if ctx.chance(ctx.config.survivor.redirect_chance) || arrived {
                    let destination = ctx.random_point();
                    set_destination(ctx, destination);
                }
            }
            SurvivorState::Attacking => {
                let armed = body(ctx).is_some_and(|s| s.ammo > 0);
                if armed && ctx.chance(ctx.config.survivor.fire_chance) {
                    fire(ctx);
                }
            }
            SurvivorState::Evading => {
                if ctx.chance(ctx.config.survivor.reacquire_chance) {
                    reacquire_threat(ctx);
                }
            }
            SurvivorState::Seeking => {
                let pickup = body(ctx)
                    .and_then(|s| s.pickup)
                    .and_then(|id| ctx.registry.position_of(id));
                if let Some(pickup) = pickup {
                    set_destination(ctx, pickup);
                }
            }
            SurvivorState::Dead => {
                if ctx.chance(ctx.config.survivor.regen_chance) {
                    let (amount, max) = (ctx.config.survivor.regen_amount, ctx.config.survivor.max_health);
                    if let Some(me) = ctx.me_mut() {
                        me.health = (me.health + amount).min(max);
                    }
                }
            }
        }
    }

    fn check(&mut self, ctx: &mut Ctx<'_>) -> Option<SurvivorMode> {
        let sense = ctx.config.survivor.sense_radius;
        match self {
            SurvivorState::Exploring => {
                if let Some(threat) = nearest_hostile(ctx, sense) {
                    body_mut(ctx)?.threat = Some(threat);
                    return Some(SurvivorMode::Evading);
                }
                if !needs_supplies(ctx) {
                    return None;
                }
                let position = ctx.position()?;
                let pickup = ctx.registry.nearest_of_kind(
                    Kind::Pickup,
                    position,
                    ctx.config.survivor.pickup_radius,
                )?;
                body_mut(ctx)?.pickup = Some(pickup);
                Some(SurvivorMode::Seeking)
            }
            SurvivorState::Attacking => {
                let threat = nearest_hostile(ctx, sense);
                let clock = ctx.clock;
                let window = ctx.config.survivor.fallback_window;
                let fallback = ctx.config.survivor.fallback_chance;
                let ammo = {
                    let body = body_mut(ctx)?;
                    body.threat = threat;
                    body.ammo
                };
                if threat.is_none() {
                    return Some(SurvivorMode::Exploring);
                }
                if ammo == 0 {
                    return Some(SurvivorMode::Evading);
                }
                if ctx.chance(fallback) {
                    body_mut(ctx)?.evade_until = Some(clock + window);
                    return Some(SurvivorMode::Evading);
                }
                None
            }
            SurvivorState::Evading => {
                let clock = ctx.clock;
                let body = body_mut(ctx)?;
                match body.evade_until {
                    Some(until) if clock < until => return None,
                    Some(_) => body.evade_until = None,
                    None => {}
                }
                let ammo = body.ammo;
                match nearest_hostile(ctx, sense) {
                    Some(threat) if ammo > 0 => {
                        body_mut(ctx)?.threat = Some(threat);
                        Some(SurvivorMode::Attacking)
                    }
                    Some(_) => None,
                    None => {
                        body_mut(ctx)?.threat = None;
                        Some(SurvivorMode::Exploring)
                    }
                }
            }
            SurvivorState::Seeking => {
                if let Some(threat) = nearest_hostile(ctx, sense) {
                    body_mut(ctx)?.threat = Some(threat);
                    return Some(SurvivorMode::Evading);
                }
                let position = ctx.position()?;
                let Some(pickup) = body(ctx).and_then(|s| s.pickup) else {
                    return Some(SurvivorMode::Exploring);
                };
                let Some(pickup_position) = ctx.registry.position_of(pickup) else {
                    body_mut(ctx)?.pickup = None;
                    return Some(SurvivorMode::Exploring);
                };
                if position.distance(pickup_position) < ctx.config.survivor.pickup_reach {
                    collect(ctx, pickup);
                    return Some(SurvivorMode::Exploring);
                }
                None
            }
            SurvivorState::Dead => {
                let health = ctx.me()?.health;
                (health >= ctx.config.survivor.max_health).then_some(SurvivorMode::Exploring)
            }
        }
    }

    fn exit(&mut self, ctx: &mut Ctx<'_>) {
        if *self == SurvivorState::Dead {
            if let Some(me) = ctx.me_mut() {
                me.visual = VisualHandle::SURVIVOR;
            }
        }
    }
}

#[must_use]
pub fn machine() -> StateMachine<SurvivorState> {
    StateMachine::new()
        .with_state(SurvivorState::Exploring)
        .with_state(SurvivorState::Attacking)
        .with_state(SurvivorState::Evading)
        .with_state(SurvivorState::Seeking)
        .with_state(SurvivorState::Dead)
}
