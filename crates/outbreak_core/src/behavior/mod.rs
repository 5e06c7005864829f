//! Behavior graphs for every entity kind and the glue that runs them.
//!
//! Each kind has a closed state enum implementing [`State`](crate::fsm::State)
//! with [`Ctx`] as its context. A [`Brain`] wraps the kind's machine so the
//! world can drive every entity through one type.

pub mod decay;
pub mod hostile;
pub mod projectile;
pub mod spawner;
pub mod survivor;

pub use decay::{DecayMode, DecayState};
pub use hostile::{HostileMode, HostileState};
pub use projectile::{ProjectileMode, ProjectileState};
pub use spawner::{SpawnerMode, SpawnerState};
pub use survivor::{SurvivorMode, SurvivorState};

use crate::config::{AppConfig, SpeedRange};
use crate::fsm::StateMachine;
use crate::lifecycle::Entity;
use crate::locomotion;
use crate::registry::Registry;
use crate::rng::SimRng;
use outbreak_data::{Bounds, EntityId, Point, RemovalCause, SimEvent, VisualHandle};
use std::fmt;
use tracing::debug;

/// Active state of any brain, qualified by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Spawner(SpawnerMode),
    Hostile(HostileMode),
    Survivor(SurvivorMode),
    Projectile(ProjectileMode),
    Decay(DecayMode),
}

impl Mode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Spawner(SpawnerMode::Spawning) => "spawning",
            Mode::Hostile(HostileMode::Wandering) => "wandering",
            Mode::Hostile(HostileMode::Seeking)
            | Mode::Survivor(SurvivorMode::Seeking)
            | Mode::Projectile(ProjectileMode::Seeking) => "seeking",
            Mode::Hostile(HostileMode::Feeding) => "feeding",
            Mode::Survivor(SurvivorMode::Exploring) => "exploring",
            Mode::Survivor(SurvivorMode::Attacking) => "attacking",
            Mode::Survivor(SurvivorMode::Evading) => "evading",
            Mode::Survivor(SurvivorMode::Dead) => "dead",
            Mode::Decay(DecayMode::Fading) => "fading",
        }
    }

    /// Two-letter label for debug overlays.
    #[must_use]
    pub fn short(self) -> String {
        self.name().chars().take(2).collect()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<SpawnerMode> for Mode {
    fn from(m: SpawnerMode) -> Self {
        Mode::Spawner(m)
    }
}

impl From<HostileMode> for Mode {
    fn from(m: HostileMode) -> Self {
        Mode::Hostile(m)
    }
}

impl From<SurvivorMode> for Mode {
    fn from(m: SurvivorMode) -> Self {
        Mode::Survivor(m)
    }
}

impl From<ProjectileMode> for Mode {
    fn from(m: ProjectileMode) -> Self {
        Mode::Projectile(m)
    }
}

impl From<DecayMode> for Mode {
    fn from(m: DecayMode) -> Self {
        Mode::Decay(m)
    }
}

/// An entity's owned state machine.
#[derive(Debug, Default)]
pub enum Brain {
    /// No behavior at all. Pickups carry this.
    #[default]
    Inert,
    Spawner(StateMachine<SpawnerState>),
    Hostile(StateMachine<HostileState>),
    Survivor(StateMachine<SurvivorState>),
    Projectile(StateMachine<ProjectileState>),
    Decay(StateMachine<DecayState>),
}

impl Brain {
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        match self {
            Brain::Inert => None,
            Brain::Spawner(m) => m.active().map(Mode::from),
            Brain::Hostile(m) => m.active().map(Mode::from),
            Brain::Survivor(m) => m.active().map(Mode::from),
            Brain::Projectile(m) => m.active().map(Mode::from),
            Brain::Decay(m) => m.active().map(Mode::from),
        }
    }

    /// One act/check step. Returns the state entered, if any.
    pub fn think(&mut self, ctx: &mut Ctx<'_>) -> Option<Mode> {
        match self {
            Brain::Inert => None,
            Brain::Spawner(m) => m.think(ctx).map(Mode::from),
            Brain::Hostile(m) => m.think(ctx).map(Mode::from),
            Brain::Survivor(m) => m.think(ctx).map(Mode::from),
            Brain::Projectile(m) => m.think(ctx).map(Mode::from),
            Brain::Decay(m) => m.think(ctx).map(Mode::from),
        }
    }

    /// Forces a state, running exit and entry hooks.
    ///
    /// # Panics
    ///
    /// Panics if `mode` belongs to a different kind of brain.
    pub fn set_mode(&mut self, mode: Mode, ctx: &mut Ctx<'_>) {
        match (self, mode) {
            (Brain::Spawner(m), Mode::Spawner(tag)) => m.set_state(tag, ctx),
            (Brain::Hostile(m), Mode::Hostile(tag)) => m.set_state(tag, ctx),
            (Brain::Survivor(m), Mode::Survivor(tag)) => m.set_state(tag, ctx),
            (Brain::Projectile(m), Mode::Projectile(tag)) => m.set_state(tag, ctx),
            (Brain::Decay(m), Mode::Decay(tag)) => m.set_state(tag, ctx),
            (brain, mode) => panic!("state {mode:?} does not exist in {brain:?}"),
        }
    }
}

/// Everything a state hook may touch while one entity thinks.
pub struct Ctx<'a> {
    /// The entity whose brain is running.
    pub me: EntityId,
    pub registry: &'a mut Registry,
    pub rng: &'a mut SimRng,
    pub config: &'a AppConfig,
    pub bounds: Bounds,
    /// Simulated seconds since the world started.
    pub clock: f64,
    pub tick: u64,
    /// World-wide debug flag inherited by newly spawned entities.
    pub debug_mode: bool,
    pub events: &'a mut Vec<SimEvent>,
}

impl<'a> Ctx<'a> {
    #[must_use]
    pub fn me(&self) -> Option<&Entity> {
        self.registry.get(self.me)
    }

    pub fn me_mut(&mut self) -> Option<&mut Entity> {
        self.registry.get_mut(self.me)
    }

    /// Own position, or `None` once removed.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        self.registry.position_of(self.me)
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.chance(p)
    }

    pub fn random_point(&mut self) -> Point {
        self.rng.point_in(self.bounds)
    }

    pub fn speed(&mut self, range: SpeedRange) -> f64 {
        self.rng.speed(range)
    }

    /// The same world seen from another entity.
    pub fn reborrow(&mut self, me: EntityId) -> Ctx<'_> {
        Ctx {
            me,
            registry: &mut *self.registry,
            rng: &mut *self.rng,
            config: self.config,
            bounds: self.bounds,
            clock: self.clock,
            tick: self.tick,
            debug_mode: self.debug_mode,
            events: &mut *self.events,
        }
    }

    /// Checks `id`'s brain out of the registry, runs `f` with a context for
    /// `id`, and puts the brain back if the entity is still registered.
    pub fn with_brain<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut Brain, &mut Ctx<'_>) -> R,
    ) -> Option<R> {
        let mut brain = std::mem::take(&mut self.registry.get_mut(id)?.brain);
        let out = f(&mut brain, &mut self.reborrow(id));
        if let Some(entity) = self.registry.get_mut(id) {
            entity.brain = brain;
        }
        Some(out)
    }

    /// Registers an entity and enters its initial state.
    ///
    /// The newcomer is not simulated until the next tick.
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        entity.position = self.bounds.clamp(entity.position);
        entity.debug_mode = self.debug_mode;
        let (kind, position, initial) = (entity.kind(), entity.position, entity.initial);

        let id = self.registry.insert(entity);
        debug!(id = %id, kind = %kind, x = position.x, y = position.y, "Spawned");
        self.events.push(SimEvent::Spawned {
            id,
            kind,
            position,
            tick: self.tick,
        });

        if let Some(mode) = initial {
            self.with_brain(id, |brain, ctx| brain.set_mode(mode, ctx));
        }
        id
    }

    pub fn remove(&mut self, id: EntityId, cause: RemovalCause) -> Option<Entity> {
        let entity = self.registry.remove(id)?;
        debug!(id = %id, kind = %entity.kind(), cause = ?cause, "Removed");
        self.events.push(SimEvent::Removed {
            id,
            kind: entity.kind(),
            cause,
            tick: self.tick,
        });
        Some(entity)
    }

    /// Subtracts `amount` health from `target` and returns what is left.
    pub fn damage(&mut self, target: EntityId, amount: i32) -> Option<i32> {
        let entity = self.registry.get_mut(target)?;
        entity.health -= amount;
        Some(entity.health)
    }

    /// A hostile's strike on a survivor.
    ///
    /// A living survivor flashes its hit visual. One that drops to zero
    /// health is forced into `dead`.
    pub fn bite(&mut self, target: EntityId) -> Option<i32> {
        let health = self.damage(target, 1)?;
        let entity = self.registry.get_mut(target)?;
        let alive = !matches!(entity.mode(), None | Some(Mode::Survivor(SurvivorMode::Dead)));
        if !alive || entity.survivor().is_none() {
            return Some(health);
        }

        entity.visual = VisualHandle::SURVIVOR_HIT;
        if health <= 0 {
            let by = self.me;
            self.with_brain(target, |brain, ctx| {
                brain.set_mode(Mode::Survivor(SurvivorMode::Dead), ctx);
            });
            debug!(id = %target, by = %by, "Survivor downed");
            self.events.push(SimEvent::Downed {
                id: target,
                by,
                tick: self.tick,
            });
        }
        Some(health)
    }

    /// Locomotion for the current entity.
    pub fn steer(&mut self, elapsed: f64) {
        locomotion::advance(
            self.registry,
            self.rng,
            self.me,
            elapsed,
            self.bounds,
            &self.config.world,
        );
    }
}


#[cfg(test)]
mod tests {
    use super::testing::Bench;
    use super::*;
    use crate::lifecycle::{create_hostile, create_pickup, create_survivor};

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::Survivor(SurvivorMode::Evading).short(), "ev");
        assert_eq!(Mode::Hostile(HostileMode::Feeding).name(), "feeding");
        assert_eq!(Mode::from(DecayMode::Fading).to_string(), "fading");
    }

    #[test]
    fn test_spawn_activates_initial_state() {
        let mut bench = Bench::unlucky();
        let config = bench.config.clone();
        let id = bench.spawn(create_hostile(Point::new(5.0, 5.0), &config));
        assert_eq!(bench.mode(id), Some(Mode::Hostile(HostileMode::Wandering)));
        assert!(matches!(bench.events[0], SimEvent::Spawned { id: e, .. } if e == id));
    }

    #[test]
    fn test_spawn_clamps_into_bounds() {
        let mut bench = Bench::unlucky();
        let id = bench.spawn(create_pickup(Point::new(-10.0, 900.0)));
        assert_eq!(bench.entity(id).position, Point::new(0.0, 600.0));
        assert_eq!(bench.mode(id), None);
    }

    #[test]
    #[should_panic(expected = "does not exist")]
    fn test_set_mode_of_wrong_kind_panics() {
        let mut bench = Bench::unlucky();
        let config = bench.config.clone();
        let id = bench.spawn(create_hostile(Point::ZERO, &config));
        bench.force(id, Mode::Survivor(SurvivorMode::Dead));
    }

    #[test]
    fn test_with_brain_on_missing_entity() {
        let mut bench = Bench::unlucky();
        let ran = bench.ctx(EntityId(1)).with_brain(EntityId(99), |_, _| ());
        assert!(ran.is_none());
    }

    #[test]
    fn test_brain_is_dropped_when_entity_removes_itself() {
        let mut bench = Bench::unlucky();
        let id = bench.place(create_pickup(Point::ZERO));
        bench.ctx(id).with_brain(id, |_, ctx| {
            ctx.remove(ctx.me, RemovalCause::External);
        });
        assert!(bench.registry.get(id).is_none());
    }

    #[test]
    fn test_bite_downs_a_living_survivor() {
        let mut bench = Bench::unlucky();
        let config = bench.config.clone();
        let zombie = bench.place(create_hostile(Point::ZERO, &config));
        let survivor = bench.spawn(create_survivor(Point::new(1.0, 0.0), &config));
        bench.entity_mut(survivor).health = 1;

        assert_eq!(bench.ctx(zombie).bite(survivor), Some(0));
        assert_eq!(bench.mode(survivor), Some(Mode::Survivor(SurvivorMode::Dead)));
        assert_eq!(bench.entity(survivor).visual, VisualHandle::SURVIVOR_DEAD);
        assert!(bench
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::Downed { id, by, .. } if *id == survivor && *by == zombie)));
    }

    #[test]
    fn test_bite_on_dead_survivor_only_drains_health() {
        let mut bench = Bench::unlucky();
        let config = bench.config.clone();
        let survivor = bench.spawn(create_survivor(Point::ZERO, &config));
        bench.force(survivor, Mode::Survivor(SurvivorMode::Dead));
        bench.entity_mut(survivor).health = -5;
        bench.events.clear();

        assert_eq!(bench.ctx(EntityId(0)).bite(survivor), Some(-6));
        assert!(bench.events.is_empty());
    }
}
