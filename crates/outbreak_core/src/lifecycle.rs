//! Entity lifecycle management: the entity record and the factories that
//! build each kind in its initial state.
//!
//! Factories only assemble the record. Registration and activation of the
//! initial state happen when the entity is spawned into a world.

use crate::behavior::{
    decay, hostile, projectile, spawner, survivor, Brain, DecayMode, HostileMode, Mode,
    ProjectileMode, SpawnerMode, SurvivorMode,
};
use crate::config::AppConfig;
use crate::locomotion::Steering;
use outbreak_data::{EntityId, Kind, Point, VisualHandle};

/// Kind-specific fields of a survivor.
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivorBody {
    pub ammo: u32,
    /// Hostile currently being fought or fled.
    pub threat: Option<EntityId>,
    pub pickup: Option<EntityId>,
    /// Simulation clock value until which evading may not be abandoned.
    pub evade_until: Option<f64>,
}

/// Kind tag plus the fields only that kind carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Spawner,
    Hostile { prey: Option<EntityId> },
    Survivor(SurvivorBody),
    Projectile { target: EntityId },
    Decay { opacity: u8 },
    Pickup,
}

impl Body {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Body::Spawner => Kind::Spawner,
            Body::Hostile { .. } => Kind::Hostile,
            Body::Survivor(_) => Kind::Protected,
            Body::Projectile { .. } => Kind::Projectile,
            Body::Decay { .. } => Kind::DecayEffect,
            Body::Pickup => Kind::Pickup,
        }
    }
}

/// A simulated actor owned by the registry.
#[derive(Debug)]
pub struct Entity {
    /// Assigned on registration; `EntityId(0)` until then.
    pub id: EntityId,
    pub position: Point,
    pub destination: Point,
    pub speed: f64,
    pub size: f64,
    pub health: i32,
    pub body: Body,
    pub brain: Brain,
    /// State entered when the entity is spawned.
    pub initial: Option<Mode>,
    pub steering: Steering,
    pub debug_mode: bool,
    pub visual: VisualHandle,
    pub draw_priority: i8,
}

impl Entity {
    fn new(body: Body, position: Point, brain: Brain, initial: Option<Mode>) -> Self {
        let kind = body.kind();
        Self {
            id: EntityId(0),
            position,
            destination: position,
            speed: 0.0,
            size: size_of(kind),
            health: 1,
            body,
            brain,
            initial,
            steering: Steering::default(),
            debug_mode: false,
            visual: default_visual(kind),
            draw_priority: draw_priority_of(kind),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.body.kind()
    }

    /// Active state of the brain, if it has been activated.
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        self.brain.mode()
    }

    #[must_use]
    pub fn survivor(&self) -> Option<&SurvivorBody> {
        match &self.body {
            Body::Survivor(s) => Some(s),
            _ => None,
        }
    }

    pub fn survivor_mut(&mut self) -> Option<&mut SurvivorBody> {
        match &mut self.body {
            Body::Survivor(s) => Some(s),
            _ => None,
        }
    }

    /// The entity this one is currently focused on, for debug overlays.
    #[must_use]
    pub fn focus(&self) -> Option<EntityId> {
        match &self.body {
            Body::Hostile { prey } => *prey,
            Body::Projectile { target } => Some(*target),
            Body::Survivor(s) => match self.mode() {
                Some(Mode::Survivor(SurvivorMode::Seeking)) => s.pickup,
                Some(Mode::Survivor(SurvivorMode::Dead)) => None,
                _ => s.threat,
            },
            Body::Spawner | Body::Decay { .. } | Body::Pickup => None,
        }
    }

    /// Builder-style override of the state entered on spawn.
    #[must_use]
    pub fn starting_in(mut self, mode: Option<Mode>) -> Self {
        self.initial = mode;
        self
    }

    #[must_use]
    pub fn heading_to(mut self, destination: Point) -> Self {
        self.destination = destination;
        self
    }
}

fn size_of(kind: Kind) -> f64 {
    match kind {
        Kind::Spawner => 10.0,
        Kind::Projectile => 0.2,
        Kind::Hostile | Kind::Protected | Kind::DecayEffect | Kind::Pickup => 1.0,
    }
}

fn default_visual(kind: Kind) -> VisualHandle {
    match kind {
        Kind::Spawner => VisualHandle::GRAVEYARD,
        Kind::Hostile => VisualHandle::ZOMBIE,
        Kind::Protected => VisualHandle::SURVIVOR,
        Kind::Projectile => VisualHandle::BULLET,
        Kind::DecayEffect => VisualHandle::BLOOD_SPLAT,
        Kind::Pickup => VisualHandle::SUPPLY_CRATE,
    }
}

fn draw_priority_of(kind: Kind) -> i8 {
    match kind {
        Kind::Spawner => 0,
        Kind::DecayEffect => 1,
        Kind::Pickup => 2,
        Kind::Hostile | Kind::Protected => 3,
        Kind::Projectile => 4,
    }
}

#[must_use]
pub fn create_spawner(position: Point) -> Entity {
    Entity::new(
        Body::Spawner,
        position,
        Brain::Spawner(spawner::machine()),
        Some(Mode::Spawner(SpawnerMode::Spawning)),
    )
}

#[must_use]
pub fn create_hostile(position: Point, config: &AppConfig) -> Entity {
    let mut entity = Entity::new(
        Body::Hostile { prey: None },
        position,
        Brain::Hostile(hostile::machine()),
        Some(Mode::Hostile(HostileMode::Wandering)),
    );
    entity.health = config.hostile.health;
    entity
}

#[must_use]
pub fn create_survivor(position: Point, config: &AppConfig) -> Entity {
    let mut entity = Entity::new(
        Body::Survivor(SurvivorBody {
            ammo: config.survivor.max_ammo,
            threat: None,
            pickup: None,
            evade_until: None,
        }),
        position,
        Brain::Survivor(survivor::machine()),
        Some(Mode::Survivor(SurvivorMode::Exploring)),
    );
    entity.health = config.survivor.max_health;
    entity
}

#[must_use]
pub fn create_projectile(position: Point, target: EntityId) -> Entity {
    Entity::new(
        Body::Projectile { target },
        position,
        Brain::Projectile(projectile::machine()),
        Some(Mode::Projectile(ProjectileMode::Seeking)),
    )
}

#[must_use]
pub fn create_decay(position: Point, config: &AppConfig) -> Entity {
    Entity::new(
        Body::Decay {
            opacity: config.decay.initial_opacity,
        },
        position,
        Brain::Decay(decay::machine()),
        Some(Mode::Decay(DecayMode::Fading)),
    )
}

/// Pickups have no behavior and never activate a brain.
#[must_use]
pub fn create_pickup(position: Point) -> Entity {
    Entity::new(Body::Pickup, position, Brain::Inert, None)
}

/// Builds the entity a player may buy, or `None` for kinds that cannot be
/// bought.
#[must_use]
pub fn create_purchasable(kind: Kind, position: Point, config: &AppConfig) -> Option<Entity> {
    match kind {
        Kind::Protected => Some(create_survivor(position, config)),
        Kind::Pickup => Some(create_pickup(position)),
        Kind::Spawner | Kind::Hostile | Kind::Projectile | Kind::DecayEffect => None,
    }
}
