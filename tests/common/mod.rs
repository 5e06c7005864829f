pub mod macros;

use outbreak_core::lifecycle::{self, Entity};
use outbreak_core::{AppConfig, Mode, SimRng, World};
use outbreak_data::{EntityId, Point, SimEvent};
use rand::RngCore;

type WorldMod = Box<dyn FnOnce(&mut World)>;

/// Builds an empty, seeded world: no graveyards, no survivors, no supply.
#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    rng: Option<SimRng>,
    entities: Vec<Entity>,
    mods: Vec<WorldMod>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.seed = Some(42);
        config.world.spawner_count = 0;
        config.world.initial_survivors = 0;
        config.world.initial_supply = 0.0;
        Self {
            config,
            rng: None,
            entities: Vec::new(),
            mods: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Replaces the seeded generator, e.g. with a `StepRng`.
    pub fn with_rng<R: RngCore + Send + 'static>(mut self, rng: R) -> Self {
        self.rng = Some(SimRng::from_rng(rng));
        self
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_hostile(self, x: f64, y: f64) -> Self {
        let entity = lifecycle::create_hostile(Point::new(x, y), &self.config);
        self.with_entity(entity)
    }

    pub fn with_survivor(self, x: f64, y: f64) -> Self {
        let entity = lifecycle::create_survivor(Point::new(x, y), &self.config);
        self.with_entity(entity)
    }

    pub fn with_pickup(self, x: f64, y: f64) -> Self {
        self.with_entity(lifecycle::create_pickup(Point::new(x, y)))
    }

    pub fn with_modifier<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut World) + 'static,
    {
        self.mods.push(Box::new(modifier));
        self
    }

    /// Entities are spawned in the order they were added, so their ids
    /// count up from 1.
    pub fn build(self) -> World {
        let mut world = match self.rng {
            Some(rng) => World::with_rng(self.config, rng),
            None => World::new(self.config),
        }
        .expect("Failed to create world in test builder");

        for e in self.entities {
            world.spawn(e);
        }
        for modifier in self.mods {
            modifier(&mut world);
        }
        world
    }
}

/// Ticks until `done` holds or `max_ticks` pass, collecting every event.
#[allow(dead_code)]
pub fn run_until<F>(world: &mut World, dt: f64, max_ticks: usize, mut done: F) -> Vec<SimEvent>
where
    F: FnMut(&World) -> bool,
{
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        events.extend(world.tick(dt).expect("tick failed"));
        if done(world) {
            break;
        }
    }
    events
}

#[allow(dead_code)]
pub fn mode_of(world: &World, id: EntityId) -> Option<Mode> {
    world.get(id).and_then(Entity::mode)
}
