//! The simulation driver: owns the registry, the economy and the random
//! source, and advances everything one tick at a time.

use crate::behavior::{Ctx, Mode, SurvivorMode};
use crate::config::AppConfig;
use crate::economy::{self, Economy};
use crate::error::SimError;
use crate::lifecycle::{create_hostile, create_purchasable, create_spawner, create_survivor, Body, Entity};
use crate::metrics::{counters, Metrics};
use crate::registry::Registry;
use crate::rng::SimRng;
use outbreak_data::{
    Bounds, DebugOverlay, EntityId, HudStats, Kind, Point, RemovalCause, RenderItem, SimEvent,
};
use std::time::Instant;
use tracing::{debug, info};

/// A running simulation.
#[derive(Debug)]
pub struct World {
    pub config: AppConfig,
    registry: Registry,
    economy: Economy,
    rng: SimRng,
    bounds: Bounds,
    clock: f64,
    tick: u64,
    debug_mode: bool,
    /// Events raised between ticks, returned with the next tick.
    pending: Vec<SimEvent>,
    metrics: Metrics,
}

impl World {
    /// Validates the configuration and populates a new world, seeding the
    /// random source from `world.seed` when present.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let rng = SimRng::from_seed_option(config.world.seed);
        Self::with_rng(config, rng)
    }

    /// Like [`World::new`] with an explicit random source.
    pub fn with_rng(config: AppConfig, rng: SimRng) -> anyhow::Result<Self> {
        config.validate()?;
        let bounds = Bounds::new(f64::from(config.world.width), f64::from(config.world.height));
        let mut world = Self {
            economy: Economy::from_config(&config),
            registry: Registry::new(),
            rng,
            bounds,
            clock: 0.0,
            tick: 0,
            debug_mode: false,
            pending: Vec::new(),
            metrics: Metrics::new(),
            config,
        };
        world.populate();
        info!(
            width = world.config.world.width,
            height = world.config.world.height,
            spawners = world.config.world.spawner_count,
            survivors = world.config.world.initial_survivors,
            fingerprint = %world.config.fingerprint(),
            "World created"
        );
        Ok(world)
    }

    fn populate(&mut self) {
        for _ in 0..self.config.world.spawner_count {
            let at = self.rng.point_in(self.bounds);
            self.spawn(create_spawner(at));
        }
        for _ in 0..self.config.world.initial_survivors {
            let at = self.rng.point_in(self.bounds);
            let survivor = create_survivor(at, &self.config);
            self.spawn(survivor);
        }
    }

    fn context<'w>(&'w mut self, me: EntityId, events: &'w mut Vec<SimEvent>) -> Ctx<'w> {
        Ctx {
            me,
            registry: &mut self.registry,
            rng: &mut self.rng,
            config: &self.config,
            bounds: self.bounds,
            clock: self.clock,
            tick: self.tick,
            debug_mode: self.debug_mode,
            events,
        }
    }

    /// Advances the simulation by `elapsed` seconds.
    ///
    /// Every entity alive at the start of the tick thinks and then moves, in
    /// identity order. Entities removed earlier in the same tick are skipped
    /// and entities created during the tick first act on the next one.
    pub fn tick(&mut self, elapsed: f64) -> Result<Vec<SimEvent>, SimError> {
        if !elapsed.is_finite() || elapsed < 0.0 {
            return Err(SimError::InvalidElapsed(elapsed));
        }
        let started = Instant::now();

        self.tick += 1;
        self.clock += elapsed;
        self.economy.accrue(elapsed);

        let mut events = std::mem::take(&mut self.pending);
        for id in self.registry.ids() {
            if !self.registry.contains(id) {
                continue;
            }
            let mut ctx = self.context(id, &mut events);
            ctx.with_brain(id, |brain, ctx| brain.think(ctx));
            ctx.steer(elapsed);
        }
        self.convert_consumed(&mut events);

        self.record(&events, started);
        Ok(events)
    }

    /// [`tick`](Self::tick) for drivers that measure frames in milliseconds.
    pub fn tick_millis(&mut self, millis: u64) -> Result<Vec<SimEvent>, SimError> {
        self.tick(millis as f64 / 1000.0)
    }

    /// Replaces every survivor consumed past the threshold with a fresh
    /// wandering hostile at the same spot.
    fn convert_consumed(&mut self, events: &mut Vec<SimEvent>) {
        let threshold = self.config.world.consumed_threshold;
        let consumed: Vec<(EntityId, Point)> = self
            .registry
            .iter()
            .filter(|e| e.kind() == Kind::Protected && e.health <= threshold)
            .map(|e| (e.id, e.position))
            .collect();

        for (from, position) in consumed {
            let mut ctx = self.context(from, events);
            ctx.remove(from, RemovalCause::Consumed);
            let into = ctx.spawn(create_hostile(position, ctx.config));
            debug!(from = %from, into = %into, "Survivor turned");
            ctx.events.push(SimEvent::Converted {
                from,
                into,
                position,
                tick: ctx.tick,
            });
        }
    }

    fn record(&self, events: &[SimEvent], started: Instant) {
        for event in events {
            let counter = match event {
                SimEvent::Spawned { .. } => counters::SPAWNED,
                SimEvent::Removed { .. } => counters::REMOVED,
                SimEvent::Fired { .. } => counters::SHOTS,
                SimEvent::Converted { .. } => counters::CONVERSIONS,
                SimEvent::Downed { .. } | SimEvent::Resupplied { .. } => continue,
            };
            self.metrics.increment_counter(counter);
        }
        self.metrics.record_tick(
            started.elapsed(),
            self.registry.len(),
            self.registry.count_of_kind(Kind::Hostile),
            self.registry.count_of_kind(Kind::Protected),
        );
    }

    /// Registers an entity and enters its initial state. The entity inherits
    /// the world's debug flag and is clamped into bounds.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let mut events = std::mem::take(&mut self.pending);
        let id = self.context(entity.id, &mut events).spawn(entity);
        self.pending = events;
        id
    }

    /// Spawns a purchasable kind at `location` if the supply covers its
    /// cost. Anything else, or a budget that falls short, does nothing.
    pub fn spawn_if_affordable(&mut self, kind: Kind, location: Point) -> Option<EntityId> {
        let cost = economy::cost_of(kind, &self.config)?;
        let entity = create_purchasable(kind, self.bounds.clamp(location), &self.config)?;
        if !self.economy.try_spend(cost) {
            debug!(kind = %kind, supply = self.economy.supply(), "Cannot afford spawn");
            return None;
        }
        Some(self.spawn(entity))
    }

    /// Removes an entity on the driver's behalf.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let mut events = std::mem::take(&mut self.pending);
        let removed = self.context(id, &mut events).remove(id, RemovalCause::External);
        self.pending = events;
        removed
    }

    /// Forces an entity's brain into `mode`, running exit and entry hooks.
    ///
    /// # Panics
    ///
    /// Panics if `mode` belongs to another kind of entity.
    pub fn set_mode(&mut self, id: EntityId, mode: Mode) {
        let mut events = std::mem::take(&mut self.pending);
        self.context(id, &mut events)
            .with_brain(id, |brain, ctx| brain.set_mode(mode, ctx));
        self.pending = events;
    }

    /// Toggles debug overlays on every entity. Behavior is unaffected.
    pub fn set_debug_mode(&mut self, on: bool) {
        self.debug_mode = on;
        for entity in self.registry.iter_mut() {
            entity.debug_mode = on;
        }
    }

    #[must_use]
    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.registry.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.registry.get_mut(id)
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn supply(&self) -> f64 {
        self.economy.supply()
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Simulated seconds since creation.
    #[must_use]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn hud(&self) -> HudStats {
        HudStats {
            hostiles: self.registry.count_of_kind(Kind::Hostile),
            survivors: self.registry.count_of_kind(Kind::Protected),
            supply: self.economy.whole_supply(),
        }
    }

    /// Everything a renderer needs for one frame, lowest draw priority first.
    #[must_use]
    pub fn render_items(&self) -> Vec<RenderItem> {
        let mut items: Vec<RenderItem> = self.registry.iter().map(|e| self.render_item(e)).collect();
        items.sort_by_key(|item| (item.draw_priority, item.id));
        items
    }

    fn render_item(&self, entity: &Entity) -> RenderItem {
        let mode = entity.mode();
        let (opacity, caution, stats) = match &entity.body {
            Body::Decay { opacity } => (*opacity, false, None),
            Body::Survivor(s) => (
                u8::MAX,
                s.ammo == 0 && mode != Some(Mode::Survivor(SurvivorMode::Dead)),
                Some(format!("hp {} ammo {}", entity.health, s.ammo)),
            ),
            Body::Hostile { .. } => (u8::MAX, false, Some(format!("hp {}", entity.health))),
            Body::Spawner | Body::Projectile { .. } | Body::Pickup => (u8::MAX, false, None),
        };

        let debug = entity.debug_mode.then(|| DebugOverlay {
            label: mode.map(Mode::short).unwrap_or_default(),
            stats,
            target: entity.focus().and_then(|id| self.registry.position_of(id)),
        });

        RenderItem {
            id: entity.id,
            kind: entity.kind(),
            position: entity.position,
            size: entity.size,
            visual: entity.visual,
            draw_priority: entity.draw_priority,
            opacity,
            caution,
            debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::HostileMode;
    use crate::config::WorldConfig;
    use crate::lifecycle::create_pickup;
    use rand::rngs::mock::StepRng;

    fn empty_config() -> AppConfig {
        AppConfig {
            world: WorldConfig {
                spawner_count: 0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn empty_world() -> World {
        World::with_rng(empty_config(), SimRng::seeded(5)).unwrap()
    }

    #[test]
    fn test_entity_removed_earlier_in_tick_is_skipped() {
        let mut world = empty_world();
        let at = Point::new(300.0, 300.0);
        let bullet = world.spawn(crate::lifecycle::create_projectile(at, EntityId(2)));
        let zombie = world.spawn(create_hostile(at, &world.config.clone()));
        assert_eq!(zombie, EntityId(2));
        world.get_mut(zombie).unwrap().health = 1;

        world.tick(1.0 / 30.0).unwrap();

        assert!(world.get(bullet).is_none());
        assert!(world.get(zombie).is_none());
        let splats: Vec<&Entity> = world
            .registry()
            .iter()
            .filter(|e| e.kind() == Kind::DecayEffect)
            .collect();
        assert_eq!(splats.len(), 1);
        assert_eq!(splats[0].position, at);
        // Created mid-tick, so it has not faded yet.
        assert!(matches!(splats[0].body, Body::Decay { opacity: 255 }));
    }

    #[test]
    fn test_entity_spawned_mid_tick_waits_for_next_tick() {
        let mut world = empty_world();
        let at = Point::new(120.0, 80.0);
        world.spawn(create_spawner(at));

        world.tick(1.0).unwrap();

        let zombie = world
            .registry()
            .iter()
            .find(|e| e.kind() == Kind::Hostile)
            .expect("graveyard should release a zombie on its first tick");
        assert_eq!(zombie.position, at);
        assert!(zombie.speed > 0.0);
    }

    #[test]
    fn test_new_world_places_spawners() {
        let world = World::with_rng(AppConfig::default(), SimRng::seeded(1)).unwrap();
        assert_eq!(world.registry().count_of_kind(Kind::Spawner), 3);
        assert_eq!(world.supply(), 20.0);
        assert_eq!(world.hud().supply, 20);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = empty_config();
        config.world.width = 0;
        assert!(World::with_rng(config, SimRng::seeded(1)).is_err());
    }

    #[test]
    fn test_rejects_bad_elapsed() {
        let mut world = empty_world();
        assert_eq!(world.tick(-0.1), Err(SimError::InvalidElapsed(-0.1)));
        assert!(world.tick(f64::NAN).is_err());
        assert!(world.tick(f64::INFINITY).is_err());
        assert_eq!(world.tick_count(), 0);
    }

    #[test]
    fn test_tick_advances_clock_and_supply() {
        let mut world = empty_world();
        world.tick(2.0).unwrap();
        world.tick_millis(500).unwrap();
        assert_eq!(world.tick_count(), 2);
        assert!((world.clock() - 2.5).abs() < 1e-12);
        assert!((world.supply() - 21.25).abs() < 1e-12);
    }

    #[test]
    fn test_spawn_if_affordable_deducts_cost() {
        let mut world = empty_world();
        let id = world.spawn_if_affordable(Kind::Protected, Point::new(10.0, 10.0));
        assert!(id.is_some());
        assert_eq!(world.supply(), 17.0);
        assert!(world.spawn_if_affordable(Kind::Pickup, Point::new(20.0, 10.0)).is_some());
        assert_eq!(world.supply(), 16.0);
    }

    #[test]
    fn test_spawn_if_affordable_is_silent_when_broke() {
        let mut config = empty_config();
        config.world.initial_supply = 2.0;
        let mut world = World::with_rng(config, SimRng::seeded(5)).unwrap();
        assert_eq!(world.spawn_if_affordable(Kind::Protected, Point::ZERO), None);
        assert_eq!(world.supply(), 2.0);
        assert!(world.registry().is_empty());
    }

    #[test]
    fn test_spawn_if_affordable_refuses_free_kinds() {
        let mut world = empty_world();
        assert_eq!(world.spawn_if_affordable(Kind::Hostile, Point::ZERO), None);
        assert_eq!(world.supply(), 20.0);
    }

    #[test]
    fn test_spawn_location_is_clamped() {
        let mut world = empty_world();
        let id = world.spawn_if_affordable(Kind::Pickup, Point::new(5000.0, -3.0)).unwrap();
        assert_eq!(world.get(id).unwrap().position, Point::new(800.0, 0.0));
    }

    #[test]
    fn test_spawn_events_arrive_with_next_tick() {
        let mut world = empty_world();
        let id = world.spawn(create_pickup(Point::new(1.0, 1.0)));
        let events = world.tick(0.1).unwrap();
        assert!(matches!(events[0], SimEvent::Spawned { id: e, kind: Kind::Pickup, .. } if e == id));
        assert!(world.tick(0.1).unwrap().is_empty());
    }

    #[test]
    fn test_debug_mode_propagates_and_is_inherited() {
        let mut world = empty_world();
        let before = world.spawn(create_pickup(Point::new(1.0, 1.0)));
        world.set_debug_mode(true);
        let after = world.spawn(create_pickup(Point::new(2.0, 1.0)));
        assert!(world.get(before).unwrap().debug_mode);
        assert!(world.get(after).unwrap().debug_mode);
        assert!(world.render_items().iter().all(|item| item.debug.is_some()));

        world.set_debug_mode(false);
        assert!(world.render_items().iter().all(|item| item.debug.is_none()));
    }

    #[test]
    fn test_render_items_are_ordered_by_priority() {
        let mut world = empty_world();
        let config = world.config.clone();
        world.spawn(create_hostile(Point::new(1.0, 1.0), &config));
        world.spawn(create_spawner(Point::new(5.0, 5.0)));
        world.spawn(create_pickup(Point::new(9.0, 9.0)));
        let kinds: Vec<Kind> = world.render_items().iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![Kind::Spawner, Kind::Pickup, Kind::Hostile]);
    }

    #[test]
    fn test_debug_overlay_shows_state_label() {
        let mut world = World::with_rng(empty_config(), SimRng::from_rng(StepRng::new(u64::MAX, 0))).unwrap();
        let config = world.config.clone();
        world.set_debug_mode(true);
        let id = world.spawn(create_hostile(Point::new(1.0, 1.0), &config));
        let item = world.render_items().into_iter().find(|i| i.id == id).unwrap();
        let overlay = item.debug.unwrap();
        assert_eq!(overlay.label, "wa");
        assert_eq!(overlay.stats.as_deref(), Some("hp 3"));
    }

    #[test]
    fn test_caution_flag_for_empty_magazine() {
        let mut world = empty_world();
        let config = world.config.clone();
        let id = world.spawn(create_survivor(Point::new(1.0, 1.0), &config));
        world.get_mut(id).unwrap().survivor_mut().unwrap().ammo = 0;
        assert!(world.render_items()[0].caution);
        world.set_mode(id, Mode::Survivor(SurvivorMode::Dead));
        assert!(!world.render_items()[0].caution);
    }

    #[test]
    fn test_consumed_survivor_turns() {
        let mut world = empty_world();
        let config = world.config.clone();
        let at = Point::new(50.0, 50.0);
        let id = world.spawn(create_survivor(at, &config).starting_in(None));
        world.get_mut(id).unwrap().health = -200;

        let events = world.tick(0.0).unwrap();
        assert!(world.get(id).is_none());
        let into = events
            .iter()
            .find_map(|e| match e {
                SimEvent::Converted { from, into, .. } if *from == id => Some(*into),
                _ => None,
            })
            .expect("conversion event");
        let hostile = world.get(into).unwrap();
        assert_eq!(hostile.position, at);
        assert_eq!(hostile.mode(), Some(Mode::Hostile(HostileMode::Wandering)));
        assert_eq!(world.metrics().counter(counters::CONVERSIONS), 1);
    }

    #[test]
    fn test_remove_reports_external_cause() {
        let mut world = empty_world();
        let id = world.spawn(create_pickup(Point::ZERO));
        assert!(world.remove(id).is_some());
        assert!(world.remove(id).is_none());
        let events = world.tick(0.0).unwrap();
        assert!(events.iter().any(|e| matches!(
            e,
            SimEvent::Removed { cause: RemovalCause::External, .. }
        )));
    }
}
