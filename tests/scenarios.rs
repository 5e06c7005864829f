mod common;

use common::{mode_of, run_until, WorldBuilder};
use outbreak_core::behavior::{HostileMode, SurvivorMode};
use outbreak_core::lifecycle::create_projectile;
use outbreak_core::Mode;
use outbreak_data::{EntityId, Kind, Point, RemovalCause, SimEvent};

const DT: f64 = 1.0 / 30.0;

fn removed_with(events: &[SimEvent], id: EntityId, cause: RemovalCause) -> bool {
    events.iter().any(|e| {
        matches!(e, SimEvent::Removed { id: removed, cause: c, .. } if *removed == id && *c == cause)
    })
}

#[test]
fn test_avoidance_redirects_then_restores() {
    let target = Point::new(151.0, 100.0);
    let mut world = WorldBuilder::new()
        .with_config(|c| {
            c.world.avoidance_radius = 2.0;
            c.world.avoidance_cooldown = 0.2;
        })
        .with_pickup(100.0, 100.0)
        .with_pickup(101.0, 100.0)
        .build();
    let (walker, blocker) = (EntityId(1), EntityId(2));
    {
        let e = world.get_mut(walker).unwrap();
        e.destination = target;
        e.speed = 10.0;
    }

    world.tick(0.1).unwrap();
    let e = world.get(walker).unwrap();
    assert_ne!(e.destination, target, "a close neighbor should force a detour");
    assert!(e.steering.is_redirecting());
    assert_eq!(e.steering.previous(), Some(target));

    world.remove(blocker);
    world.tick(0.25).unwrap();
    let e = world.get(walker).unwrap();
    assert_eq!(e.destination, target);
    assert!(!e.steering.is_redirecting());
}

#[test]
fn test_projectile_kills_hostile_and_leaves_blood() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.world.avoidance_radius = 1.0)
        .with_hostile(300.0, 300.0)
        .with_modifier(|w| {
            w.get_mut(EntityId(1)).unwrap().health = 1;
            w.spawn(create_projectile(Point::new(200.0, 300.0), EntityId(1)));
        })
        .build();
    let (zombie, bullet) = (EntityId(1), EntityId(2));

    let events = run_until(&mut world, DT, 120, |w| w.get(bullet).is_none());

    assert_entity_removed!(world, bullet);
    assert_entity_removed!(world, zombie);
    assert!(removed_with(&events, zombie, RemovalCause::Shot));
    assert!(removed_with(&events, bullet, RemovalCause::Spent));
    assert_eq!(world.registry().count_of_kind(Kind::DecayEffect), 1);
    assert_population!(world, hostiles = 0, survivors = 0);
}

#[test]
fn test_projectile_without_target_is_spent() {
    let mut world = WorldBuilder::new()
        .with_hostile(300.0, 300.0)
        .with_modifier(|w| {
            w.spawn(create_projectile(Point::new(100.0, 100.0), EntityId(1)));
            w.remove(EntityId(1));
        })
        .build();

    let events = world.tick(DT).unwrap();
    assert!(removed_with(&events, EntityId(2), RemovalCause::Spent));
    assert!(world.registry().is_empty());
}

#[test]
fn test_downed_survivor_is_eaten_and_turns() {
    let mut world = WorldBuilder::new()
        .with_config(|c| {
            c.survivor.regen_chance = 0.0;
            c.world.consumed_threshold = -5;
        })
        .with_survivor(200.0, 200.0)
        .with_hostile(205.0, 200.0)
        .with_modifier(|w| {
            w.get_mut(EntityId(1)).unwrap().health = 0;
            w.set_mode(EntityId(1), Mode::Survivor(SurvivorMode::Dead));
        })
        .build();
    let (victim, zombie) = (EntityId(1), EntityId(2));

    world.tick(DT).unwrap();
    assert_mode!(world, zombie, Mode::Hostile(HostileMode::Feeding));

    let events = run_until(&mut world, DT, 20, |w| w.get(victim).is_none());

    assert_entity_removed!(world, victim);
    assert!(removed_with(&events, victim, RemovalCause::Consumed));
    let converted = events
        .iter()
        .find_map(|e| match e {
            SimEvent::Converted { from, into, position, .. } => Some((*from, *into, *position)),
            _ => None,
        })
        .expect("no conversion event");
    assert_eq!(converted.0, victim);
    assert_eq!(converted.2, Point::new(200.0, 200.0));
    assert_mode!(world, converted.1, Mode::Hostile(HostileMode::Wandering));
    assert_population!(world, hostiles = 2, survivors = 0);

    world.tick(DT).unwrap();
    assert_mode!(world, zombie, Mode::Hostile(HostileMode::Wandering));
}

#[test]
fn test_hurt_survivor_walks_to_supply_crate() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.world.avoidance_radius = 1.0)
        .with_survivor(100.0, 100.0)
        .with_pickup(120.0, 100.0)
        .with_modifier(|w| {
            let survivor = w.get_mut(EntityId(1)).unwrap();
            survivor.health = 5;
            survivor.survivor_mut().unwrap().ammo = 2;
        })
        .build();
    let (survivor, crate_id) = (EntityId(1), EntityId(2));

    world.tick(DT).unwrap();
    assert_mode!(world, survivor, Mode::Survivor(SurvivorMode::Seeking));

    let events = run_until(&mut world, DT, 100, |w| w.get(crate_id).is_none());

    assert_entity_removed!(world, crate_id);
    assert!(removed_with(&events, crate_id, RemovalCause::Collected));
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::Resupplied { id, pickup, .. } if *id == survivor && *pickup == crate_id)));
    let s = world.get(survivor).unwrap();
    assert_eq!(s.health, world.config.survivor.max_health);
    assert_eq!(s.survivor().unwrap().ammo, world.config.survivor.max_ammo);
    assert_eq!(mode_of(&world, survivor), Some(Mode::Survivor(SurvivorMode::Exploring)));
}

#[test]
fn test_healthy_survivor_ignores_crate() {
    let mut world = WorldBuilder::new()
        .with_survivor(100.0, 100.0)
        .with_pickup(120.0, 100.0)
        .build();

    world.tick(DT).unwrap();
    assert_mode!(world, EntityId(1), Mode::Survivor(SurvivorMode::Exploring));
    assert_entity_alive!(world, EntityId(2));
}

#[test]
fn test_graveyard_releases_hostiles_on_interval() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.world.spawner_count = 1)
        .build();

    world.tick(0.5).unwrap();
    assert_population!(world, hostiles = 1, survivors = 0);

    for _ in 0..19 {
        world.tick(0.5).unwrap();
    }
    assert_population!(world, hostiles = 1, survivors = 0);

    world.tick(0.5).unwrap();
    assert_population!(world, hostiles = 2, survivors = 0);
}

#[test]
fn test_purchases_respect_supply() {
    let mut world = WorldBuilder::new()
        .with_config(|c| {
            c.world.initial_supply = 4.0;
            c.world.supply_rate = 0.0;
        })
        .build();

    let first = world.spawn_if_affordable(Kind::Protected, Point::new(50.0, 50.0));
    assert!(first.is_some());
    assert!((world.supply() - 1.0).abs() < 1e-9);

    assert!(world
        .spawn_if_affordable(Kind::Protected, Point::new(60.0, 60.0))
        .is_none());
    assert!(world
        .spawn_if_affordable(Kind::Pickup, Point::new(70.0, 70.0))
        .is_some());
    assert!(world.supply().abs() < 1e-9);
    assert!(world
        .spawn_if_affordable(Kind::Hostile, Point::new(80.0, 80.0))
        .is_none());

    let events = world.tick(DT).unwrap();
    let spawned = events
        .iter()
        .filter(|e| matches!(e, SimEvent::Spawned { .. }))
        .count();
    assert_eq!(spawned, 2);
}

#[test]
fn test_debug_overlay_follows_world_flag() {
    let mut world = WorldBuilder::new().with_survivor(100.0, 100.0).build();
    assert!(world.render_items()[0].debug.is_none());

    world.set_debug_mode(true);
    let id = world
        .spawn_if_affordable(Kind::Pickup, Point::new(10.0, 10.0));
    assert!(id.is_none(), "no supply in an empty world");
    world.spawn(outbreak_core::lifecycle::create_pickup(Point::new(10.0, 10.0)));

    let items = world.render_items();
    assert!(items.iter().all(|item| item.debug.is_some()));
    let survivor = items.iter().find(|i| i.kind == Kind::Protected).unwrap();
    let overlay = survivor.debug.as_ref().unwrap();
    assert_eq!(overlay.label, "ex");
    assert_eq!(overlay.stats.as_deref(), Some("hp 10 ammo 10"));
}
