//! Straight-line movement toward a destination with short-lived rerouting
//! away from crowded spots.

use crate::config::WorldConfig;
use crate::lifecycle::Entity;
use crate::registry::Registry;
use crate::rng::SimRng;
use outbreak_data::{Bounds, EntityId, Point};
use tracing::debug;

/// Per-entity avoidance bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Steering {
    /// Destination to restore once the redirect expires.
    previous: Option<Point>,
    /// Seconds left on the current redirect.
    timer: f64,
}

impl Steering {
    #[must_use]
    pub fn is_redirecting(&self) -> bool {
        self.previous.is_some()
    }

    #[must_use]
    pub fn remaining(&self) -> f64 {
        self.timer
    }

    #[must_use]
    pub fn previous(&self) -> Option<Point> {
        self.previous
    }
}

/// Runs avoidance, movement and clamping for one entity.
///
/// Entities that are stationary, already at their destination or no longer
/// registered are left alone.
pub fn advance(
    registry: &mut Registry,
    rng: &mut SimRng,
    id: EntityId,
    elapsed: f64,
    bounds: Bounds,
    world: &WorldConfig,
) {
    let Some(entity) = registry.get(id) else {
        return;
    };
    if entity.speed <= 0.0 || entity.position == entity.destination {
        return;
    }

    let blocker = if entity.steering.is_redirecting() {
        None
    } else {
        registry.first_of_kind(None, entity.position, world.avoidance_radius, Some(id))
    };

    let Some(entity) = registry.get_mut(id) else {
        return;
    };

    if let Some(blocker) = blocker {
        entity.steering.previous = Some(entity.destination);
        entity.steering.timer = world.avoidance_cooldown;
        entity.destination = rng.point_in(bounds);
        if entity.debug_mode {
            debug!(entity = %id, blocker = %blocker, "Too close, avoiding");
        }
    } else if entity.steering.is_redirecting() {
        entity.steering.timer -= elapsed;
        if entity.steering.timer <= 0.0 {
            if let Some(previous) = entity.steering.previous.take() {
                entity.destination = previous;
            }
            entity.steering.timer = 0.0;
            if entity.debug_mode {
                debug!(entity = %id, "Completed avoidance");
            }
        }
    }

    step(entity, elapsed, bounds);
}

/// Moves along the heading by at most `speed * elapsed`, landing exactly on
/// the destination when it is within reach, then clamps into bounds.
pub fn step(entity: &mut Entity, elapsed: f64, bounds: Bounds) {
    let to_destination = entity.destination - entity.position;
    let remaining = to_destination.length();

    if let Some(heading) = to_destination.normalize() {
        let travel = entity.speed * elapsed;
        entity.position = if travel >= remaining {
            entity.destination
        } else {
            entity.position + heading * travel
        };
    }

    entity.position = bounds.clamp(entity.position);
}
