//! The entity registry and its spatial queries.
//!
//! Queries scan the live entity map on every call; there is no index to keep
//! in sync while behaviors insert and remove entities mid-tick. Every radius
//! test is strict: an entity exactly `radius` away is outside.

use crate::behavior::Mode;
use crate::lifecycle::Entity;
use outbreak_data::{EntityId, Kind, Point};
use std::collections::BTreeMap;

/// Sole owner of every live entity.
///
/// Identities are handed out in increasing order and never reused, so
/// iterating the map visits entities in insertion order.
#[derive(Debug, Default)]
pub struct Registry {
    entities: BTreeMap<EntityId, Entity>,
    last_id: u64,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a fresh identity and takes ownership of the entity.
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        self.last_id += 1;
        let id = EntityId(self.last_id);
        entity.id = id;
        self.entities.insert(id, entity);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Position of a live entity.
    #[must_use]
    pub fn position_of(&self, id: EntityId) -> Option<Point> {
        self.get(id).map(|e| e.position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Snapshot of the live identities in iteration order.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Closest entity of `kind` strictly inside `radius` of `location`.
    ///
    /// Equal distances resolve to the entity visited first. That order is
    /// stable within a run but carries no meaning.
    #[must_use]
    pub fn nearest_of_kind(&self, kind: Kind, location: Point, radius: f64) -> Option<EntityId> {
        self.entities
            .values()
            .filter(|e| e.kind() == kind)
            .map(|e| (e.id, e.position.distance(location)))
            .filter(|&(_, d)| d < radius)
            .fold(None, |best: Option<(EntityId, f64)>, (id, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((id, d)),
            })
            .map(|(id, _)| id)
    }

    /// First entity in iteration order strictly inside `radius`.
    ///
    /// `kind: None` matches every kind. `exclude` skips one identity,
    /// typically the caller itself.
    #[must_use]
    pub fn first_of_kind(
        &self,
        kind: Option<Kind>,
        location: Point,
        radius: f64,
        exclude: Option<EntityId>,
    ) -> Option<EntityId> {
        self.entities
            .values()
            .filter(|e| Some(e.id) != exclude)
            .filter(|e| kind.map_or(true, |k| e.kind() == k))
            .find(|e| e.position.distance(location) < radius)
            .map(|e| e.id)
    }

    /// Like [`first_of_kind`](Self::first_of_kind) but the candidate's
    /// active state must be one of `modes`.
    #[must_use]
    pub fn first_of_kind_in_states(
        &self,
        kind: Kind,
        modes: &[Mode],
        location: Point,
        radius: f64,
    ) -> Option<EntityId> {
        self.entities
            .values()
            .filter(|e| e.kind() == kind)
            .filter(|e| e.mode().is_some_and(|m| modes.contains(&m)))
            .find(|e| e.position.distance(location) < radius)
            .map(|e| e.id)
    }

    #[must_use]
    pub fn count_of_kind(&self, kind: Kind) -> usize {
        self.entities.values().filter(|e| e.kind() == kind).count()
    }
}
