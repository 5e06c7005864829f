use super::entity::{EntityId, Kind};
use super::geometry::Point;
use serde::{Deserialize, Serialize};

/// Why an entity left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalCause {
    /// A projectile reached its target or lost it.
    Spent,
    /// Killed by a projectile.
    Shot,
    /// A pickup was collected.
    Collected,
    /// A decay effect finished fading.
    Faded,
    /// A downed survivor was consumed and turned.
    Consumed,
    /// Removed by the driver.
    External,
}

/// Something observable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    Spawned {
        id: EntityId,
        kind: Kind,
        position: Point,
        tick: u64,
    },
    Removed {
        id: EntityId,
        kind: Kind,
        cause: RemovalCause,
        tick: u64,
    },
    Fired {
        shooter: EntityId,
        target: EntityId,
        projectile: EntityId,
        tick: u64,
    },
    Downed {
        id: EntityId,
        by: EntityId,
        tick: u64,
    },
    Resupplied {
        id: EntityId,
        pickup: EntityId,
        tick: u64,
    },
    Converted {
        from: EntityId,
        into: EntityId,
        position: Point,
        tick: u64,
    },
}

impl SimEvent {
    #[must_use]
    pub fn tick(&self) -> u64 {
        match self {
            SimEvent::Spawned { tick, .. }
            | SimEvent::Removed { tick, .. }
            | SimEvent::Fired { tick, .. }
            | SimEvent::Downed { tick, .. }
            | SimEvent::Resupplied { tick, .. }
            | SimEvent::Converted { tick, .. } => *tick,
        }
    }

    /// Short human-readable line for event logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            SimEvent::Spawned { id, kind, .. } => format!("{kind} {id} appeared"),
            SimEvent::Removed { id, kind, cause, .. } => match cause {
                RemovalCause::Shot => format!("{kind} {id} was shot down"),
                RemovalCause::Collected => format!("{kind} {id} was collected"),
                RemovalCause::Consumed => format!("{kind} {id} was consumed"),
                RemovalCause::Spent | RemovalCause::Faded | RemovalCause::External => {
                    format!("{kind} {id} removed")
                }
            },
            SimEvent::Fired { shooter, target, .. } => format!("{shooter} fired at {target}"),
            SimEvent::Downed { id, by, .. } => format!("{id} was downed by {by}"),
            SimEvent::Resupplied { id, .. } => format!("{id} resupplied"),
            SimEvent::Converted { from, into, .. } => format!("{from} turned into {into}"),
        }
    }
}
