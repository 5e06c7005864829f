//! Graveyards: stationary sources of hostiles.

use super::Ctx;
use crate::fsm::{State, StateMachine};
use crate::lifecycle::create_hostile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnerMode {
    Spawning,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpawnerState {
    /// Releases a hostile whenever the clock passes `next_spawn`.
    Spawning { next_spawn: f64 },
}

impl State for SpawnerState {
    type Tag = SpawnerMode;
    type Context<'a> = Ctx<'a>;

    fn tag(&self) -> SpawnerMode {
        match self {
            SpawnerState::Spawning { .. } => SpawnerMode::Spawning,
        }
    }

    fn enter(&mut self, ctx: &mut Ctx<'_>) {
        let SpawnerState::Spawning { next_spawn } = self;
        *next_spawn = ctx.clock;
    }

    fn act(&mut self, ctx: &mut Ctx<'_>) {
        let SpawnerState::Spawning { next_spawn } = self;
        if ctx.clock < *next_spawn {
            return;
        }
        let Some(position) = ctx.position() else {
            return;
        };
        ctx.spawn(create_hostile(position, ctx.config));
        *next_spawn = ctx.clock + ctx.config.spawner.interval;
    }
}

#[must_use]
pub fn machine() -> StateMachine<SpawnerState> {
    StateMachine::new().with_state(SpawnerState::Spawning { next_spawn: 0.0 })
}
