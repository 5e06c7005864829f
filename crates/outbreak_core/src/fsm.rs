//! Generic finite-state machine every entity brain is built on.
//!
//! States are values of a closed enum per entity kind. Each state names
//! itself with a copyable tag, and transitions are requested by returning the
//! next tag from [`State::check`].

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// One behavior unit with four hook points.
pub trait State {
    /// Name of a state within its machine.
    type Tag: Copy + Eq + Hash + Debug;
    /// Mutable view of the world handed to every hook.
    type Context<'a>;

    fn tag(&self) -> Self::Tag;

    fn enter(&mut self, _ctx: &mut Self::Context<'_>) {}

    fn act(&mut self, _ctx: &mut Self::Context<'_>) {}

    /// Returns the tag to switch to, or `None` to stay.
    fn check(&mut self, _ctx: &mut Self::Context<'_>) -> Option<Self::Tag> {
        None
    }

    fn exit(&mut self, _ctx: &mut Self::Context<'_>) {}
}

/// Owns the states of one brain and tracks the active one.
#[derive(Debug)]
pub struct StateMachine<S: State> {
    states: HashMap<S::Tag, S>,
    active: Option<S::Tag>,
}

impl<S: State> Default for StateMachine<S> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
            active: None,
        }
    }
}

impl<S: State> StateMachine<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a state under its tag. Registering a tag twice keeps the
    /// last state.
    pub fn add_state(&mut self, state: S) {
        self.states.insert(state.tag(), state);
    }

    /// Builder form of [`add_state`](Self::add_state).
    #[must_use]
    pub fn with_state(mut self, state: S) -> Self {
        self.add_state(state);
        self
    }

    #[must_use]
    pub fn active(&self) -> Option<S::Tag> {
        self.active
    }

    #[must_use]
    pub fn active_state(&self) -> Option<&S> {
        self.active.and_then(|tag| self.states.get(&tag))
    }

    #[must_use]
    pub fn state(&self, tag: S::Tag) -> Option<&S> {
        self.states.get(&tag)
    }

    pub fn state_mut(&mut self, tag: S::Tag) -> Option<&mut S> {
        self.states.get_mut(&tag)
    }

    /// Exits the active state (if any) and enters `tag`. Re-entering the
    /// active tag runs the full exit/entry cycle.
    ///
    /// # Panics
    ///
    /// Panics if `tag` was never registered. That is an authoring mistake in
    /// a behavior graph, not a runtime condition.
    pub fn set_state(&mut self, tag: S::Tag, ctx: &mut S::Context<'_>) {
        assert!(
            self.states.contains_key(&tag),
            "state {tag:?} is not registered in this machine"
        );

        if let Some(current) = self.active.and_then(|t| self.states.get_mut(&t)) {
            current.exit(ctx);
        }

        tracing::trace!(from = ?self.active, to = ?tag, "State transition");
        self.active = Some(tag);

        if let Some(next) = self.states.get_mut(&tag) {
            next.enter(ctx);
        }
    }

    /// Runs one step: act, check, then at most one transition.
    ///
    /// Returns the tag entered this step, if any. A machine with no active
    /// state does nothing.
    pub fn think(&mut self, ctx: &mut S::Context<'_>) -> Option<S::Tag> {
        let current = self.active?;
        let state = self.states.get_mut(&current)?;

        state.act(ctx);
        let next = state.check(ctx)?;

        self.set_state(next, ctx);
        Some(next)
    }
}
