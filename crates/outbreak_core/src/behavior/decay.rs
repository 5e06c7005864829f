//! Blood splats: fade out and disappear.

use super::Ctx;
use crate::fsm::{State, StateMachine};
use crate::lifecycle::Body;
use outbreak_data::RemovalCause;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecayMode {
    Fading,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecayState {
    Fading,
}

impl State for DecayState {
    type Tag = DecayMode;
    type Context<'a> = Ctx<'a>;

    fn tag(&self) -> DecayMode {
        DecayMode::Fading
    }

    fn enter(&mut self, ctx: &mut Ctx<'_>) {
        let full = ctx.config.decay.initial_opacity;
        if let Some(me) = ctx.me_mut() {
            me.body = Body::Decay { opacity: full };
        }
    }

    fn act(&mut self, ctx: &mut Ctx<'_>) {
        let step = ctx.config.decay.fade_step;
        let Some(me) = ctx.me_mut() else {
            return;
        };
        let Body::Decay { opacity } = &mut me.body else {
            return;
        };
        *opacity = opacity.saturating_sub(step);
        if *opacity == 0 {
            ctx.remove(ctx.me, RemovalCause::Faded);
        }
    }
}

#[must_use]
pub fn machine() -> StateMachine<DecayState> {
    StateMachine::new().with_state(DecayState::Fading)
}
