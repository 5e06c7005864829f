//! The supply budget that gates player-requested spawns.

use crate::config::AppConfig;
use outbreak_data::Kind;

/// A non-negative scalar budget that grows with simulated time.
#[derive(Debug, Clone, PartialEq)]
pub struct Economy {
    supply: f64,
    rate: f64,
}

impl Economy {
    #[must_use]
    pub fn new(initial: f64, rate: f64) -> Self {
        Self {
            supply: initial.max(0.0),
            rate,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.world.initial_supply, config.world.supply_rate)
    }

    #[must_use]
    pub fn supply(&self) -> f64 {
        self.supply
    }

    /// Supply rounded down to whole units, as shown to the player.
    #[must_use]
    pub fn whole_supply(&self) -> u32 {
        self.supply.floor() as u32
    }

    pub fn accrue(&mut self, elapsed: f64) {
        self.supply += elapsed * self.rate;
    }

    #[must_use]
    pub fn can_afford(&self, cost: f64) -> bool {
        self.supply - cost >= 0.0
    }

    /// Deducts `cost` if affordable. Leaves the budget untouched otherwise.
    pub fn try_spend(&mut self, cost: f64) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.supply = (self.supply - cost).max(0.0);
        true
    }
}

/// Price of a purchasable kind, or `None` if players cannot buy it.
#[must_use]
pub fn cost_of(kind: Kind, config: &AppConfig) -> Option<f64> {
    match kind {
        Kind::Protected => Some(config.survivor.supply_cost),
        Kind::Pickup => Some(config.pickup.supply_cost),
        Kind::Spawner | Kind::Hostile | Kind::Projectile | Kind::DecayEffect => None,
    }
}
