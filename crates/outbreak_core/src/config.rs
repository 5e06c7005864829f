//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every gameplay constant of the behavior graphs is a
//! named value here; none of them is a behavioral contract.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults, any section may be partial)
//! 3. Command line flags (`--seed`)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 800
//! height = 600
//! seed = 42
//! spawner_count = 3
//!
//! [survivor]
//! sense_radius = 100.0
//! fire_chance = 0.05
//!
//! [hostile.seek_speed]
//! base = 30.0
//! jitter = 15.0
//! ```

use serde::{Deserialize, Serialize};

/// A speed picked on state entry: `base` plus a uniform offset in
/// `[-jitter, jitter]`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SpeedRange {
    pub base: f64,
    #[serde(default)]
    pub jitter: f64,
}

impl SpeedRange {
    #[must_use]
    pub const fn fixed(base: f64) -> Self {
        Self { base, jitter: 0.0 }
    }

    #[must_use]
    pub const fn new(base: f64, jitter: f64) -> Self {
        Self { base, jitter }
    }
}

/// World-level simulation configuration.
///
/// Dimensions of the logical area, initial population, the supply economy
/// and the shared locomotion constants.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u16,
    pub height: u16,
    pub seed: Option<u64>,
    pub spawner_count: usize,
    pub initial_survivors: usize,
    pub initial_supply: f64,
    /// Supply gained per simulated second.
    pub supply_rate: f64,
    pub avoidance_radius: f64,
    /// Seconds an entity keeps a redirected destination.
    pub avoidance_cooldown: f64,
    /// Health at or below which a downed survivor turns.
    pub consumed_threshold: i32,
    /// Distance kept from the far edges when picking an evasion point.
    pub edge_margin: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            seed: None,
            spawner_count: 3,
            initial_survivors: 0,
            initial_supply: 20.0,
            supply_rate: 0.5,
            avoidance_radius: 10.0,
            avoidance_cooldown: 0.2,
            consumed_threshold: -200,
            edge_margin: 5.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SurvivorConfig {
    pub max_health: i32,
    pub max_ammo: u32,
    pub explore_speed: SpeedRange,
    pub evade_speed: SpeedRange,
    pub sense_radius: f64,
    /// Radius used when re-acquiring a threat to run from.
    pub evade_radius: f64,
    pub pickup_radius: f64,
    pub pickup_reach: f64,
    pub redirect_chance: f64,
    pub fire_chance: f64,
    /// Chance per tick of falling back from attacking while ammo remains.
    pub fallback_chance: f64,
    pub fallback_window: f64,
    pub reacquire_chance: f64,
    pub regen_chance: f64,
    pub regen_amount: i32,
    pub evade_jitter: f64,
    pub supply_cost: f64,
}

impl Default for SurvivorConfig {
    fn default() -> Self {
        Self {
            max_health: 10,
            max_ammo: 10,
            explore_speed: SpeedRange::new(40.0, 10.0),
            evade_speed: SpeedRange::new(70.0, 10.0),
            sense_radius: 100.0,
            evade_radius: 115.0,
            pickup_radius: 80.0,
            pickup_reach: 5.0,
            redirect_chance: 1.0 / 200.0,
            fire_chance: 1.0 / 30.0,
            fallback_chance: 1.0 / 50.0,
            fallback_window: 2.0,
            reacquire_chance: 0.1,
            regen_chance: 0.1,
            regen_amount: 5,
            evade_jitter: 20.0,
            supply_cost: 3.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct HostileConfig {
    pub health: i32,
    pub wander_speed: SpeedRange,
    pub seek_speed: SpeedRange,
    pub sense_radius: f64,
    /// Seeking gives up once no survivor is inside this radius.
    pub lose_radius: f64,
    pub feed_radius: f64,
    pub strike_range: f64,
    pub bite_chance: f64,
    pub redirect_chance: f64,
}

impl Default for HostileConfig {
    fn default() -> Self {
        Self {
            health: 3,
            wander_speed: SpeedRange::new(15.0, 3.0),
            seek_speed: SpeedRange::new(30.0, 15.0),
            sense_radius: 100.0,
            lose_radius: 115.0,
            feed_radius: 15.0,
            strike_range: 15.0,
            bite_chance: 0.2,
            redirect_chance: 1.0 / 350.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Seconds between hostile spawns.
    pub interval: f64,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self { interval: 10.0 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ProjectileConfig {
    pub speed: f64,
    pub hit_radius: f64,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 200.0,
            hit_radius: 2.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DecayConfig {
    pub initial_opacity: u8,
    pub fade_step: u8,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            initial_opacity: 255,
            fade_step: 1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PickupConfig {
    pub supply_cost: f64,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self { supply_cost: 1.0 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub survivor: SurvivorConfig,
    pub hostile: HostileConfig,
    pub spawner: SpawnerConfig,
    pub projectile: ProjectileConfig,
    pub decay: DecayConfig,
    pub pickup: PickupConfig,
    pub target_fps: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            survivor: SurvivorConfig::default(),
            hostile: HostileConfig::default(),
            spawner: SpawnerConfig::default(),
            projectile: ProjectileConfig::default(),
            decay: DecayConfig::default(),
            pickup: PickupConfig::default(),
            target_fps: 30,
        }
    }
}

fn ensure_chance(value: f64, name: &str) -> anyhow::Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&value),
        "{name} must be in [0.0, 1.0]"
    );
    Ok(())
}

fn ensure_speed(range: SpeedRange, name: &str) -> anyhow::Result<()> {
    anyhow::ensure!(range.base >= 0.0, "{name} base must be non-negative");
    anyhow::ensure!(range.jitter >= 0.0, "{name} jitter must be non-negative");
    Ok(())
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    ///
    /// # Validation Rules
    /// - World dimensions must be positive
    /// - Radii, distances and speeds must be non-negative
    /// - Per-tick chances must be in `[0.0, 1.0]`
    /// - The spawn interval must be positive
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        anyhow::ensure!(self.world.width > 0, "World width must be positive");
        anyhow::ensure!(self.world.height > 0, "World height must be positive");
        anyhow::ensure!(
            self.world.supply_rate >= 0.0,
            "Supply rate must be non-negative"
        );
        anyhow::ensure!(
            self.world.initial_supply >= 0.0,
            "Initial supply must be non-negative"
        );
        anyhow::ensure!(
            self.world.avoidance_radius >= 0.0,
            "Avoidance radius must be non-negative"
        );
        anyhow::ensure!(
            self.world.avoidance_cooldown >= 0.0,
            "Avoidance cooldown must be non-negative"
        );
        anyhow::ensure!(
            self.world.edge_margin >= 0.0,
            "Edge margin must be non-negative"
        );
        anyhow::ensure!(
            self.world.consumed_threshold < 0,
            "Consumed threshold must be below zero"
        );

        // Survivor validation
        let s = &self.survivor;
        anyhow::ensure!(s.max_health > 0, "Survivor max health must be positive");
        ensure_speed(s.explore_speed, "Survivor explore speed")?;
        ensure_speed(s.evade_speed, "Survivor evade speed")?;
        for (value, name) in [
            (s.sense_radius, "Survivor sense radius"),
            (s.evade_radius, "Survivor evade radius"),
            (s.pickup_radius, "Survivor pickup radius"),
            (s.pickup_reach, "Survivor pickup reach"),
            (s.fallback_window, "Survivor fallback window"),
            (s.evade_jitter, "Survivor evade jitter"),
            (s.supply_cost, "Survivor supply cost"),
        ] {
            anyhow::ensure!(value >= 0.0, "{name} must be non-negative");
        }
        for (value, name) in [
            (s.redirect_chance, "Survivor redirect chance"),
            (s.fire_chance, "Survivor fire chance"),
            (s.fallback_chance, "Survivor fallback chance"),
            (s.reacquire_chance, "Survivor reacquire chance"),
            (s.regen_chance, "Survivor regen chance"),
        ] {
            ensure_chance(value, name)?;
        }

        // Hostile validation
        let h = &self.hostile;
        anyhow::ensure!(h.health > 0, "Hostile health must be positive");
        ensure_speed(h.wander_speed, "Hostile wander speed")?;
        ensure_speed(h.seek_speed, "Hostile seek speed")?;
        for (value, name) in [
            (h.sense_radius, "Hostile sense radius"),
            (h.lose_radius, "Hostile lose radius"),
            (h.feed_radius, "Hostile feed radius"),
            (h.strike_range, "Hostile strike range"),
        ] {
            anyhow::ensure!(value >= 0.0, "{name} must be non-negative");
        }
        ensure_chance(h.bite_chance, "Hostile bite chance")?;
        ensure_chance(h.redirect_chance, "Hostile redirect chance")?;

        // Spawner, projectile, pickup validation
        anyhow::ensure!(
            self.spawner.interval > 0.0,
            "Spawn interval must be positive"
        );
        anyhow::ensure!(
            self.projectile.speed > 0.0,
            "Projectile speed must be positive"
        );
        anyhow::ensure!(
            self.projectile.hit_radius >= 0.0,
            "Projectile hit radius must be non-negative"
        );
        anyhow::ensure!(self.decay.fade_step > 0, "Fade step must be positive");
        anyhow::ensure!(
            self.pickup.supply_cost >= 0.0,
            "Pickup supply cost must be non-negative"
        );

        // Target FPS validation
        anyhow::ensure!(self.target_fps > 0, "Target FPS must be positive");
        anyhow::ensure!(self.target_fps <= 240, "Target FPS too high (max 240)");

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Stable hash of every gameplay constant, logged at startup so runs can
    /// be matched to the constant set they used.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.survivor).as_bytes());
        hasher.update(format!("{:?}", self.hostile).as_bytes());
        hasher.update(format!("{:?}", self.spawner).as_bytes());
        hasher.update(format!("{:?}", self.projectile).as_bytes());
        hasher.update(format!("{:?}", self.decay).as_bytes());
        hasher.update(format!("{:?}", self.pickup).as_bytes());
        hex::encode(hasher.finalize())
    }
}
