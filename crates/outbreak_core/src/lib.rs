//! # Outbreak Core
//!
//! The simulation engine for Outbreak, a zombie-outbreak sandbox where every
//! actor is driven by its own finite-state-machine brain.
//!
//! This crate contains:
//! - A generic state-machine runtime ([`fsm`])
//! - The entity registry and its proximity queries ([`registry`])
//! - Straight-line locomotion with collision avoidance ([`locomotion`])
//! - The supply economy gating player spawns ([`economy`])
//! - Behavior graphs for spawners, hostiles, survivors, projectiles and
//!   decay effects ([`behavior`])
//! - The tick driver and render surface ([`world`])
//!
//! ## Architecture
//!
//! The [`World`] owns every entity. Entities refer to each other only by
//! [`EntityId`](outbreak_data::EntityId) and resolve those ids through the
//! registry on every use, so a target removed mid-tick simply stops
//! resolving. All randomness flows through one seedable [`SimRng`].
//!
//! ## Example
//!
//! ```
//! use outbreak_core::{AppConfig, World};
//! use outbreak_data::{Kind, Point};
//!
//! let mut config = AppConfig::default();
//! config.world.seed = Some(42);
//!
//! let mut world = World::new(config).unwrap();
//! world.spawn_if_affordable(Kind::Protected, Point::new(100.0, 100.0));
//!
//! for _ in 0..30 {
//!     world.tick(1.0 / 30.0).unwrap();
//! }
//! assert!(world.hud().survivors <= 1);
//! ```

/// Behavior graphs and the brain/context glue
pub mod behavior;
/// Configuration management for simulation parameters
pub mod config;
/// Supply budget and spawn costs
pub mod economy;
/// Error types for the driver surface
pub mod error;
/// Generic finite-state machine
pub mod fsm;
/// Entity record and factories
pub mod lifecycle;
/// Movement and collision avoidance
pub mod locomotion;
/// Metrics collection and structured logging
pub mod metrics;
/// Entity registry and spatial queries
pub mod registry;
/// Seedable random source
pub mod rng;
/// The simulation driver
pub mod world;

pub use behavior::{Brain, Mode};
pub use config::AppConfig;
pub use error::SimError;
pub use lifecycle::Entity;
pub use metrics::{init_logging, Metrics};
pub use rng::SimRng;
pub use world::World;
