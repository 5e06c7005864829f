//! Core data structures for the Outbreak simulation.

pub mod entity;
pub mod events;
pub mod geometry;
