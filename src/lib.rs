//! Driver for the outbreak sandbox: an interactive terminal front end and a
//! headless batch runner, both built on [`outbreak_core::World`].

pub mod app;
pub mod headless;

pub use app::{App, ShutdownManager};
