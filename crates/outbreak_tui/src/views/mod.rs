pub mod hud;

pub use hud::HudWidget;
