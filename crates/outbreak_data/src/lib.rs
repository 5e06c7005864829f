pub use data::entity::{DebugOverlay, EntityId, HudStats, Kind, RenderItem, VisualHandle};
pub use data::events::{RemovalCause, SimEvent};
pub use data::geometry::{Bounds, Point};

pub mod data;
