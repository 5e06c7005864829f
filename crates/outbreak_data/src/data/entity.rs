use super::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity assigned by the registry on insertion.
///
/// Identities are handed out monotonically and never reused within a world,
/// so a stale id simply stops resolving once its entity is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Behavioral category of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Spawner,
    Hostile,
    Protected,
    Projectile,
    DecayEffect,
    Pickup,
}

impl Kind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Spawner => "graveyard",
            Kind::Hostile => "zombie",
            Kind::Protected => "survivor",
            Kind::Projectile => "bullet",
            Kind::DecayEffect => "bloodsplat",
            Kind::Pickup => "supplycrate",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque handle naming the sprite a renderer should use. The engine picks
/// handles but never inspects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u16);

impl VisualHandle {
    pub const GRAVEYARD: VisualHandle = VisualHandle(0);
    pub const ZOMBIE: VisualHandle = VisualHandle(1);
    pub const SURVIVOR: VisualHandle = VisualHandle(2);
    pub const SURVIVOR_HIT: VisualHandle = VisualHandle(3);
    pub const SURVIVOR_DEAD: VisualHandle = VisualHandle(4);
    pub const BULLET: VisualHandle = VisualHandle(5);
    pub const BLOOD_SPLAT: VisualHandle = VisualHandle(6);
    pub const SUPPLY_CRATE: VisualHandle = VisualHandle(7);
}

/// Everything a renderer needs to draw one entity for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub id: EntityId,
    pub kind: Kind,
    pub position: Point,
    /// Footprint in world units.
    pub size: f64,
    pub visual: VisualHandle,
    /// Lower values are drawn first.
    pub draw_priority: i8,
    pub opacity: u8,
    /// Out-of-ammo marker drawn above living survivors.
    pub caution: bool,
    /// Present only while the entity's debug flag is set.
    pub debug: Option<DebugOverlay>,
}

/// Debug-only annotations for a render item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugOverlay {
    /// First two letters of the active state name.
    pub label: String,
    pub stats: Option<String>,
    pub target: Option<Point>,
}

/// Population and economy figures shown in the heads-up display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudStats {
    pub hostiles: usize,
    pub survivors: usize,
    /// Whole supply units available to spend.
    pub supply: u32,
}
