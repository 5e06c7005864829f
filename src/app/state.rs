use anyhow::{Context, Result};
use outbreak_core::{AppConfig, World};
use outbreak_data::SimEvent;
use ratatui::layout::Rect;
use std::collections::VecDeque;
use std::path::Path;

/// How many event lines the log panel keeps.
pub const EVENT_LOG_CAPACITY: usize = 64;

pub struct App {
    pub running: bool,
    pub paused: bool,
    pub world: World,
    pub config_path: String,
    pub show_log: bool,
    /// Most recent first.
    pub event_log: VecDeque<String>,
    /// Screen area of the world view from the last frame, used to map
    /// mouse clicks back into world coordinates.
    pub world_area: Rect,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let world = World::new(config)?;
        Ok(Self {
            running: true,
            paused: false,
            world,
            config_path: "config.toml".to_string(),
            show_log: true,
            event_log: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
            world_area: Rect::default(),
        })
    }

    /// Reads a TOML configuration, falling back to the defaults when the
    /// file does not exist.
    pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(AppConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        AppConfig::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn log_events(&mut self, events: &[SimEvent]) {
        for event in events {
            if self.event_log.len() == EVENT_LOG_CAPACITY {
                self.event_log.pop_back();
            }
            self.event_log.push_front(event.describe());
        }
    }
}
