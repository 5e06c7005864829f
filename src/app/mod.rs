pub mod input;
pub mod render;
pub mod shutdown;
pub mod state;

pub use shutdown::ShutdownManager;
pub use state::App;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::time::{Duration, Instant};

use outbreak_tui::Tui;

impl App {
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let shutdown = ShutdownManager::new();
        shutdown.listen_for_ctrl_c();

        let frame = Duration::from_secs_f64(1.0 / self.world.config.target_fps as f64);
        let mut last_tick = Instant::now();

        while self.running && !shutdown.is_shutdown_requested() {
            tui.terminal.draw(|f| {
                self.draw(f);
            })?;

            let timeout = frame.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse);
                    }
                    _ => {}
                }
            }

            if last_tick.elapsed() >= frame {
                let elapsed = last_tick.elapsed();
                last_tick = Instant::now();
                if !self.paused {
                    self.step(elapsed)?;
                }
            }
        }
        tracing::info!(ticks = self.world.tick_count(), "Interactive session ended");
        Ok(())
    }

    /// Advances the world by one frame's wall-clock time.
    pub fn step(&mut self, elapsed: Duration) -> Result<()> {
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let events = self.world.tick_millis(millis)?;
        self.log_events(&events);
        Ok(())
    }
}
