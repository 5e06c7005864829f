use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use outbreak_data::{EntityId, Kind};
use outbreak_tui::renderer::WorldWidget;

impl App {
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('`') | KeyCode::Char('d') => {
                let on = !self.world.debug_mode();
                self.world.set_debug_mode(on);
                tracing::debug!(on, "Debug overlays toggled");
            }
            KeyCode::Char('l') => self.show_log = !self.show_log,
            _ => {}
        }
    }

    /// Left click places a survivor, right click drops a supply crate. Both
    /// are charged against the supply and ignored when it falls short.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<EntityId> {
        let kind = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Kind::Protected,
            MouseEventKind::Down(MouseButton::Right) => Kind::Pickup,
            _ => return None,
        };
        let inner = WorldWidget::get_inner_area(self.world_area);
        let at = WorldWidget::screen_to_world(mouse.column, mouse.row, self.world.bounds(), inner)?;
        let spawned = self.world.spawn_if_affordable(kind, at);
        if spawned.is_none() {
            self.event_log
                .push_front(format!("not enough supplies for a {kind}"));
        }
        spawned
    }
}
