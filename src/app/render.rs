use crate::app::App;
use outbreak_tui::renderer::WorldWidget;
use outbreak_tui::views::HudWidget;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

const LOG_WIDTH: u16 = 36;

impl App {
    pub fn draw(&mut self, f: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(f.area());

        let (world_area, log_area) = self.split_main(rows[0]);
        self.world_area = world_area;

        let items = self.world.render_items();
        let title = format!(" Outbreak | {:.0}s ", self.world.clock());
        f.render_widget(
            WorldWidget::new(&items, self.world.bounds(), title),
            world_area,
        );

        if let Some(area) = log_area {
            let lines: Vec<ListItem> = self
                .event_log
                .iter()
                .take(usize::from(area.height.saturating_sub(2)))
                .map(|line| ListItem::new(line.as_str()))
                .collect();
            let log = List::new(lines)
                .style(Style::default().fg(Color::Gray))
                .block(Block::default().borders(Borders::ALL).title(" Events "));
            f.render_widget(log, area);
        }

        f.render_widget(
            HudWidget {
                stats: self.world.hud(),
                tick: self.world.tick_count(),
                paused: self.paused,
                debug: self.world.debug_mode(),
            },
            rows[1],
        );
    }

    fn split_main(&self, area: Rect) -> (Rect, Option<Rect>) {
        if !self.show_log || area.width < LOG_WIDTH * 2 {
            return (area, None);
        }
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(LOG_WIDTH), Constraint::Length(LOG_WIDTH)])
            .split(area);
        (cols[0], Some(cols[1]))
    }
}
