use outbreak_data::HudStats;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

/// One-line heads-up display: population, supply and run flags.
pub struct HudWidget {
    pub stats: HudStats,
    pub tick: u64,
    pub paused: bool,
    pub debug: bool,
}

impl HudWidget {
    fn line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(
                format!(" Zombies: {} ", self.stats.hostiles),
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                format!("| Survivors: {} ", self.stats.survivors),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("| Supplies: {} ", self.stats.supply),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(format!("| Tick: {} ", self.tick)),
        ];
        if self.paused {
            spans.push(Span::styled(
                "| PAUSED ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
        if self.debug {
            spans.push(Span::styled("| DEBUG ", Style::default().fg(Color::Magenta)));
        }
        Line::from(spans)
    }
}

impl Widget for HudWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line()).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(widget: HudWidget) -> String {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn test_hud_shows_counts_and_supply() {
        let text = rendered(HudWidget {
            stats: HudStats {
                hostiles: 4,
                survivors: 2,
                supply: 17,
            },
            tick: 9,
            paused: false,
            debug: false,
        });
        assert!(text.contains("Zombies: 4"));
        assert!(text.contains("Survivors: 2"));
        assert!(text.contains("Supplies: 17"));
        assert!(!text.contains("PAUSED"));
    }

    #[test]
    fn test_hud_flags() {
        let text = rendered(HudWidget {
            stats: HudStats::default(),
            tick: 0,
            paused: true,
            debug: true,
        });
        assert!(text.contains("PAUSED"));
        assert!(text.contains("DEBUG"));
    }
}
