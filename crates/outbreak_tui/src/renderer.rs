use outbreak_data::{Bounds, Kind, Point, RenderItem, VisualHandle};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::{Block, Borders, Widget};

/// Draws the simulation area scaled into the terminal.
pub struct WorldWidget<'a> {
    items: &'a [RenderItem],
    bounds: Bounds,
    title: String,
}

impl<'a> WorldWidget<'a> {
    pub fn new(items: &'a [RenderItem], bounds: Bounds, title: impl Into<String>) -> Self {
        Self {
            items,
            bounds,
            title: title.into(),
        }
    }

    pub fn get_inner_area(area: Rect) -> Rect {
        Block::default().borders(Borders::ALL).inner(area)
    }

    pub fn symbol_for(item: &RenderItem) -> char {
        match item.visual {
            VisualHandle::GRAVEYARD => '▣',
            VisualHandle::ZOMBIE => 'Z',
            VisualHandle::SURVIVOR | VisualHandle::SURVIVOR_HIT => '@',
            VisualHandle::SURVIVOR_DEAD => '%',
            VisualHandle::BULLET => '•',
            VisualHandle::BLOOD_SPLAT => '*',
            VisualHandle::SUPPLY_CRATE => '+',
            _ => match item.kind {
                Kind::Spawner => '▣',
                Kind::Hostile => 'Z',
                Kind::Protected => '@',
                Kind::Projectile => '•',
                Kind::DecayEffect => '*',
                Kind::Pickup => '+',
            },
        }
    }

    pub fn color_for(item: &RenderItem) -> Color {
        match item.visual {
            VisualHandle::GRAVEYARD => Color::Rgb(120, 120, 120),
            VisualHandle::ZOMBIE => Color::Rgb(100, 200, 60),
            VisualHandle::SURVIVOR => Color::Cyan,
            VisualHandle::SURVIVOR_HIT => Color::Rgb(255, 60, 60),
            VisualHandle::SURVIVOR_DEAD => Color::Rgb(130, 0, 0),
            VisualHandle::BULLET => Color::Yellow,
            // Fades toward black with the effect's opacity.
            VisualHandle::BLOOD_SPLAT => Color::Rgb(item.opacity.max(40), 0, 0),
            VisualHandle::SUPPLY_CRATE => Color::Rgb(210, 180, 140),
            _ => Color::White,
        }
    }

    /// Maps a world point onto a cell of `inner`, scaling each axis.
    pub fn world_to_screen(p: Point, bounds: Bounds, inner: Rect) -> Option<(u16, u16)> {
        if inner.width == 0 || inner.height == 0 || bounds.width <= 0.0 || bounds.height <= 0.0 {
            return None;
        }
        let fx = (p.x / bounds.width).clamp(0.0, 1.0);
        let fy = (p.y / bounds.height).clamp(0.0, 1.0);
        let x = inner.x + (fx * f64::from(inner.width - 1)).round() as u16;
        let y = inner.y + (fy * f64::from(inner.height - 1)).round() as u16;
        Some((x, y))
    }

    /// Maps a terminal cell back to the world point at its center, or `None`
    /// for cells outside the drawing area.
    pub fn screen_to_world(column: u16, row: u16, bounds: Bounds, inner: Rect) -> Option<Point> {
        if column < inner.left()
            || column >= inner.right()
            || row < inner.top()
            || row >= inner.bottom()
        {
            return None;
        }
        let fraction = |offset: u16, extent: u16| {
            if extent > 1 {
                f64::from(offset) / f64::from(extent - 1)
            } else {
                0.5
            }
        };
        Some(Point::new(
            fraction(column - inner.x, inner.width) * bounds.width,
            fraction(row - inner.y, inner.height) * bounds.height,
        ))
    }

    /// Dotted debug line from `from` to `to`, drawn only on empty cells.
    fn trace_line(from: (u16, u16), to: (u16, u16), buf: &mut Buffer) {
        let (x0, y0) = (i32::from(from.0), i32::from(from.1));
        let (x1, y1) = (i32::from(to.0), i32::from(to.1));
        let steps = (x1 - x0).abs().max((y1 - y0).abs());
        for i in 1..steps {
            let t = f64::from(i) / f64::from(steps);
            let x = (f64::from(x0) + f64::from(x1 - x0) * t).round() as u16;
            let y = (f64::from(y0) + f64::from(y1 - y0) * t).round() as u16;
            let cell = &mut buf[(x, y)];
            if cell.symbol() == " " {
                cell.set_symbol("·");
                cell.set_fg(Color::DarkGray);
            }
        }
    }
}

impl<'a> Widget for WorldWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .render(area, buf);

        let inner = Self::get_inner_area(area);
        let to_screen = |p: Point| Self::world_to_screen(p, self.bounds, inner);

        for item in self.items {
            let target = item.debug.as_ref().and_then(|d| d.target);
            if let (Some(from), Some(to)) = (to_screen(item.position), target.and_then(to_screen)) {
                Self::trace_line(from, to, buf);
            }
        }

        for item in self.items {
            let Some((x, y)) = to_screen(item.position) else {
                continue;
            };
            let cell = &mut buf[(x, y)];
            cell.set_symbol(&Self::symbol_for(item).to_string());
            cell.set_fg(Self::color_for(item));

            if item.caution && y > inner.top() {
                let cell = &mut buf[(x, y - 1)];
                cell.set_symbol("!");
                cell.set_fg(Color::Yellow);
            }
        }

        for item in self.items {
            let (Some(debug), Some((x, y))) = (item.debug.as_ref(), to_screen(item.position)) else {
                continue;
            };
            Self::write_clipped(&debug.label, (x + 1, y), inner, Color::White, buf);
            if let Some(stats) = &debug.stats {
                Self::write_clipped(stats, (x + 1, y + 1), inner, Color::Gray, buf);
            }
        }
    }
}

impl WorldWidget<'_> {
    /// Writes `text` left to right from `at`, dropping whatever falls
    /// outside `inner`.
    fn write_clipped(text: &str, at: (u16, u16), inner: Rect, color: Color, buf: &mut Buffer) {
        let (x, y) = at;
        if y >= inner.bottom() {
            return;
        }
        for (offset, ch) in text.chars().enumerate() {
            let column = x.saturating_add(offset as u16);
            if column >= inner.right() {
                break;
            }
            let cell = &mut buf[(column, y)];
            cell.set_symbol(&ch.to_string());
            cell.set_fg(color);
        }
    }
}
