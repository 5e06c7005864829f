pub mod renderer;
pub mod views;

use anyhow::Result;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};

type Backend = CrosstermBackend<Stdout>;

/// Puts stdout into raw mode on the alternate screen with mouse reporting,
/// so clicks can be mapped back into the world.
fn claim_terminal() -> io::Result<()> {
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;
    terminal::enable_raw_mode()
}

/// Undoes [`claim_terminal`]. Safe to call when nothing was claimed.
fn release_terminal() -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show)
}

/// Owns the terminal for one interactive session and gives it back on
/// [`exit`](Tui::exit), on drop, or when the simulation panics.
pub struct Tui {
    pub terminal: Terminal<Backend>,
    claimed: bool,
}

impl Tui {
    pub fn new() -> Result<Self> {
        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(io::stdout()))?,
            claimed: false,
        })
    }

    pub fn init(&mut self) -> Result<()> {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = release_terminal();
            previous(info);
        }));

        claim_terminal()?;
        self.claimed = true;
        self.terminal.clear()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        if std::mem::take(&mut self.claimed) {
            release_terminal()?;
            self.terminal.show_cursor()?;
        }
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if self.claimed {
            let _ = release_terminal();
        }
    }
}
