use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::{debug, warn};

use super::keys::{Key, KeySource};
use super::list_view::{Canvas, Style};
use crate::error::Result;

const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// The user's terminal in raw mode on the alternate screen; restored on drop.
pub struct Terminal {
    out: Stdout,
    active: bool,
}

impl Terminal {
    pub fn enter() -> Result<Self> {
        let mut terminal = Self {
            out: io::stdout(),
            active: false,
        };
        terminal.activate()?;
        Ok(terminal)
    }

    fn activate(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        self.active = true;
        debug!("terminal ui active");
        Ok(())
    }

    fn deactivate(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        execute!(self.out, Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        self.active = false;
        debug!("terminal ui released");
        Ok(())
    }
}

impl Canvas for Terminal {
    fn size(&self) -> (u16, u16) {
        terminal::size().unwrap_or(FALLBACK_SIZE)
    }

    fn draw_line(&mut self, y: u16, text: &str, style: Style) -> Result<()> {
        let attribute = match style {
            Style::Normal => Attribute::Reset,
            Style::Reversed => Attribute::Reverse,
            Style::Bold => Attribute::Bold,
        };
        queue!(
            self.out,
            MoveTo(0, y),
            SetAttribute(attribute),
            Print(text),
            SetAttribute(Attribute::Reset)
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn suspend(&mut self, task: &mut dyn FnMut()) -> Result<()> {
        self.deactivate()?;
        task();
        self.activate()
    }
}

impl KeySource for Terminal {
    fn next_key(&mut self) -> Result<Key> {
        loop {
            if let Some(key) = Key::from_event(event::read()?) {
                return Ok(key);
            }
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(e) = self.deactivate() {
            warn!(error = %e, "failed to restore terminal");
        }
    }
}
