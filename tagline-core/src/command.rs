//! Keyboard control surface and the command reducer.

use crate::error::{AnnotateError, Result};
use crate::model::Tag;
use crate::session::Session;

/// Platform-agnostic key event.
///
/// Terminal and browser front ends translate their native key codes into
/// this before handing them to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Left,
    Right,
    Up,
    Down,
    Enter,
    Esc,
    Backspace,
}

/// A state change requested by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetTag(Tag),
    /// Delete the active page
    Delete,
    /// Drop the active tag and every span on the active page
    ClearTag,
    Next,
    Prev,
    GotoPage(usize),
}

impl Command {
    /// Map a key to its page-level command, if it has one
    pub fn from_key(key: Key) -> Option<Command> {
        match key {
            Key::Char(c @ '1'..='4') => c.to_digit(10).and_then(Tag::from_digit).map(Command::SetTag),
            Key::Char('d') | Key::Char('D') => Some(Command::Delete),
            Key::Char('r') | Key::Char('R') => Some(Command::ClearTag),
            Key::Left | Key::Char('q') => Some(Command::Prev),
            Key::Right | Key::Char('e') => Some(Command::Next),
            _ => None,
        }
    }
}

/// Validate the contents of the page-jump field
pub fn parse_page_jump(input: &str, total: usize) -> Result<usize> {
    let trimmed = input.trim();
    let n: usize = trimmed
        .parse()
        .map_err(|_| AnnotateError::InvalidPageInput(trimmed.to_string()))?;
    if n < 1 || n > total {
        return Err(AnnotateError::PageOutOfRange {
            requested: n,
            total,
        });
    }
    Ok(n)
}

impl Session {
    /// Apply one command. On error the session is unchanged.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::SetTag(tag) => self.set_active_tag(Some(tag)),
            Command::ClearTag => {
                self.set_active_tag(None);
                let active = self.store.active_index();
                self.clear_tag_on_page(active);
            }
            Command::Delete => {
                self.store.delete(None)?;
            }
            Command::Next => self.store.next(),
            Command::Prev => self.store.previous(),
            Command::GotoPage(n) => self.store.go_to(n)?,
        }
        Ok(())
    }
}
