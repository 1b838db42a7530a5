use std::{io, time::Duration};

use claby::session::Direction;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Choose(u32),
    Pause,
    Quit,
    Redraw,
    None,
}

pub fn key_to_command(key: KeyEvent) -> Command {
    if key.kind == KeyEventKind::Release {
        return Command::None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Up => Command::Move(Direction::Up),
        KeyCode::Down => Command::Move(Direction::Down),
        KeyCode::Left => Command::Move(Direction::Left),
        KeyCode::Right => Command::Move(Direction::Right),
        KeyCode::Esc | KeyCode::Char('q') => Command::Quit,
        KeyCode::Char('p') | KeyCode::Char(' ') => Command::Pause,
        KeyCode::Char(c) => match (Direction::from_key(c), c.to_digit(10)) {
            (Some(dir), _) => Command::Move(dir),
            (None, Some(n)) => Command::Choose(n),
            (None, None) => Command::None,
        },
        _ => Command::None,
    }
}

/// Blocks until the next event that is worth handling.
pub fn read_command() -> io::Result<Command> {
    loop {
        let command = match event::read()? {
            Event::Key(key) => key_to_command(key),
            Event::Resize(..) => Command::Redraw,
            _ => Command::None,
        };

        if command != Command::None {
            return Ok(command);
        }
    }
}

/// Blocks until any key is pressed.
pub fn wait_key() -> io::Result<()> {
    loop {
        if let Event::Key(KeyEvent {
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        {
            return Ok(());
        }
    }
}

/// Non-blocking check for a quit key, used to cut animations short.
pub fn quit_requested() -> io::Result<bool> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            if key_to_command(key) == Command::Quit {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
