use std::{
    io::{self, stdout, Stdout, Write},
    panic,
    sync::Arc,
    thread,
};

use claby::{CellState, Grid, Node};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};

pub const PLAYER_CHAR: char = 'P';

/// Colour of a single grid cell, entrance/exit/cursor win over the state.
pub fn cell_color(grid: &Grid, pos: Node, state: CellState, cursor: Option<Node>) -> Color {
    if cursor == Some(pos) {
        return Color::Red;
    }
    if grid.is_entrance(pos) || grid.is_exit(pos) {
        return Color::Cyan;
    }

    match state {
        CellState::Wall => Color::Grey,
        CellState::Passage => Color::Reset,
        CellState::Visited => Color::DarkYellow,
        CellState::Solution => Color::Green,
        CellState::Trail => Color::Blue,
    }
}

/// One row of the grid as `(colour, text)` runs.
pub fn row_runs(grid: &Grid, row: i32, cursor: Option<Node>) -> Vec<(Color, String)> {
    let mut runs: Vec<(Color, String)> = Vec::new();

    for col in 0..grid.cols() as i32 {
        let pos = Node::new(row, col);
        let Ok(state) = grid.cell_state(pos) else {
            continue;
        };

        let symbol = if cursor == Some(pos) {
            PLAYER_CHAR
        } else {
            grid.symbol_at(pos).unwrap_or(' ')
        };
        let color = cell_color(grid, pos, state, cursor);

        match runs.last_mut() {
            Some((last, text)) if *last == color => text.push(symbol),
            _ => runs.push((color, symbol.to_string())),
        }
    }

    runs
}

/// Panic hook that runs `cleanup` first and then whatever hook was set before.
struct PanicGuard {
    restore: Option<Box<dyn FnOnce() + Send>>,
}

impl PanicGuard {
    fn install<F>(cleanup: F) -> Self
    where
        F: Fn() + Sync + Send + 'static,
    {
        let prev = Arc::new(panic::take_hook());
        let chained = Arc::clone(&prev);
        panic::set_hook(Box::new(move |info| {
            cleanup();
            (**chained)(info)
        }));

        PanicGuard {
            restore: Some(Box::new(move || {
                panic::set_hook(Box::new(move |info| (**prev)(info)));
            })),
        }
    }

    /// Puts the previous hook back. While panicking the chained hook stays.
    fn restore(mut self) {
        if thread::panicking() {
            return;
        }
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

/// Owns the terminal while alive: raw mode, alternate screen, hidden cursor.
pub struct Renderer {
    out: Stdout,
    panic_guard: Option<PanicGuard>,
}

impl Renderer {
    pub fn new() -> io::Result<Self> {
        let mut ren = Renderer {
            out: stdout(),
            panic_guard: None,
        };
        ren.turn_on()?;
        Ok(ren)
    }

    fn turn_on(&mut self) -> io::Result<()> {
        self.panic_guard = Some(PanicGuard::install(|| {
            let _ = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);
            let _ = terminal::disable_raw_mode();
        }));

        terminal::enable_raw_mode()?;
        execute!(self.out, cursor::Hide, terminal::EnterAlternateScreen)?;

        Ok(())
    }

    fn turn_off(&mut self) -> io::Result<()> {
        if let Some(guard) = self.panic_guard.take() {
            guard.restore();
        }

        execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn fits(&self, grid: &Grid) -> bool {
        match terminal::size() {
            Ok((width, height)) => grid.cols() <= width as usize && grid.rows() < height as usize,
            Err(_) => true,
        }
    }

    /// Redraws the whole screen: the grid, the cursor and status lines below it.
    pub fn draw(&mut self, grid: &Grid, cursor: Option<Node>, status: &[&str]) -> io::Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All))?;

        for row in 0..grid.rows() as i32 {
            queue!(self.out, cursor::MoveTo(0, row as u16))?;
            for (color, text) in row_runs(grid, row, cursor) {
                queue!(self.out, SetForegroundColor(color), Print(text))?;
            }
        }
        queue!(self.out, ResetColor)?;

        let below = grid.rows() as u16 + 1;
        for (i, line) in status.iter().enumerate() {
            queue!(self.out, cursor::MoveTo(0, below + i as u16), Print(line))?;
        }

        self.out.flush()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = self.turn_off();
    }
}
