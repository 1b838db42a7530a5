use std::time::Duration;

use pausable_clock::{PausableClock, PausableInstant};
use thiserror::Error;

use crate::{
    grid::{CellState, Grid, GridError},
    node::Node,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session is already running")]
    AlreadyRunning,
    #[error("session is not running")]
    NotRunning,
    #[error("session is not paused")]
    NotPaused,
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    NotStarted,
    Running,
    Paused,
    Finished,
    Quitted,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn offset(self) -> Node {
        match self {
            Direction::Up => Node::UP,
            Direction::Down => Node::DOWN,
            Direction::Left => Node::LEFT,
            Direction::Right => Node::RIGHT,
        }
    }

    /// Classic `w`/`a`/`s`/`d` keys.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            's' => Some(Direction::Down),
            'a' => Some(Direction::Left),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(Node),
    Blocked(Node),
    Finished(Node),
}

/// Player walking through a maze.
///
/// Doesn't hold on to the grid, every call that needs it borrows it.
pub struct Session {
    state: SessionState,
    player: Node,
    moves: Vec<(Node, Direction)>,
    clock: Option<PausableClock>,
    start: Option<PausableInstant>,
}

impl Session {
    pub fn new(grid: &Grid) -> Self {
        Session {
            state: SessionState::NotStarted,
            player: grid.entrance(),
            moves: vec![],
            clock: None,
            start: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn player(&self) -> Node {
        self.player
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::NotStarted {
            return Err(SessionError::AlreadyRunning);
        }

        let clock = PausableClock::default();
        self.start = Some(clock.now());
        self.clock = Some(clock);
        self.state = SessionState::Running;

        Ok(())
    }

    pub fn move_player(
        &mut self,
        grid: &mut Grid,
        dir: Direction,
    ) -> Result<MoveOutcome, SessionError> {
        self.check_running()?;

        let target = self.player + dir.offset();
        if !grid.is_open(target) {
            return Ok(MoveOutcome::Blocked(self.player));
        }

        let from = self.player;
        if !grid.is_entrance(from) && !grid.is_exit(from) {
            grid.set_cell_state(from, CellState::Trail)?;
        }

        self.moves.push((from, dir));
        self.player = target;

        if grid.is_exit(target) {
            self.state = SessionState::Finished;
            if let Some(clock) = self.clock.as_mut() {
                clock.pause();
            }
            log::info!(
                "Exit reached in {} moves, {:?}",
                self.moves.len(),
                self.elapsed()
            );
            return Ok(MoveOutcome::Finished(target));
        }

        Ok(MoveOutcome::Moved(target))
    }

    pub fn check_running(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Running => Ok(()),
            _ => Err(SessionError::NotRunning),
        }
    }

    pub fn check_paused(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Paused => Ok(()),
            _ => Err(SessionError::NotPaused),
        }
    }

    pub fn elapsed(&self) -> Option<Duration> {
        let clock = self.clock.as_ref()?;
        self.start.map(|start| start.elapsed(clock))
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.check_running()?;

        self.state = SessionState::Paused;
        if let Some(clock) = self.clock.as_mut() {
            clock.pause();
        }

        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), SessionError> {
        self.check_paused()?;

        self.state = SessionState::Running;
        if let Some(clock) = self.clock.as_mut() {
            clock.resume();
        }

        Ok(())
    }

    pub fn quit(&mut self) {
        self.state = SessionState::Quitted;
        if let Some(clock) = self.clock.as_mut() {
            clock.pause();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 maze with a single corridor: right along the top, then down.
    fn corridor() -> Grid {
        let mut grid = Grid::new(2, 2).unwrap();
        for pos in [Node::new(1, 2), Node::new(1, 3), Node::new(2, 3), Node::new(3, 3)] {
            grid.set_cell_state(pos, CellState::Passage).unwrap();
        }
        grid
    }

    #[test]
    fn must_start_first() {
        let mut grid = corridor();
        let mut session = Session::new(&grid);

        assert_eq!(session.player(), grid.entrance());
        assert_eq!(
            session.move_player(&mut grid, Direction::Right),
            Err(SessionError::NotRunning)
        );

        session.start().unwrap();
        assert_eq!(session.start(), Err(SessionError::AlreadyRunning));
    }

    #[test]
    fn walls_block() {
        let mut grid = corridor();
        let mut session = Session::new(&grid);
        session.start().unwrap();

        let before = grid.clone();
        for dir in [Direction::Up, Direction::Down, Direction::Left] {
            assert_eq!(
                session.move_player(&mut grid, dir),
                Ok(MoveOutcome::Blocked(Node::new(1, 0)))
            );
        }
        assert_eq!(grid, before);
        assert_eq!(session.move_count(), 0);
    }

    #[test]
    fn walk_to_exit() {
        let mut grid = corridor();
        let mut session = Session::new(&grid);
        session.start().unwrap();

        use Direction::*;
        for dir in [Right, Right, Right] {
            assert!(matches!(
                session.move_player(&mut grid, dir),
                Ok(MoveOutcome::Moved(_))
            ));
        }
        assert_eq!(session.move_player(&mut grid, Down), Ok(MoveOutcome::Moved(Node::new(2, 3))));
        assert_eq!(session.move_player(&mut grid, Down), Ok(MoveOutcome::Moved(Node::new(3, 3))));
        assert_eq!(
            session.move_player(&mut grid, Right),
            Ok(MoveOutcome::Finished(grid.exit()))
        );

        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.move_count(), 6);
        assert!(session.elapsed().is_some());

        // every vacated cell but the entrance is on the trail
        assert_eq!(grid.count(CellState::Trail), 5);
        assert_eq!(grid.cell_state(grid.entrance()), Ok(CellState::Passage));
        assert_eq!(grid.cell_state(grid.exit()), Ok(CellState::Passage));

        assert_eq!(
            session.move_player(&mut grid, Left),
            Err(SessionError::NotRunning)
        );
    }

    #[test]
    fn walking_back_over_trail() {
        let mut grid = corridor();
        let mut session = Session::new(&grid);
        session.start().unwrap();

        session.move_player(&mut grid, Direction::Right).unwrap();
        session.move_player(&mut grid, Direction::Right).unwrap();
        assert_eq!(
            session.move_player(&mut grid, Direction::Left),
            Ok(MoveOutcome::Moved(Node::new(1, 1)))
        );
    }

    #[test]
    fn pause_and_resume() {
        let mut grid = corridor();
        let mut session = Session::new(&grid);

        assert_eq!(session.pause(), Err(SessionError::NotRunning));
        session.start().unwrap();
        assert_eq!(session.resume(), Err(SessionError::NotPaused));

        session.pause().unwrap();
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(
            session.move_player(&mut grid, Direction::Right),
            Err(SessionError::NotRunning)
        );

        session.resume().unwrap();
        assert!(session.move_player(&mut grid, Direction::Right).is_ok());

        session.quit();
        assert_eq!(session.state(), SessionState::Quitted);
    }

    #[test]
    fn keys() {
        assert_eq!(Direction::from_key('w'), Some(Direction::Up));
        assert_eq!(Direction::from_key('A'), Some(Direction::Left));
        assert_eq!(Direction::from_key('x'), None);
        assert_eq!(Direction::Down.offset(), Node::DOWN);
    }
}
