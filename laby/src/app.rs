use std::{
    io::{self, Write},
    process::ExitCode,
    thread,
    time::{Duration, Instant},
};

use claby::{
    algorithms::{
        random, BreadthFirstSearch, Carver, PathFound, RecursiveBacktracker, SolveError, Solver,
    },
    grid::{Grid, GridError},
    node::Node,
    progress::{Observer, Phase, Progress},
    session::{MoveOutcome, Session, SessionError, SessionState},
};
use thiserror::Error;

use crate::{
    cli::{Dimensions, DimensionsTooSmall, Mode},
    input::{self, Command},
    logging::AppLogger,
    renderer::Renderer,
    settings::{Delays, SettingsError},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("Maze error: {0}")]
    Grid(#[from] GridError),
    #[error("Solver error: {0}")]
    Solve(#[from] SolveError),
    #[error("Game error: {0}")]
    Session(#[from] SessionError),
    #[error("{0}")]
    Settings(#[from] SettingsError),
    #[error("{0}")]
    Dimensions(#[from] DimensionsTooSmall),
}

#[derive(Debug, Clone)]
pub struct Options {
    pub dims: Dimensions,
    pub seed: Option<u64>,
    pub mode: Option<Mode>,
    pub animate: bool,
    pub delays: Delays,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Played { moves: usize, elapsed: Duration },
    Solved { found: PathFound, took: Duration },
    NoPath,
    Quit,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub grid: Grid,
    pub seed: u64,
    pub generation: Duration,
    pub outcome: Outcome,
}

impl Report {
    pub fn write(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "{}", self.grid)?;
        writeln!(out)?;
        writeln!(
            out,
            "Maze generated in {:.3} seconds (seed {}).",
            self.generation.as_secs_f64(),
            self.seed
        )?;

        match &self.outcome {
            Outcome::Played { moves, elapsed } => writeln!(
                out,
                "Congratulations! You found the exit in {} seconds and {} moves.",
                elapsed.as_secs(),
                moves
            ),
            Outcome::Solved { found, took } => writeln!(
                out,
                "Maze solved in {:.3} seconds, the path is {} steps long.",
                took.as_secs_f64(),
                found.length
            ),
            Outcome::NoPath => writeln!(out, "No path from the entrance to the exit was found."),
            Outcome::Quit => Ok(()),
        }
    }
}

/// Writes out the buffered log messages and then the error, if any.
///
/// Runs after the terminal is restored, whichever way `run` ended.
pub fn conclude(
    result: Result<(), AppError>,
    logger: &AppLogger,
    out: &mut impl Write,
) -> ExitCode {
    let _ = logger.write_to(out);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(out, "Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Carve => "Carving",
        Phase::Search => "Searching",
        Phase::Path => "Tracing path",
    }
}

/// Draws every step of an algorithm, paced by the configured delays.
struct Animation<'a> {
    renderer: &'a mut Renderer,
    delays: Delays,
    enabled: bool,
    spent: Duration,
    error: Option<io::Error>,
}

impl<'a> Animation<'a> {
    fn new(renderer: &'a mut Renderer, delays: Delays, enabled: bool) -> Self {
        Self {
            renderer,
            delays,
            enabled,
            spent: Duration::ZERO,
            error: None,
        }
    }

    /// Time spent drawing and sleeping, or the first terminal error.
    fn finish(self) -> io::Result<Duration> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.spent),
        }
    }
}

impl Observer for Animation<'_> {
    fn step(&mut self, phase: Phase, grid: &Grid, cursor: Node, progress: Progress) {
        if !self.enabled || self.error.is_some() {
            return;
        }

        let started = Instant::now();
        let delay = match phase {
            Phase::Carve => self.delays.carve,
            Phase::Search => self.delays.search,
            Phase::Path => self.delays.path,
        };
        let status = format!(
            "{} {:>3.0}%",
            phase_label(phase),
            progress.percent() * 100.0
        );

        let drawn = self
            .renderer
            .draw(grid, Some(cursor), &[&status, "q: skip animation"])
            .and_then(|_| input::quit_requested());

        match drawn {
            Ok(true) => {
                log::info!("{} animation skipped", phase_label(phase));
                self.enabled = false;
            }
            Ok(false) => thread::sleep(delay),
            Err(err) => self.error = Some(err),
        }

        self.spent += started.elapsed();
    }
}

pub fn run(options: &Options) -> Result<Report, AppError> {
    let Dimensions { rows, cols, notice } = &options.dims;

    let mut grid = Grid::new(*rows, *cols)?;
    let (mut rng, seed) = random(options.seed);
    log::info!("Generating a {}x{} maze with seed {}", rows, cols, seed);

    let mut renderer = Renderer::new()?;
    if !renderer.fits(&grid) {
        log::warn!(
            "The {}x{} grid doesn't fit the terminal",
            grid.rows(),
            grid.cols()
        );
    }

    let started = Instant::now();
    let mut animation = Animation::new(&mut renderer, options.delays, options.animate);
    let start = grid.seed();
    RecursiveBacktracker.carve(&mut grid, start, &mut rng, &mut animation)?;
    let generation = started.elapsed().saturating_sub(animation.finish()?);

    let generated = format!(
        "Maze generated in {:.3} seconds.",
        generation.as_secs_f64()
    );
    let mut header = vec![generated];
    header.extend(notice.clone());

    let mode = match options.mode {
        Some(mode) => Some(mode),
        None => choose_mode(&mut renderer, &grid, &header)?,
    };

    let outcome = match mode {
        Some(Mode::Play) => play(&mut renderer, &mut grid, options.delays.step)?,
        Some(Mode::Solve) => solve(&mut renderer, &mut grid, options)?,
        None => Outcome::Quit,
    };

    drop(renderer);

    Ok(Report {
        grid,
        seed,
        generation,
        outcome,
    })
}

fn choose_mode(
    renderer: &mut Renderer,
    grid: &Grid,
    header: &[String],
) -> Result<Option<Mode>, AppError> {
    let mut lines: Vec<&str> = header.iter().map(String::as_str).collect();
    lines.extend(["Choose an option:", "1. Play", "2. Watch the solver", "q. Quit"]);

    loop {
        renderer.draw(grid, None, &lines)?;

        match input::read_command()? {
            Command::Choose(1) => return Ok(Some(Mode::Play)),
            Command::Choose(2) => return Ok(Some(Mode::Solve)),
            Command::Quit => return Ok(None),
            _ => {}
        }
    }
}

fn play(renderer: &mut Renderer, grid: &mut Grid, step: Duration) -> Result<Outcome, AppError> {
    let mut session = Session::new(grid);
    session.start()?;

    loop {
        let status = match session.state() {
            SessionState::Paused => "Paused, p to resume".to_string(),
            _ => format!(
                "Moves: {}   w/a/s/d or arrows to move, p to pause, q to quit",
                session.move_count()
            ),
        };
        renderer.draw(grid, Some(session.player()), &[&status])?;

        match input::read_command()? {
            Command::Move(dir) if session.state() == SessionState::Running => {
                match session.move_player(grid, dir)? {
                    MoveOutcome::Finished(_) => break,
                    MoveOutcome::Moved(_) => thread::sleep(step),
                    MoveOutcome::Blocked(_) => {}
                }
            }
            Command::Pause => match session.state() {
                SessionState::Running => session.pause()?,
                SessionState::Paused => session.resume()?,
                _ => {}
            },
            Command::Quit => {
                session.quit();
                return Ok(Outcome::Quit);
            }
            _ => {}
        }
    }

    Ok(Outcome::Played {
        moves: session.move_count(),
        elapsed: session.elapsed().unwrap_or_default(),
    })
}

fn solve(renderer: &mut Renderer, grid: &mut Grid, options: &Options) -> Result<Outcome, AppError> {
    let started = Instant::now();
    let mut animation = Animation::new(renderer, options.delays, options.animate);
    let result = BreadthFirstSearch.solve(grid, &mut animation);
    let took = started.elapsed().saturating_sub(animation.finish()?);

    let (outcome, summary) = match result {
        Ok(found) => {
            let summary = format!(
                "Maze solved in {:.3} seconds, the path is {} steps long.",
                took.as_secs_f64(),
                found.length
            );
            (Outcome::Solved { found, took }, summary)
        }
        Err(SolveError::NoPathFound) => (
            Outcome::NoPath,
            "No path from the entrance to the exit was found.".to_string(),
        ),
        Err(err) => return Err(err.into()),
    };

    if options.animate {
        renderer.draw(grid, None, &[&summary, "Press any key to exit"])?;
        input::wait_key()?;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lines() {
        let mut grid = Grid::new(2, 2).unwrap();
        let (mut rng, _) = random(Some(1));
        let start = grid.seed();
        RecursiveBacktracker
            .carve(&mut grid, start, &mut rng, &mut claby::progress::Silent)
            .unwrap();
        let found = BreadthFirstSearch
            .solve(&mut grid, &mut claby::progress::Silent)
            .unwrap();
        let length = found.length;

        let report = Report {
            grid,
            seed: 1,
            generation: Duration::from_millis(1500),
            outcome: Outcome::Solved {
                found,
                took: Duration::from_millis(2),
            },
        };

        let mut out = Vec::new();
        report.write(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.starts_with("#####\n"));
        assert!(out.contains("Maze generated in 1.500 seconds (seed 1)."));
        assert!(out.contains(&format!("the path is {} steps long", length)));
    }

    #[test]
    fn logs_survive_an_early_error() {
        let logger = AppLogger::new(log::LevelFilter::Warn);
        log::Log::log(
            &logger,
            &log::Record::builder()
                .level(log::Level::Warn)
                .args(format_args!("Using default settings: broken file"))
                .build(),
        );

        let error = AppError::Dimensions(DimensionsTooSmall { rows: -3, cols: 5 });
        let mut out = Vec::new();
        conclude(Err(error), &logger, &mut out);
        let out = String::from_utf8(out).unwrap();

        let warning = out.find("Using default settings").unwrap();
        let error = out.find("Error: minimum dimensions are 2x2, got -3x5").unwrap();
        assert!(warning < error);
        assert!(logger.take_logs().is_empty());
    }

    #[test]
    fn played_report() {
        let report = Report {
            grid: Grid::new(2, 2).unwrap(),
            seed: 0,
            generation: Duration::ZERO,
            outcome: Outcome::Played {
                moves: 12,
                elapsed: Duration::from_secs(7),
            },
        };

        let mut out = Vec::new();
        report.write(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("found the exit in 7 seconds and 12 moves"));
    }
}
