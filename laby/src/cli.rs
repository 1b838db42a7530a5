use clap::{Parser, ValueEnum};
use claby::grid::MIN_LOGICAL_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Walk the maze yourself
    Play,
    /// Watch the breadth-first solver
    Solve,
}

#[derive(Parser, Debug)]
#[clap(version, about, name = "laby")]
pub struct Args {
    #[clap(allow_negative_numbers = true, help = "Number of maze rows")]
    pub rows: Option<String>,
    #[clap(allow_negative_numbers = true, help = "Number of maze columns")]
    pub cols: Option<String>,
    #[clap(short, long, help = "Seed for a reproducible maze")]
    pub seed: Option<u64>,
    #[clap(short, long, value_enum, help = "Skip the menu and go straight to a mode")]
    pub mode: Option<Mode>,
    #[clap(long, action, help = "Don't animate carving and solving")]
    pub no_animation: bool,
    #[clap(short, long, action, help = "Reset config to default and quit")]
    pub reset_config: bool,
    #[clap(long, action, help = "Show config path and quit")]
    pub show_config_path: bool,
    #[clap(long, help = "Show config in debug format and quit")]
    pub debug_config: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
    /// Why the defaults were used instead of the arguments, if they were.
    pub notice: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("minimum dimensions are {min}x{min}, got {rows}x{cols}", min = MIN_LOGICAL_SIZE)]
pub struct DimensionsTooSmall {
    pub rows: i64,
    pub cols: i64,
}

/// Picks the maze size from the arguments, falling back to `default` when
/// they are missing or not numbers. Any number below the minimum is an error,
/// negative ones included.
pub fn resolve_dims(
    rows: Option<&str>,
    cols: Option<&str>,
    default: (usize, usize),
) -> Result<Dimensions, DimensionsTooSmall> {
    let default_i64 = |value: usize| i64::try_from(value).unwrap_or(i64::MAX);
    let default = (default_i64(default.0), default_i64(default.1));

    let (rows, cols, notice) = match (rows, cols) {
        (Some(rows), Some(cols)) => match (rows.trim().parse::<i64>(), cols.trim().parse::<i64>()) {
            (Ok(rows), Ok(cols)) => (rows, cols, None),
            _ => {
                log::warn!("Invalid dimensions '{}x{}', using defaults", rows, cols);
                let notice = format!(
                    "Invalid dimensions '{} {}', using {}x{}.",
                    rows, cols, default.0, default.1
                );
                (default.0, default.1, Some(notice))
            }
        },
        _ => {
            let notice = format!(
                "No dimensions given, using {}x{} by default.",
                default.0, default.1
            );
            (default.0, default.1, Some(notice))
        }
    };

    match (usize::try_from(rows), usize::try_from(cols)) {
        (Ok(r), Ok(c)) if r >= MIN_LOGICAL_SIZE && c >= MIN_LOGICAL_SIZE => Ok(Dimensions {
            rows: r,
            cols: c,
            notice,
        }),
        _ => Err(DimensionsTooSmall { rows, cols }),
    }
}
