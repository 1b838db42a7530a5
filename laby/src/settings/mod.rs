use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use log::LevelFilter;
use ron::{self, extensions::Extensions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::base_path;

const DEFAULT_SETTINGS: &str = include_str!("./default_settings.ron");

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read/write settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings file {path:?}: {err}")]
    Parse {
        path: PathBuf,
        err: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    pub carve: Duration,
    pub search: Duration,
    pub path: Duration,
    pub step: Duration,
}

impl Delays {
    pub const NONE: Delays = Delays {
        carve: Duration::ZERO,
        search: Duration::ZERO,
        path: Duration::ZERO,
        step: Duration::ZERO,
    };
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub default_rows: Option<usize>,
    #[serde(default)]
    pub default_cols: Option<usize>,
    #[serde(default)]
    pub animate: Option<bool>,
    #[serde(default)]
    pub carve_delay_ms: Option<u64>,
    #[serde(default)]
    pub search_delay_ms: Option<u64>,
    #[serde(default)]
    pub path_delay_ms: Option<u64>,
    #[serde(default)]
    pub move_delay_ms: Option<u64>,
    #[serde(default)]
    pub log_level: Option<LevelFilter>,

    #[serde(skip)]
    path: PathBuf,
}

impl Settings {
    pub fn default_path() -> PathBuf {
        base_path().join("settings.ron")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_default_dims(&self) -> (usize, usize) {
        (
            self.default_rows.unwrap_or(10),
            self.default_cols.unwrap_or(10),
        )
    }

    pub fn set_default_dims(mut self, rows: usize, cols: usize) -> Self {
        self.default_rows = Some(rows);
        self.default_cols = Some(cols);
        self
    }

    pub fn get_animate(&self) -> bool {
        self.animate.unwrap_or(true)
    }

    pub fn set_animate(mut self, value: bool) -> Self {
        self.animate = Some(value);
        self
    }

    pub fn get_delays(&self) -> Delays {
        let ms = |value: Option<u64>, default| Duration::from_millis(value.unwrap_or(default));

        Delays {
            carve: ms(self.carve_delay_ms, 50),
            search: ms(self.search_delay_ms, 20),
            path: ms(self.path_delay_ms, 50),
            step: ms(self.move_delay_ms, 50),
        }
    }

    pub fn get_log_level(&self) -> LevelFilter {
        self.log_level.unwrap_or(LevelFilter::Warn)
    }

    pub fn set_log_level(mut self, value: LevelFilter) -> Self {
        self.log_level = Some(value);
        self
    }

    fn options() -> ron::Options {
        ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, SettingsError> {
        let settings: Settings = Self::options()
            .from_str(text)
            .map_err(|err| SettingsError::Parse {
                path: path.to_owned(),
                err,
            })?;

        Ok(Settings {
            path: path.to_owned(),
            ..settings
        })
    }

    /// Loads settings, writing the defaults out first if the file doesn't exist yet.
    pub fn load(path: PathBuf) -> Result<Self, SettingsError> {
        match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text, &path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Self::reset_config(&path)?;
                Self::parse(DEFAULT_SETTINGS, &path)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Like [`Settings::load`], but falls back to defaults and logs the problem.
    pub fn load_or_default(path: PathBuf) -> Self {
        Self::load(path.clone()).unwrap_or_else(|err| {
            log::warn!("Using default settings: {}", err);
            Settings {
                path,
                ..Settings::default()
            }
        })
    }

    pub fn reset_config(path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_SETTINGS)?;
        Ok(())
    }
}
