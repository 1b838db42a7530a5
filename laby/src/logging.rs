use std::{
    io::{self, Write},
    sync::{Mutex, MutexGuard, OnceLock, RwLock},
    time::Instant,
};

use log::{LevelFilter, Log, Metadata, Record};

static LOGGER: OnceLock<AppLogger> = OnceLock::new();

pub fn get_logger() -> &'static AppLogger {
    LOGGER.get_or_init(|| AppLogger::new(LevelFilter::Warn))
}

/// Installs the logger. Messages are kept in memory until [`AppLogger::flush`],
/// since the terminal is owned by the renderer most of the time.
pub fn init(level: LevelFilter) {
    let logger = get_logger();
    logger.set_level(level);

    if log::set_logger(logger).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

#[derive(Clone, Debug)]
pub struct Message {
    pub level: log::Level,
    pub pushed: Instant,
    pub message: String,
    pub source: String,
}

impl Message {
    pub fn format(&self, since: Instant) -> String {
        let at = self.pushed.saturating_duration_since(since);
        format!(
            "[{:>8.3}s {:<5} {}] {}",
            at.as_secs_f32(),
            self.level,
            self.source,
            self.message
        )
    }
}

pub struct AppLogger {
    level: RwLock<LevelFilter>,
    created: Instant,
    logs: Mutex<Vec<Message>>,
}

impl AppLogger {
    pub(crate) fn new(level: LevelFilter) -> Self {
        Self {
            level: RwLock::new(level),
            created: Instant::now(),
            logs: Mutex::new(Vec::new()),
        }
    }

    pub fn level(&self) -> LevelFilter {
        *self.level.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_level(&self, level: LevelFilter) {
        *self.level.write().unwrap_or_else(|e| e.into_inner()) = level;
    }

    fn borrow_mut_logs(&self) -> MutexGuard<Vec<Message>> {
        // a panicking thread only loses its own message
        self.logs.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn take_logs(&self) -> Vec<Message> {
        std::mem::take(&mut *self.borrow_mut_logs())
    }

    /// Writes out and forgets every buffered message.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        for log in self.take_logs() {
            writeln!(out, "{}", log.format(self.created))?;
        }
        out.flush()
    }
}

impl Log for AppLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.borrow_mut_logs().push(Message {
                level: record.level(),
                pushed: Instant::now(),
                message: record.args().to_string(),
                source: record.module_path().unwrap_or("unknown").to_string(),
            });
        }
    }

    fn flush(&self) {
        let _ = self.write_to(&mut io::stderr());
    }
}
