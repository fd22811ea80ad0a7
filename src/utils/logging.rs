// Sat Oct 17 2026 - Alex

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::time::Instant;

pub struct LoggingUtils;

impl LoggingUtils {
    /// Installs the colored stderr logger, or `env_logger` when `RUST_LOG`
    /// is set.
    pub fn init(level: LevelFilter, use_color: bool) {
        if std::env::var_os("RUST_LOG").is_some() {
            Self::init_from_env();
            return;
        }
        let logger = Box::new(ColoredLogger::new(level, use_color));
        if log::set_boxed_logger(logger).is_ok() {
            log::set_max_level(level);
        }
    }

    pub fn init_from_env() {
        let _ = env_logger::Builder::from_default_env()
            .format_timestamp(None)
            .try_init();
    }

    pub fn level_from_str(s: &str) -> LevelFilter {
        match s.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }
}

struct ColoredLogger {
    level: LevelFilter,
    use_color: bool,
}

impl ColoredLogger {
    fn new(level: LevelFilter, use_color: bool) -> Self {
        Self { level, use_color }
    }

    fn format_level(&self, level: Level) -> String {
        if !self.use_color {
            return format!("{:5}", level);
        }
        match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".green().bold(),
            Level::Debug => "DEBUG".blue().bold(),
            Level::Trace => "TRACE".magenta().bold(),
        }
        .to_string()
    }
}

impl Log for ColoredLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let target = format!("[{}]", record.target());
        let target = if self.use_color { target.dimmed().to_string() } else { target };
        eprintln!("{} {} {}", self.format_level(record.level()), target, record.args());
    }

    fn flush(&self) {}
}

/// Debug-logs how long it lived.
pub struct ScopedTimer {
    name: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(name: &str) -> Self {
        log::debug!("[TIMER] {} started", name);
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        log::debug!("[TIMER] {} took {:.2}ms", self.name, elapsed.as_secs_f64() * 1000.0);
    }
}

pub fn scoped_timer(name: &str) -> ScopedTimer {
    ScopedTimer::new(name)
}
