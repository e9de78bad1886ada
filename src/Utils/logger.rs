//! logger set-up: terminal output and, on request, a timestamped log file
use crate::numerical::adaptive_refinement::error::RefinementError;
use chrono::Local;
use simplelog::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// "debug", "info", "warn", "error" or "off"; None means info
pub fn parse_level(loglevel: Option<&str>) -> Result<LevelFilter, RefinementError> {
    match loglevel {
        None => Ok(LevelFilter::Info),
        Some(level) => match level.to_lowercase().as_str() {
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" => Ok(LevelFilter::Warn),
            "error" => Ok(LevelFilter::Error),
            "off" => Ok(LevelFilter::Off),
            other => Err(RefinementError::InvalidConfig(format!(
                "loglevel must be debug, info, warn, error or off, got '{}'",
                other
            ))),
        },
    }
}
/// log_<date>_<time>.txt in `dir`
pub fn timestamped_log_file(dir: &Path) -> PathBuf {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    dir.join(format!("log_{}.txt", date_and_time))
}

/// Installs the global logger.
///
/// Returns Ok(false) when a logger was already installed (e.g. by an earlier call or by
/// the host application), which is not treated as an error.
pub fn init_logger(
    loglevel: Option<&str>,
    log_file: Option<&Path>,
) -> Result<bool, RefinementError> {
    let level = parse_level(loglevel)?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(level, Config::default(), File::create(path)?));
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => {
            log::info!("logger started with level {}", level);
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}
