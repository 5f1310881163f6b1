//! Logger setup.

use log::LevelFilter;

use crate::error::Result;

/// Log level used when none is given: everything in debug builds, `Info` and
/// up in release builds.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn format_line(time: &str, level: log::Level, target: &str, message: &std::fmt::Arguments) -> String {
    format!("[{time} {level:<5} {target}] {message}")
}

/// Sends log records to stdout, prefixed with the local time, level and
/// module. Only this crate logs below `Warn`.
pub fn init(level: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let time = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
            out.finish(format_args!(
                "{}",
                format_line(&time, record.level(), record.target(), message)
            ))
        })
        .level(LevelFilter::Warn)
        .level_for(env!("CARGO_CRATE_NAME"), level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}
