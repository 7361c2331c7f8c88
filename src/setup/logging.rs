use colored::Colorize;
use env_logger::Builder;
use log::{LevelFilter, debug};
use std::io::Write;

/// Sets up the logging configuration for the application.
///
/// Log lines carry a colored level and the emitting module. The default level
/// is `Info`; `RUST_LOG` overrides it (e.g. `RUST_LOG=noteboard=trace`).
pub fn setup_log() {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            let l = record.level();
            let colored_level = match l {
                log::Level::Error => l.to_string().red().bold(),
                log::Level::Warn => l.to_string().yellow().bold(),
                log::Level::Info => l.to_string().green().bold(),
                log::Level::Debug => l.to_string().blue().bold(),
                log::Level::Trace => l.to_string().purple().bold(),
            };
            let target = record.target().dimmed();
            writeln!(buf, "{colored_level} {target} {}", record.args())
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env();

    if builder.try_init().is_err() {
        debug!("Logger already installed, keeping it");
    }
}
