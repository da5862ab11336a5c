//! Terminal logging using simplelog
//!
//! Logs go to stderr so stdout stays clean for the fetched JSON.

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// Parse a `RUST_LOG` value, unknown values fall back to info
fn parse_level(value: &str) -> LevelFilter {
    match value.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Initialize stderr logging, level taken from `RUST_LOG` (default info)
pub fn init() {
    let level = std::env::var("RUST_LOG")
        .map(|v| parse_level(&v))
        .unwrap_or(LevelFilter::Info);

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c) // Fallback if local time offset fails
        .build();

    // A second init (e.g. from tests) is harmless
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
