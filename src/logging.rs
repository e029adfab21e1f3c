//! log4rs setup.
//!
//! Diagnostics go to stderr so stdout carries findings only.

use crate::config::Verbosity;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;

const STDERR_PATTERN: &str = "[{l}] {m}{n}";

/// Logger configuration for the given verbosity.
pub fn log_config(verbosity: Verbosity) -> Result<Config, Box<dyn Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(STDERR_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(
            Root::builder()
                .appender("stderr")
                .build(verbosity.level_filter()),
        )?;
    Ok(config)
}

/// Install the global logger. Call once from `main`.
pub fn init(verbosity: Verbosity) -> Result<log4rs::Handle, Box<dyn Error>> {
    let handle = log4rs::init_config(log_config(verbosity)?)?;
    Ok(handle)
}
