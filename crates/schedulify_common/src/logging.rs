//! Logging utilities for the Schedulify crates.
//!
//! This module provides a standardized approach to logging across the
//! workspace. Call `init` (or `init_with_level`) once at startup; repeated
//! calls are safe because initialization goes through `try_init`.

use tracing::{info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with the default log level (INFO).
///
/// # Examples
///
/// ```
/// use schedulify_common::logging;
///
/// logging::init();
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives still take precedence for the targets they name;
/// `level` sets the default for everything else.
pub fn init_with_level(level: Level) {
    let filter =
        EnvFilter::from_default_env().add_directive(LevelFilter::from_level(level).into());

    // Use try_init to handle the case where a global default subscriber has
    // already been set (tests, embedding applications).
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}
