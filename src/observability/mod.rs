//! Observability for optgen
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary (see [`init_logging`]).
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation outcomes
//! 3. Deterministic field names, one event per line

mod events;

pub use events::Event;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to `default_level` when the variable is unset.
///
/// Calling it twice is harmless; the second registration is ignored.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging("warn");
        init_logging("debug");
    }
}
