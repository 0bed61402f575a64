//! ui::logging
//!
//! Tracing subscriber installation for the binary.
//!
//! Library code only emits `tracing` events; nothing is printed unless a
//! subscriber is installed. `RUST_LOG` always wins over the flags.

use tracing_subscriber::{fmt, EnvFilter};

use super::output::Verbosity;

/// Default filter for a verbosity level.
pub fn default_filter(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Debug => "gitgraph=debug",
        Verbosity::Normal => "warn",
        Verbosity::Quiet => "error",
    }
}

/// Install a stderr `fmt` subscriber. Repeated calls are ignored.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(verbosity == Verbosity::Debug)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_enables_crate_events() {
        assert_eq!(default_filter(Verbosity::Debug), "gitgraph=debug");
        assert_eq!(default_filter(Verbosity::Normal), "warn");
    }

    #[test]
    fn init_twice_is_harmless() {
        init(Verbosity::Quiet);
        init(Verbosity::Debug);
    }
}
