//! Tracing subscriber setup for embedders and tests.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the host. These helpers install the usual stdout setup with an `EnvFilter`
//! read from `RUST_LOG` (default `info`).

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install human-readable stdout logging.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init() -> bool {
    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer())
        .try_init()
        .is_ok()
}

/// Install JSON stdout logging, one object per event.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_json() -> bool {
    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().json())
        .try_init()
        .is_ok()
}
