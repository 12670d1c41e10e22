#![cfg(test)]

//! Logging bootstrap for unit tests: idempotent, captured by the test
//! harness, level from `TEST_LOG` then `RUST_LOG`, default "warn".

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: OnceCell<()> = OnceCell::new();

fn filter_from_env() -> EnvFilter {
    std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

pub fn init() {
    INIT.get_or_init(|| {
        // try_init: another subscriber may already be installed
        fmt()
            .with_env_filter(filter_from_env())
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
