//! Tracing subscriber setup shared by the binary and the test suite

use tracing::Metadata;
use tracing_subscriber::filter::{filter_fn, FilterFn};
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Targets that log too much at debug level to be useful here.
const NOISY_MODULES: &[&str] = &["config::"];

fn quiet_noisy_modules() -> FilterFn<impl Fn(&Metadata<'_>) -> bool> {
    filter_fn(|metadata| {
        !NOISY_MODULES
            .iter()
            .any(|name| metadata.target().starts_with(name))
    })
}

/// Level for `-d` repeated `count` times; `RUST_LOG` wins when set.
pub fn verbosity_filter(count: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = match count {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

/// Install a stderr subscriber with span enter/close events.
///
/// A second call is a no-op, so tests can race to initialise.
pub fn install(filter: EnvFilter) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
        .with_filter(quiet_noisy_modules())
        .with_filter(filter);

    if let Err(e) = tracing_subscriber::registry().with(layer).try_init() {
        eprintln!("Error: Failed to set up logging: {e}");
    }
}

