//! One-time logging setup for unit and integration tests

use std::sync::Once;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::util::logging;

static TEST_SETUP: Once = Once::new();

/// Log everything at trace unless `RUST_LOG` narrows it.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));
        logging::install(filter);
        info!("Test Setup complete");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_repeated_setup_when_initialising_then_subscriber_installed_once() {
        init_test_setup();
        init_test_setup();

        assert!(tracing::dispatcher::has_been_set());
    }
}
