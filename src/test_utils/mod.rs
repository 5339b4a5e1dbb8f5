//! Test utilities for bundlejam
//!
//! Logging setup and ready-made asset configurations for unit and integration
//! tests. Compiled for `cfg(test)` and behind the `test-utils` feature.
//!
//! # Example
//!
//! ```rust,no_run
//! use bundlejam::registry::AssetRegistry;
//! use bundlejam::test_utils::{fixtures, init_test_logging};
//!
//! init_test_logging(None);
//! let mut registry = AssetRegistry::new(fixtures::store(fixtures::ANGULAR_CHAIN));
//! registry.add_reference("angular-resource", Some("js")).unwrap();
//! ```

pub mod fixtures;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set, that level is used;
/// otherwise `RUST_LOG` is honored when present and logging stays off when
/// it is not.
///
/// ```bash
/// RUST_LOG=bundlejam=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
