//! Logging initialization module
//!
//! Provides a single initialization point for the diagnostics subscriber.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Initialize the diagnostics subscriber
///
/// Only the first call has any effect.
///
/// # Profiles
///
/// - **Development**: Human-readable output, `faclog=debug` unless `RUST_LOG` is set
/// - **Production**: JSON output, `faclog=info` unless `RUST_LOG` is set
/// - **Test**: Bare registry; use `init_test_capture()` to assert on events
///
/// # Example
///
/// ```
/// use faclog_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        // A subscriber installed by the host application takes precedence
        let _installed = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(env_filter(profile))
                .with_writer(std::io::stderr)
                .try_init()
                .is_ok(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(env_filter(profile))
                .with_writer(std::io::stderr)
                .try_init()
                .is_ok(),
            Profile::Test => tracing_subscriber::registry().try_init().is_ok(),
        };
    });
}

/// `RUST_LOG` when set, otherwise the profile's default directive
fn env_filter(profile: Profile) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(profile.default_directive()))
}

impl Profile {
    /// Filter directive used when `RUST_LOG` is unset
    pub fn default_directive(self) -> &'static str {
        match self {
            Profile::Development => "faclog=debug",
            Profile::Production | Profile::Test => "faclog=info",
        }
    }
}
