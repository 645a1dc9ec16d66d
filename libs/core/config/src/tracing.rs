use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

const PRODUCTION_FILTER: &str = "warn,tower_http=info";
const DEVELOPMENT_FILTER: &str = "debug,tower_http=debug,mongodb=info,hyper=info";

/// Install color-eyre for report formatting.
///
/// Shows the error location, hides the environment section. Calling it twice is a no-op.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Picks the log filter: `RUST_LOG` when set, otherwise the environment default.
fn build_filter(environment: &Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if environment.is_production() {
            EnvFilter::new(PRODUCTION_FILTER)
        } else {
            EnvFilter::new(DEVELOPMENT_FILTER)
        }
    })
}

/// Initialize the global subscriber.
///
/// Production writes flattened JSON lines for log aggregation; development
/// writes the pretty multi-line format. Both carry an `ErrorLayer` so
/// `eyre` reports include the active span trace.
///
/// Re-initialization (common in tests) is ignored.
pub fn init_tracing(environment: &Environment) {
    let filter = build_filter(environment);

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_multiple_calls() {
        init_tracing(&Environment::Development);
        init_tracing(&Environment::Production);
    }

    #[test]
    fn test_build_filter_prefers_rust_log() {
        temp_env::with_var("RUST_LOG", Some("error"), || {
            let filter = build_filter(&Environment::Development);
            assert_eq!(filter.to_string(), "error");
        });
    }

    #[test]
    fn test_build_filter_environment_defaults() {
        temp_env::with_var_unset("RUST_LOG", || {
            let prod = build_filter(&Environment::Production).to_string();
            assert!(prod.contains("warn"));

            let dev = build_filter(&Environment::Development).to_string();
            assert!(dev.contains("debug"));
        });
    }
}
