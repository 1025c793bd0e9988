use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
const DEV_FILTER: &str = "debug,hyper=info,sqlx=warn,sea_orm=info";
const PROD_FILTER: &str = "info,sqlx=warn,sea_orm=warn";

/// Install the color-eyre report hook.
///
/// Shows the file:line where an error was created and hides the
/// environment section. Safe to call more than once.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize the global subscriber for `environment`.
///
/// - **Production**: flattened JSON events, no module targets.
/// - **Local / Development**: pretty human-readable output.
///
/// Both variants carry `tracing_error::ErrorLayer` so eyre reports include
/// span traces. `RUST_LOG` overrides the default filter. A second call is a
/// no-op, which keeps tests that initialize tracing independently happy.
pub fn init_tracing(environment: &Environment) {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if is_production { PROD_FILTER } else { DEV_FILTER })
    });

    let result = if is_production {
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
        Ok(_) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}
