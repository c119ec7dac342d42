//! # porchlightd
//!
//! Composition root for the porch-light automation.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Check the light bridge is reachable and knows the configured lights
//! - Wire the daylight oracle, light bridge and notification source into a
//!   [`Dispatcher`]
//! - Run until the source ends or a shutdown signal arrives
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

pub mod config;

use std::future::Future;

use porchlight_app::dispatcher::{Dispatcher, RunSummary};
use porchlight_app::ports::{DaylightOracle, LightBridge, NotificationSource};
use porchlight_app::services::light_group::LightGroupController;
use porchlight_domain::automation::AutomationSettings;
use porchlight_domain::error::DeviceError;
use porchlight_domain::light::LightGroup;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Fatal problems found before the automation starts.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The bridge could not list its lights.
    #[error("light bridge unreachable")]
    Bridge(#[from] DeviceError),

    /// The bridge knows none of the configured lights.
    #[error("none of the configured lights ({configured}) exist on the bridge")]
    NoLights { configured: String },
}

/// Check the bridge answers and knows at least one light of `group`.
///
/// Names the bridge does not know are logged; they are tolerated as long as
/// one light is left to switch. Returns how many configured names matched.
///
/// # Errors
///
/// Returns [`StartupError::Bridge`] if the bridge cannot be listed and
/// [`StartupError::NoLights`] if no configured name matches.
pub async fn check_lights<B: LightBridge>(
    bridge: &B,
    group: &LightGroup,
) -> Result<usize, StartupError> {
    let members = LightGroupController::new(bridge).members(group).await?;
    let found = group.len() - members.missing.len();
    if found == 0 {
        return Err(StartupError::NoLights {
            configured: group.to_string(),
        });
    }
    tracing::info!(found, configured = group.len(), "light bridge ready");
    Ok(found)
}

/// Parse the log filter `directives`, falling back to `info` when they are
/// invalid.
///
/// The parse error is handed back so it can be logged once the subscriber is
/// installed.
#[must_use]
pub fn log_filter(directives: &str) -> (EnvFilter, Option<ParseError>) {
    match EnvFilter::try_new(directives) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new("info"), Some(err)),
    }
}

/// Check the bridge, then run the automation until `source` ends (and any
/// pending turn-off has fired) or `shutdown` completes.
///
/// # Errors
///
/// Returns a [`StartupError`] if [`check_lights`] fails. Nothing after
/// startup is fatal.
pub async fn run<O, B, S>(
    settings: AutomationSettings,
    oracle: O,
    bridge: B,
    source: S,
    capacity: usize,
    shutdown: impl Future<Output = ()>,
) -> Result<RunSummary, StartupError>
where
    O: DaylightOracle,
    B: LightBridge,
    S: NotificationSource + Send + 'static,
{
    check_lights(&bridge, settings.lights()).await?;

    let (dispatcher, sink) = Dispatcher::new(settings, oracle, bridge, capacity);
    let source_name = source.name();
    let source_task = tokio::spawn(async move {
        match source.subscribe(sink).await {
            Ok(()) => tracing::info!(source = source_name, "notification source finished"),
            Err(err) => tracing::error!(source = source_name, %err, "notification source failed"),
        }
    });

    let summary = dispatcher.run_until(shutdown).await;
    source_task.abort();
    Ok(summary)
}
