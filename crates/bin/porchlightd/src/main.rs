//! # porchlightd — porch-light daemon
//!
//! Reads camera notifications as JSON lines on stdin and switches the
//! configured Hue lights while it is dark. With
//! `integrations.virtual_enabled` every collaborator is simulated instead.

use std::time::Duration;

use anyhow::Context;

use porchlight_adapter_hue::HueBridge;
use porchlight_adapter_jsonl::JsonLinesSource;
use porchlight_adapter_sunrise_sunset::SunriseSunsetOracle;
use porchlight_adapter_virtual::{FixedDaylight, Sky, VirtualBridge, VirtualCamera};
use porchlight_app::dispatcher::RunSummary;
use porchlight_domain::detection::SubjectType;
use porchlightd::config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let (filter, invalid_filter) = porchlightd::log_filter(&config.logging.filter);
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if let Some(err) = invalid_filter {
        tracing::warn!(filter = %config.logging.filter, %err, "invalid log filter, falling back to info");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let result = runtime.block_on(serve(config));
    // A blocked stdin read never returns on its own.
    runtime.shutdown_timeout(Duration::from_secs(1));

    let summary = result?;
    tracing::info!(
        detections = summary.detections,
        turned_on = summary.turned_on,
        turned_off = summary.turned_off,
        cancelled_pending = summary.cancelled_pending,
        "porchlightd stopped"
    );
    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<RunSummary> {
    let settings = config.settings()?;
    let capacity = config.automation.queue_capacity;

    if config.integrations.virtual_enabled {
        tracing::warn!("virtual integration enabled, no real lights will be switched");
        let bridge = VirtualBridge::with_lights(settings.lights().iter());
        let camera = VirtualCamera::new(
            settings.camera(),
            SubjectType::Human,
            config.virtual_camera_interval(),
        );
        return porchlightd::run(
            settings,
            FixedDaylight::new(Sky::Dark),
            bridge,
            camera,
            capacity,
            shutdown_signal(),
        )
        .await
        .context("startup checks failed");
    }

    let bridge = HueBridge::new(&config.hue).context("failed to build Hue client")?;
    let oracle =
        SunriseSunsetOracle::new(&config.daylight).context("failed to build daylight client")?;
    tracing::info!(host = %config.hue.host, "using Hue bridge");
    porchlightd::run(
        settings,
        oracle,
        bridge,
        JsonLinesSource::stdin(),
        capacity,
        shutdown_signal(),
    )
    .await
    .context("startup checks failed")
}

/// Completes on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
