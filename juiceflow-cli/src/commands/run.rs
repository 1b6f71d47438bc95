//! `run` command implementation.

use anyhow::{Context, Result};
use juiceflow::config::SimulationConfig;
use juiceflow::simulation::Simulation;
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::RunArgs;

/// Execute the `run` command
pub async fn run_simulation(args: &RunArgs) -> Result<()> {
    let config = resolve_config(args)?;
    info!(
        plants = config.plants,
        run_for_ms = config.run_for_ms,
        items_per_bottle = config.plant.items_per_bottle,
        drain = %config.plant.drain,
        "Configuration loaded"
    );

    let mut simulation = Simulation::new(config.clone()).context("Failed to build plants")?;
    simulation.start().context("Failed to start plants")?;

    tokio::select! {
        () = tokio::time::sleep(config.run_for()) => {
            info!("Run window elapsed");
        }
        () = shutdown_signal() => {
            warn!("Received shutdown signal, stopping plants early...");
        }
    }

    // Joining blocks on plant threads, keep it off the async workers.
    let report = tokio::task::spawn_blocking(move || {
        simulation.stop();
        simulation.join()
    })
    .await
    .context("Shutdown task failed")?
    .context("Plant failed during the run")?;

    if args.json {
        println!("{}", report.to_json().context("Failed to encode report")?);
    } else {
        for plant in &report.plants {
            println!(
                "Plant {}: provided {}, processed {}, bottles {}, wasted {}",
                plant.plant_id, plant.produced, plant.processed, plant.bottles, plant.waste
            );
        }
        println!("{report}");
    }
    Ok(())
}

/// Loads the configuration file, if any, and applies CLI overrides.
pub fn resolve_config(args: &RunArgs) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(plants) = args.plants {
        config.plants = plants;
    }
    if let Some(secs) = args.duration_secs {
        anyhow::ensure!(
            secs.is_finite() && secs > 0.0,
            "--duration-secs must be a positive number, got {secs}"
        );
        config = config.with_run_for(Duration::from_secs_f64(secs));
    }
    if let Some(items_per_bottle) = args.items_per_bottle {
        config.plant.items_per_bottle = items_per_bottle;
    }
    if let Some(drain) = args.drain {
        config.plant.drain = drain.into();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
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
