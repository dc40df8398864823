//! Vigil - autonomous wallet agent.
//!
//! Wakes on a fixed interval, checks its wallet, decides what to do with an
//! LLM and occasionally tells the world about it.

use anyhow::Result;
use std::sync::Arc;
use vigil_common::config::Config;
use vigil_common::logging::init_logging;
use vigil_daemon::{build_runner, load_system_prompt, shutdown_signal, Scheduler};

#[tokio::main]
async fn main() -> Result<()> {
    // Start timing immediately for cold-start measurement
    let startup_start = std::time::Instant::now();

    // Load configuration
    let config = Config::load_with_env()?;

    // Initialize logging
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("Vigil v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("{}", e));
    }

    let system_prompt = load_system_prompt(&config.agent.system_prompt_path())?;
    let runner = Arc::new(build_runner(&config, &system_prompt)?);
    let scheduler = Scheduler::new(runner, config.agent.cycle_interval());
    let shutdown = shutdown_signal()?;

    // Log startup timing before entering the main loop
    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        wallet = %config.agent.wallet_address,
        "Agent initialized in {:?}",
        startup_duration
    );

    scheduler.run_until(shutdown).await;

    tracing::info!("Vigil stopped");
    Ok(())
}
