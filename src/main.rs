use anyhow::Result;
use brocante_scout::api::telegram::STARTUP_MESSAGE;
use brocante_scout::core::{health, logging, Config};
use brocante_scout::scanner::{scheduler, ScoutContext};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    logging::init_logging(&config.monitoring.log_level);

    tracing::info!("🚀 Brocante scout starting...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Seen store: {}", config.storage.seen_file.display());

    let ctx = ScoutContext::from_config(&config).await?;
    let shutdown = CancellationToken::new();

    // Start health check endpoint
    let health_checker = ctx.health.clone();
    let health_port = config.monitoring.health_port;
    let health_shutdown = shutdown.clone();
    let health_task = tokio::spawn(async move {
        if let Err(e) = health::serve(health_checker, health_port, health_shutdown).await {
            tracing::error!("❌ Health endpoint failed: {}", e);
        }
    });

    if config.telegram.send_startup_message {
        if let Err(e) = ctx.notifier.send(STARTUP_MESSAGE).await {
            tracing::warn!("Startup message not delivered: {}", e);
        }
    }

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Shutdown requested");
        signal_shutdown.cancel();
    });

    let ctx = scheduler::run(ctx, shutdown.clone()).await;
    shutdown.cancel();
    health_task.await.ok();

    tracing::info!(
        "👋 Stopped after {} notifications ({} links remembered)",
        ctx.metrics.get_notifications_sent(),
        ctx.seen.len()
    );
    Ok(())
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable: {}", e);
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.ok();
    }
}
