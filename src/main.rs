//! Countdown Timer - a countdown engine with an HTTP control surface
//! 
//! This is the main entry point for the countdown-timer application.

use std::sync::Arc;
use anyhow::anyhow;
use tokio::net::TcpListener;
use tracing::info;

use countdown_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{snapshot_log_task, tick_driver_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={},tower_http=info", config.log_level()))
        .init();

    let settings = config.timer_settings().map_err(|e| anyhow!(e))?;

    info!("Starting countdown-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, update_rate={}ms, display_format={}",
          config.host, config.port, config.update_rate, settings.display_format);

    // Create application state
    let (state, tick_rx) = AppState::new(config.port, config.host.clone(), settings);
    let state = Arc::new(state);

    // Feed scheduler wake-ups into the engine
    tokio::spawn(tick_driver_task(Arc::clone(&state), tick_rx));
    tokio::spawn(snapshot_log_task(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start       - Start or restart the countdown");
    info!("  POST /stop        - Stop the countdown");
    info!("  POST /interval    - Set minutes, seconds, repetitions");
    info!("  POST /clear       - Reset the interval");
    info!("  POST /form/toggle - Open or close the settings form");
    info!("  GET  /status      - Current timer view");
    info!("  GET  /health      - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to listen for signals: {}", e),
            }
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
