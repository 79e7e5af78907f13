//! Focus Ring - A Pomodoro timer daemon
//!
//! This is the main entry point for the focus-ring application.

use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{info, warn};

use focus_ring::{
    api::create_router,
    clock::TokioClock,
    config::Config,
    presenter::DesktopPresenter,
    services::{check_command_available, SoundPlayer},
    state::AppState,
    store::JsonFileStore,
    tasks::spawn_timer_driver,
    timer::PomodoroTimer,
    utils::shutdown_signal,
};

const DRIVER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_ring={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-ring v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}", config.host, config.port);

    // Sound and notifications are optional; missing tools only disable them
    let player = if config.no_sound {
        None
    } else {
        if let Err(e) = check_command_available(&config.player).await {
            warn!("{}, ambient sound will not play", e);
        }
        Some(SoundPlayer::new(config.player.clone(), config.sound_dir.clone()))
    };
    let notifications = !config.no_notify;
    if notifications {
        if let Err(e) = check_command_available("notify-send").await {
            warn!("{}, completion notifications will fail", e);
        }
    }

    let store_path = config.store_path();
    info!("Using store {}", store_path.display());
    let store = JsonFileStore::open(store_path);

    // Create the timer and hand it to its driver task
    let (clock, ticks) = TokioClock::new();
    let presenter = DesktopPresenter::new(player, notifications);
    let timer = PomodoroTimer::new(store, presenter, clock);
    let (timer_handle, driver) = spawn_timer_driver(timer, ticks);

    let state = Arc::new(AppState::new(timer_handle, config.port, config.host.clone()));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start   - Start or resume the countdown");
    info!("  POST /pause   - Pause the countdown");
    info!("  POST /reset   - Reset to a full work interval");
    info!("  PUT  /config  - Set work_minutes / break_minutes");
    info!("  PUT  /sound   - Pick ambient sound (none, rain, forest, waves)");
    info!("  PUT  /theme   - Toggle dark mode");
    info!("  GET  /status  - Current countdown and statistics");
    info!("  GET  /health  - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Dropping the last handle stops the driver, which cancels ticks and sound.
    // Open keep-alive connections may still hold a handle, hence the timeout.
    drop(state);
    match tokio::time::timeout(DRIVER_SHUTDOWN_TIMEOUT, driver).await {
        Ok(Ok(store)) => info!("Timer stopped, store at {}", store.path().display()),
        Ok(Err(e)) => warn!("Timer driver ended abnormally: {}", e),
        Err(_) => warn!("Timer driver still busy after {:?}, exiting", DRIVER_SHUTDOWN_TIMEOUT),
    }

    info!("Server shutdown complete");
    Ok(())
}
