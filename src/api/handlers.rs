//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{extract::State, response::Json};
use tracing::{info, warn};

use crate::{
    error::TimerError,
    presenter::format_countdown,
    settings::is_valid_duration,
    state::AppState,
    tasks::TimerCommand,
};
use super::responses::{
    ApiError, ApiResponse, ConfigRequest, HealthResponse, SoundRequest, StatusResponse,
    ThemeRequest,
};

type ApiResult = Result<Json<ApiResponse>, ApiError>;

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let timer = state.send(TimerCommand::Start).await?;
    info!("Start endpoint called - {} interval running", timer.mode);
    Ok(Json(ApiResponse::ok("Timer started", timer)))
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let timer = state.send(TimerCommand::Pause).await?;
    info!("Pause endpoint called - {}s remaining", timer.remaining_seconds);
    Ok(Json(ApiResponse::ok("Timer paused", timer)))
}

/// Handle POST /reset - Back to a full work interval
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let timer = state.send(TimerCommand::Reset).await?;
    info!("Reset endpoint called");
    Ok(Json(ApiResponse::ok("Timer reset", timer)))
}

/// Handle PUT /config - Change work and/or break duration.
///
/// Both values are validated before either is applied.
pub async fn config_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConfigRequest>,
) -> ApiResult {
    let work = request.work_minutes.map(validate_minutes).transpose()?;
    let brk = request.break_minutes.map(validate_minutes).transpose()?;

    let mut timer = None;
    if let Some(minutes) = work {
        timer = Some(state.send(TimerCommand::SetWorkDuration(minutes)).await?);
    }
    if let Some(minutes) = brk {
        timer = Some(state.send(TimerCommand::SetBreakDuration(minutes)).await?);
    }

    match timer {
        Some(timer) => {
            info!(
                "Config endpoint called - work={}min, break={}min",
                timer.work_minutes, timer.break_minutes
            );
            Ok(Json(ApiResponse::ok("Configuration updated", timer)))
        }
        None => {
            warn!("Config endpoint called without changes");
            Ok(Json(ApiResponse::ok("Nothing to change", state.snapshot())))
        }
    }
}

/// Handle PUT /sound - Pick the ambient sound
pub async fn sound_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SoundRequest>,
) -> ApiResult {
    let timer = state.send(TimerCommand::SetSound(request.sound)).await?;
    info!("Sound endpoint called - {}", timer.sound);
    Ok(Json(ApiResponse::ok(format!("Sound set to {}", timer.sound), timer)))
}

/// Handle PUT /theme - Toggle dark mode
pub async fn theme_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ThemeRequest>,
) -> ApiResult {
    let timer = state.send(TimerCommand::SetDarkMode(request.dark_mode)).await?;
    let message = if timer.dark_mode { "Dark mode enabled" } else { "Dark mode disabled" };
    Ok(Json(ApiResponse::ok(message, timer)))
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.snapshot();
    let display = format_countdown(timer.remaining_seconds / 60, timer.remaining_seconds % 60);
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer,
        display,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

fn validate_minutes(minutes: i64) -> Result<u32, TimerError> {
    u32::try_from(minutes)
        .ok()
        .filter(|&m| is_valid_duration(m))
        .ok_or(TimerError::InvalidDuration(minutes))
}
