//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::{AppState, FieldInput, TimerSnapshot};
use super::responses::{ApiResponse, HealthResponse, IntervalForm, StatusResponse};

/// Build the response for an action, or 500 if state could not be read
fn respond(state: &AppState, message: &str, snapshot: TimerSnapshot) -> Result<Json<ApiResponse>, StatusCode> {
    match state.render(&snapshot) {
        Ok(view) => Ok(Json(ApiResponse::new(message.to_string(), view, snapshot))),
        Err(e) => {
            error!("Failed to render timer view: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Parse a form field, mapping unparsable text to 422
fn parse_field(name: &str, raw: &str) -> Result<FieldInput, StatusCode> {
    raw.parse().map_err(|e| {
        info!("Unparsable {} input {:?}: {}", name, raw, e);
        StatusCode::UNPROCESSABLE_ENTITY
    })
}

/// Handle POST /start - Start or restart the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok(snapshot) => {
            let message = if snapshot.running {
                "Countdown started"
            } else {
                "Interval is empty, countdown not started"
            };
            respond(&state, message, snapshot)
        }
        Err(e) => {
            error!("Failed to start countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stop - Stop the countdown
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.stop() {
        Ok(snapshot) => respond(&state, "Countdown stopped", snapshot),
        Err(e) => {
            error!("Failed to stop countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /interval - Apply the settings form
pub async fn interval_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<IntervalForm>,
) -> Result<Json<ApiResponse>, StatusCode> {
    // Parse everything first so a bad field leaves the configuration untouched
    let minutes = form.minutes.as_deref().map(|raw| parse_field("minutes", raw)).transpose()?;
    let seconds = form.seconds.as_deref().map(|raw| parse_field("seconds", raw)).transpose()?;
    let repetitions = form.repetitions.as_deref().map(|raw| parse_field("repetitions", raw)).transpose()?;

    let result = state.with_engine(Some("interval"), |engine| {
        if let Some(input) = minutes {
            engine.set_minutes(input);
        }
        if let Some(input) = seconds {
            engine.set_seconds(input);
        }
        if let Some(input) = repetitions {
            engine.set_repetitions(input);
        }
    });

    match result {
        Ok((_, snapshot)) => respond(&state, "Interval updated", snapshot),
        Err(e) => {
            error!("Failed to update interval: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /clear - Reset the interval and close the form
pub async fn clear_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let snapshot = match state.clear_interval() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to clear interval: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if let Err(e) = state.close_form() {
        error!("Failed to close settings form: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    respond(&state, "Interval cleared", snapshot)
}

/// Handle POST /form/toggle - Open or close the settings form
pub async fn form_toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let open = match state.toggle_form() {
        Ok(open) => open,
        Err(e) => {
            error!("Failed to toggle settings form: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let snapshot = match state.get_snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    respond(&state, if open { "Settings form opened" } else { "Settings form closed" }, snapshot)
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = match state.get_snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let view = match state.render(&snapshot) {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to render timer view: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let update_rate_ms = match state.engine.lock() {
        Ok(engine) => engine.update_rate().as_millis() as u64,
        Err(e) => {
            error!("Failed to lock timer engine: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        view,
        timer: snapshot,
        update_rate_ms,
        display_format: state.display_format.to_string(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
