// HTTP request handlers
use crate::domain::connection::ConnectionState;
use crate::domain::telemetry::TelemetrySnapshot;
use crate::presentation::app_state::AppState;
use crate::presentation::page::render_page;
use crate::presentation::svg::{chart_svg, gauge_svg, meter_svg};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct CommandQuery {
    pub redirect: Option<u8>,
}

#[derive(Serialize)]
pub struct ConnectionBody {
    pub state: ConnectionState,
    pub label: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full dashboard page
pub async fn dashboard_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_page(&state.current_view()))
}

/// Current snapshot as JSON
pub async fn snapshot(State(state): State<Arc<AppState>>) -> Json<TelemetrySnapshot> {
    Json(state.snapshot.current().as_ref().clone())
}

pub async fn connection(State(state): State<Arc<AppState>>) -> Json<ConnectionBody> {
    let current = state.connection.current();
    Json(ConnectionBody {
        state: current,
        label: current.label(),
    })
}

/// Single widget fragment: glucose-chart, insulin-chart, glucose-gauge, glucose-meter
pub async fn fragment(Path(name): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let view = state.current_view();
    let markup = match name.as_str() {
        "glucose-chart" => chart_svg(&view.glucose.chart, "glucose"),
        "insulin-chart" => chart_svg(&view.algorithm.chart, "insulin"),
        "glucose-gauge" => gauge_svg(&view.glucose.gauge),
        "glucose-meter" => meter_svg(&view.glucose.meter),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    Html(markup).into_response()
}

/// Fire a control command and return immediately
pub async fn command(
    Path(action): Path<String>,
    Query(query): Query<CommandQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let commands = &state.commands;
    match action.as_str() {
        "toggle" => {
            let sent = commands.toggle_running();
            tracing::debug!("Toggle resolved to {:?}", sent);
        }
        "start" => commands.start(),
        "stop" => commands.stop(),
        "spike" => commands.trigger_spike(),
        "cooler" => commands.toggle_cooler(),
        _ => return StatusCode::NOT_FOUND.into_response(),
    }

    if query.redirect.unwrap_or(0) != 0 {
        Redirect::to("/").into_response()
    } else {
        StatusCode::ACCEPTED.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::command_dispatcher::{
        CommandDispatcher, CommandError, CommandTransport, DeviceCommand,
    };
    use crate::application::connection_manager::ConnectionManager;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::snapshot_store::SnapshotStore;
    use crate::application::telemetry_link::{LinkError, LinkSession, TelemetryLink};
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct RecordingTransport(mpsc::UnboundedSender<DeviceCommand>);

    #[async_trait]
    impl CommandTransport for RecordingTransport {
        async fn send(&self, command: DeviceCommand) -> Result<(), CommandError> {
            let _ = self.0.send(command);
            Ok(())
        }
    }

    struct RefusingLink;

    #[async_trait]
    impl TelemetryLink for RefusingLink {
        async fn open(&self) -> Result<Box<dyn LinkSession>, LinkError> {
            Err(LinkError::Open("offline".to_string()))
        }
    }

    async fn app_state() -> (Arc<AppState>, mpsc::UnboundedReceiver<DeviceCommand>) {
        let store = SnapshotStore::new();
        let reader = store.reader();
        let (tx, rx) = mpsc::unbounded_channel();
        let commands = CommandDispatcher::new(Arc::new(RecordingTransport(tx)), reader.clone());
        let handle =
            ConnectionManager::new(Arc::new(RefusingLink), store, Duration::from_secs(3)).spawn();
        let connection = handle.status();
        handle.teardown().await;

        let state = Arc::new(AppState {
            snapshot: reader,
            connection,
            dashboard_service: DashboardService::new(),
            commands,
        });
        (state, rx)
    }

    #[tokio::test]
    async fn test_command_routes() {
        let (state, mut sent) = app_state().await;

        let response = command(
            Path("spike".to_string()),
            Query(CommandQuery { redirect: None }),
            State(state.clone()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(sent.recv().await, Some(DeviceCommand::Spike));

        let response = command(
            Path("toggle".to_string()),
            Query(CommandQuery { redirect: Some(1) }),
            State(state.clone()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(sent.recv().await, Some(DeviceCommand::Start));

        let response = command(
            Path("reboot".to_string()),
            Query(CommandQuery { redirect: None }),
            State(state),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fragments() {
        let (state, _sent) = app_state().await;

        let response = fragment(Path("glucose-gauge".to_string()), State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = fragment(Path("nope".to_string()), State(state)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_snapshot_and_connection_bodies() {
        let (state, _sent) = app_state().await;

        let Json(body) = snapshot(State(state.clone())).await;
        assert_eq!(body, TelemetrySnapshot::default());
        let Json(body) = connection(State(state)).await;
        assert_eq!(body.label, body.state.label());
    }
}
