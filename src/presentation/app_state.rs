// Application state for HTTP handlers
use crate::application::command_dispatcher::CommandDispatcher;
use crate::application::connection_manager::ConnectionStatus;
use crate::application::dashboard_service::DashboardService;
use crate::application::snapshot_store::SnapshotReader;
use crate::domain::dashboard::DashboardView;

#[derive(Clone)]
pub struct AppState {
    pub snapshot: SnapshotReader,
    pub connection: ConnectionStatus,
    pub dashboard_service: DashboardService,
    pub commands: CommandDispatcher,
}

impl AppState {
    /// Build the full view from whatever snapshot is current right now.
    pub fn current_view(&self) -> DashboardView {
        let snapshot = self.snapshot.current();
        self.dashboard_service.build(&snapshot, self.connection.current())
    }
}
