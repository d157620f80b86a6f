// Dashboard service - derives the whole page view from one snapshot
use crate::application::chart_renderer::{ChartConfig, SeriesChartRenderer};
use crate::application::indicator_renderer::{IndicatorConfig, ScalarIndicatorRenderer};
use crate::domain::connection::ConnectionState;
use crate::domain::dashboard::{
    AlgorithmPanel, DashboardView, GlucosePanel, HeaderView, MechanicsPanel, SeriesPoint,
};
use crate::domain::telemetry::{Reading, TelemetrySnapshot};
use chrono::{DateTime, Local, TimeZone};

const PREDICTION_WARN_ABOVE: f64 = 120.0;

#[derive(Debug, Clone)]
pub struct DashboardService {
    glucose_chart: SeriesChartRenderer,
    insulin_chart: SeriesChartRenderer,
    glucose_gauge: ScalarIndicatorRenderer,
    glucose_meter: ScalarIndicatorRenderer,
    rotation_bar: ScalarIndicatorRenderer,
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardService {
    pub fn new() -> Self {
        Self {
            glucose_chart: SeriesChartRenderer::new(ChartConfig::glucose()),
            insulin_chart: SeriesChartRenderer::new(ChartConfig::insulin()),
            glucose_gauge: ScalarIndicatorRenderer::new(IndicatorConfig::glucose_gauge()),
            glucose_meter: ScalarIndicatorRenderer::new(IndicatorConfig::glucose_meter()),
            rotation_bar: ScalarIndicatorRenderer::new(IndicatorConfig::rotation_bar()),
        }
    }

    pub fn build(&self, snapshot: &TelemetrySnapshot, connection: ConnectionState) -> DashboardView {
        DashboardView {
            header: Self::header(snapshot, connection),
            glucose: self.glucose_panel(snapshot),
            algorithm: self.algorithm_panel(snapshot),
            mechanics: self.mechanics_panel(snapshot),
        }
    }

    fn header(snapshot: &TelemetrySnapshot, connection: ConnectionState) -> HeaderView {
        HeaderView {
            toggle_label: if snapshot.is_running { "⏸ PAUSE" } else { "▶ START" },
            is_running: snapshot.is_running,
            connection_label: connection.label(),
            connection_accent: if connection == ConnectionState::Connected {
                "#4ade80"
            } else {
                "#ef4444"
            },
        }
    }

    fn glucose_panel(&self, snapshot: &TelemetrySnapshot) -> GlucosePanel {
        let bg = Some(snapshot.current_bg);
        GlucosePanel {
            gauge: self.glucose_gauge.render(bg),
            meter: self.glucose_meter.render(bg),
            chart: self.glucose_chart.render(&glucose_series(snapshot)),
        }
    }

    fn algorithm_panel(&self, snapshot: &TelemetrySnapshot) -> AlgorithmPanel {
        let rec = &snapshot.latest_recommendation;
        let predicted_accent = match rec.eventual_bg {
            Reading::Value(v) if v > PREDICTION_WARN_ABOVE => "#f97316",
            _ => "#22c55e",
        };

        AlgorithmPanel {
            chart: self.insulin_chart.render(&basal_series(snapshot)),
            reason: rec.reason.clone(),
            iob: format!("{} U", snapshot.current_iob),
            predicted_bg: format!("{} mg/dL", rec.eventual_bg),
            predicted_accent,
            suggested_basal: format!("{:.2} U/hr", rec.rate),
        }
    }

    fn mechanics_panel(&self, snapshot: &TelemetrySnapshot) -> MechanicsPanel {
        let stats = &snapshot.pump_stats;
        let motor_active = snapshot.motor_state.is_on();

        MechanicsPanel {
            motor_label: if motor_active { "ROTATING" } else { "IDLE" },
            motor_active,
            rotations: format!("{:.4}", stats.rotations),
            rotation_bar: self.rotation_bar.render(Some(stats.rotations)),
            pulses: stats.pulses.to_string(),
            plunger_mm: format!("{:.4}", stats.plunger_mm),
            insulin_temp: format!("{}°C", snapshot.insulin_temp),
            cooler_active: snapshot.cooler_state.is_on(),
            spike_enabled: snapshot.is_running,
        }
    }
}

pub fn glucose_series(snapshot: &TelemetrySnapshot) -> Vec<SeriesPoint> {
    snapshot
        .glucose_history
        .iter()
        .map(|s| SeriesPoint::new(time_label(&Local, s.ts), s.bg))
        .collect()
}

pub fn basal_series(snapshot: &TelemetrySnapshot) -> Vec<SeriesPoint> {
    snapshot
        .basal_history
        .iter()
        .map(|s| SeriesPoint::new(time_label(&Local, s.ts), s.rate))
        .collect()
}

/// `HH:MM:SS` for an epoch-millisecond timestamp.
pub fn time_label<Tz: TimeZone>(tz: &Tz, ts_ms: i64) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp_millis(ts_ms) {
        Some(utc) => utc.with_timezone(tz).format("%H:%M:%S").to_string(),
        None => String::from("--:--:--"),
    }
}
